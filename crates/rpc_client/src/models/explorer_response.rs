use dapp_core::{RawTransaction, SourceError, SourceResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message explorers send with `status: "0"` for accounts without history
pub const NO_TRANSACTIONS_FOUND: &str = "No transactions found";

/// Envelope of every Etherscan-compatible API answer.
///
/// `result` holds the payload on success and an error description
/// otherwise, so it stays untyped until the status is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Value,
}

impl ExplorerResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "1"
    }

    /// Interprets the response as an `account/txlist` answer
    pub fn into_transactions(self) -> SourceResult<Vec<RawTransaction>> {
        if !self.is_ok() {
            if self.message == NO_TRANSACTIONS_FOUND {
                return Ok(Vec::new());
            }
            return Err(self.into_error("Error fetching transactions"));
        }

        serde_json::from_value(self.result)
            .map_err(|e| SourceError::InvalidResponse(format!("malformed transaction list: {}", e)))
    }

    /// Interprets the response as an `account/balance` answer
    pub fn into_balance(self) -> SourceResult<String> {
        if !self.is_ok() {
            return Err(self.into_error("Error fetching balance"));
        }

        match self.result {
            Value::String(balance) => Ok(balance),
            other => Err(SourceError::InvalidResponse(format!(
                "unexpected balance result: {}",
                other
            ))),
        }
    }

    fn into_error(self, fallback: &str) -> SourceError {
        let detail = match (&self.message, &self.result) {
            (message, Value::String(result)) if !result.is_empty() && !message.is_empty() => {
                format!("{}: {}", message, result)
            }
            (message, _) if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        };
        SourceError::Fetch(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> ExplorerResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_successful_txlist() {
        let response = parse(json!({
            "status": "1",
            "message": "OK",
            "result": [{
                "blockNumber": "19000000",
                "timeStamp": "1705000000",
                "hash": "0xabc",
                "nonce": "4",
                "from": "0x1111",
                "to": "0x2222",
                "value": "42",
                "gas": "21000",
                "isError": "0",
                "txreceipt_status": "1",
                "input": "0x",
                "confirmations": "12"
            }]
        }));

        let transactions = response.into_transactions().unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].hash, "0xabc");
        assert_eq!(transactions[0].value, "42");
        assert_eq!(transactions[0].receipt_status, "1");
    }

    #[test]
    fn test_no_transactions_found_is_empty() {
        let response = parse(json!({
            "status": "0",
            "message": "No transactions found",
            "result": []
        }));

        assert_eq!(response.into_transactions().unwrap(), Vec::new());
    }

    #[test]
    fn test_error_status_carries_message() {
        let response = parse(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Invalid API Key"
        }));

        assert_eq!(
            response.into_transactions().unwrap_err(),
            SourceError::Fetch("NOTOK: Invalid API Key".to_string())
        );
    }

    #[test]
    fn test_error_without_message_uses_fallback() {
        let response = parse(json!({ "status": "0" }));

        assert_eq!(
            response.into_transactions().unwrap_err(),
            SourceError::Fetch("Error fetching transactions".to_string())
        );
    }

    #[test]
    fn test_balance_result() {
        let response = parse(json!({
            "status": "1",
            "message": "OK",
            "result": "1500000000000000000"
        }));
        assert_eq!(response.into_balance().unwrap(), "1500000000000000000");

        let malformed = parse(json!({ "status": "1", "message": "OK", "result": 15 }));
        assert!(matches!(
            malformed.into_balance(),
            Err(SourceError::InvalidResponse(_))
        ));
    }
}
