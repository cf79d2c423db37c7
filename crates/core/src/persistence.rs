//! Storage for the "previously connected" flag.
//!
//! Only a single boolean is persisted; no account or transaction data ever
//! leaves memory.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// File name used by [`FilePersistence`]
pub const SESSION_FILE_NAME: &str = "session.json";

/// Persists whether the wallet was connected in a previous session
pub trait ConnectionPersistence: Send + Sync {
    fn previously_connected(&self) -> bool;
    fn set_previously_connected(&self, connected: bool);
}

/// In-memory flag, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    connected: AtomicBool,
}

impl MemoryPersistence {
    pub fn new(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
        }
    }
}

impl ConnectionPersistence for MemoryPersistence {
    fn previously_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn set_previously_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    wallet_connected: bool,
}

/// Flag stored as a small JSON document inside a state directory.
///
/// I/O failures are logged and treated as "not connected"; they never reach
/// the session store.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    /// Stores the flag in `dir/session.json`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE_NAME),
        }
    }

    /// Platform data directory for dapp-wallet, if one exists
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("dapp-wallet"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, file: &SessionFile) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(file)?;
        std::fs::write(&self.path, content)
    }
}

impl ConnectionPersistence for FilePersistence {
    fn previously_connected(&self) -> bool {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return false,
            Err(err) => {
                warn!(path = %self.path.display(), "failed to read session file: {}", err);
                return false;
            }
        };

        match serde_json::from_str::<SessionFile>(&content) {
            Ok(file) => file.wallet_connected,
            Err(err) => {
                warn!(path = %self.path.display(), "ignoring malformed session file: {}", err);
                false
            }
        }
    }

    fn set_previously_connected(&self, connected: bool) {
        if connected {
            if let Err(err) = self.write(&SessionFile {
                wallet_connected: true,
            }) {
                warn!(path = %self.path.display(), "failed to persist session flag: {}", err);
            }
            return;
        }

        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "cleared session flag"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %self.path.display(), "failed to clear session flag: {}", err)
            }
        }
    }
}
