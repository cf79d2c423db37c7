use anyhow::Result;
use clap::Parser;
use dapp_cli::{App, CliArgs, LogLevel};
use dapp_config::AppConfig;
use std::io;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let mut config = match (&args.config, args.config_path()) {
        (Some(path), _) => AppConfig::load(path)?,
        (None, Some(path)) => AppConfig::load_or_default(&path)?,
        (None, None) => AppConfig::default(),
    };
    args.apply_overrides(&mut config);
    config.validate()?;
    debug!(networks = config.networks.len(), "configuration loaded");

    let app = App::build(config)?;
    let mut stdout = io::stdout();
    app.run(&args.command, args.json, &mut stdout).await
}

fn init_tracing(level: LogLevel) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}
