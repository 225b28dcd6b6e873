//! # Ledge
//!
//! Headless runner for the Ledge platformer.
//!
//! Usage: `ledge [replay.json]`. The config file is read from `LEDGE_CONFIG`
//! or the platform config directory.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::Result;
use ledge_engine::{app, EngineConfig};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("ledge=info".parse()?))
        .init();

    info!("Ledge starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = EngineConfig::load();
    if let Some(script) = std::env::args_os().nth(1) {
        config.replay_path = Some(script.into());
    }

    app::run(&config)?;

    info!("Ledge shutdown complete");
    Ok(())
}
