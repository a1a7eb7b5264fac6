//! Default command: the interactive app.

use anyhow::{Context, Result};
use mylo_core::clients::Clients;
use mylo_core::config::{self, Backend, Config};
use mylo_core::logging;

pub async fn run(offline: bool) -> Result<()> {
    let mut config = Config::load().context("load config")?;
    if offline {
        config.backend = Backend::Memory;
    }

    let _log_guard = logging::init(&config.log, &config::paths::logs_dir())?;
    tracing::info!(backend = ?config.backend, "Starting mylo");

    let clients = Clients::from_config(&config)?;
    mylo_tui::run(clients).await
}
