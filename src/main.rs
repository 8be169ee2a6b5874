use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use tripboard::{BoardConfig, BoardController};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("board.json"));

    let config = BoardConfig::load(&config_path)
        .with_context(|| format!("could not load {}", config_path.display()))?;

    info!("tripboard starting up...");

    let mut controller = BoardController::new(config)?;
    controller.start()?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    controller.stop().await?;
    info!("tripboard stopped");
    Ok(())
}
