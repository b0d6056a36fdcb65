mod library;
mod shelftui;

use crate::library::Catalog;
use crate::shelftui::reading_positions::ReadingPositionsPath;
use crate::shelftui::ShelftuiApp;
use anyhow::Context;
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use std::path::PathBuf;

fn app_dir() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".shelftui"))
}

fn init_logger() -> anyhow::Result<LoggerHandle> {
    let log_dir = app_dir()
        .context("Could not determine the home directory")?
        .join("logs");
    Logger::try_with_env_or_str("info")
        .context("Invalid log specification")?
        .log_to_file(FileSpec::default().directory(log_dir))
        .start()
        .context("Failed to start the logger")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _logger = init_logger()?;
    let catalog = Catalog::builtin().context("Failed to load the article catalog")?;
    let reading_positions = app_dir()
        .map(|dir| dir.join("reading_positions.json"))
        .map(ReadingPositionsPath);
    let mut app = ShelftuiApp::new(catalog, reading_positions);
    app.run().await?;
    Ok(())
}
