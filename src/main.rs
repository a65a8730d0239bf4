use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use term2048::client::http::GameClient;
use term2048::config::Config;
use term2048::core::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env_args()?;
    init_tracing(&config.log_file)?;
    tracing::info!(server = %config.server_url, board_size = config.board_size, "starting term2048");

    let client = GameClient::new(config.server_url);
    let terminal = ratatui::init();
    let result = App::new(client, config.board_size).run(terminal).await;
    ratatui::restore();
    result
}

/// The TUI owns stdout, so tracing goes to a file.
fn init_tracing(path: &str) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("could not open log file '{path}'"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
