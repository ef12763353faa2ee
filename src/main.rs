//! Poolslip - pool prediction client engine
//!
//! Thin smoke binary: initializes logging, loads the configuration and
//! lists the currently open games from the configured catalog service.

use poolslip::Config;
use poolslip::api::{HttpApiClient, PredictionApi};
use poolslip::state::{GameState, MATCHES_PER_GAME};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging: console plus a daily rolling file.
    let log_dir = poolslip::config::log_dir()?;
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "poolslip.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "poolslip=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .init();

    // Load configuration
    let config = Config::load_or_default()?;
    let client = HttpApiClient::new(config.api.clone())?;

    let mut catalog = GameState::default();
    catalog.loading = true;
    catalog.games_loaded(client.fetch_open_games().await?);
    tracing::info!(count = catalog.games.len(), "fetched open games");

    for game in catalog.open_games() {
        if game.matches.len() != MATCHES_PER_GAME {
            tracing::warn!(
                game_id = %game.id,
                matches = game.matches.len(),
                "game does not carry a full coupon"
            );
        }
        println!(
            "{}  {}  deadline {}  ({} matches)",
            game.id,
            game.name,
            game.deadline,
            game.matches.len()
        );
    }

    Ok(())
}
