//! Warfront Game Server
//!
//! Runs a local session: the deterministic engine driven by the turn
//! scheduler, with nation and bot players filling the map. Human
//! connection plumbing is out of scope for this binary; it exists to
//! exercise a full game end to end and archive the record.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tracing::info;
use warfront_protocol::{GameSettings, GameStartInfo};
use warfront_server::{archive, GameSession, ServerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warfront_server=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();
    info!("Warfront Server v{}", env!("CARGO_PKG_VERSION"));
    info!(?config, "server configuration");

    let lobby_created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let start_info = GameStartInfo {
        game_id: format!("local-{lobby_created_at}"),
        settings: GameSettings {
            bot_count: 20,
            ..GameSettings::default()
        },
        players: Vec::new(),
        lobby_created_at,
    };

    let mut session = GameSession::new(config, start_info);
    if let Err(err) = session.start(Instant::now()) {
        tracing::error!(%err, "session failed to start");
        std::process::exit(1);
    }

    let record = session.run().await;
    match &record.winner {
        Some(winner) => info!(?winner, turns = record.turns.len(), "game complete"),
        None => info!(turns = record.turns.len(), "game ended without a winner"),
    }
    archive::finalize(&record);
}
