//! Design Gym · Quiz Backend
//!
//! - Axum HTTP + WebSocket API
//! - Server-side session engine (selection, placement, coin ledger)
//! - SQLite-backed leaderboard
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT          : u16 (default 3000, or [server].port from config)
//!   DATABASE_URL  : sqlx SQLite URL (default "sqlite:data/gym.db?mode=rwc")
//!   GYM_CONFIG_PATH : path to TOML config (session plan, catalog composition,
//!                   optional question bank)
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod catalog;
mod error;
mod session;
mod store;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;
use crate::store::ScoreStore;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Load TOML config if provided; the defaults reproduce the stock game.
  // A file carrying a broken question bank aborts instead of defaulting.
  let cfg = config::load_gym_config_from_env()?;

  // Connect the score store up front. The env override wins over config so
  // deployments can point at a volume without editing TOML.
  let db_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| cfg.database.url.clone());
  let store = ScoreStore::connect(&db_url).await?;

  // Build shared application state (catalog, live sessions, score store).
  // A catalog composition violation aborts startup right here.
  let state = Arc::new(AppState::new(cfg, store.clone())?);

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env, falling back to config.
  let port = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .unwrap_or(state.cfg.server.port);
  let addr = SocketAddr::from(([0, 0, 0, 0], port));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "gym_backend", %addr, "HTTP server listening");

  tokio::select! {
    result = axum::serve(listener, app) => { result?; }
    _ = tokio::signal::ctrl_c() => {
      info!(target: "gym_backend", "Shutdown signal received");
    }
  }

  // Let an in-flight leaderboard write finish before the process exits.
  store.close().await;
  Ok(())
}
