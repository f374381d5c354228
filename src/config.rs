//! Loading gym configuration (server, session plan, catalog composition,
//! optional question bank) from TOML.
//!
//! See `GymConfig` for the expected schema. Every section is optional; the
//! defaults reproduce the stock game: 5/7/8 questions per tier out of a
//! catalog holding 15 image + 5 typeface questions per tier, 100 coins a
//! correct answer.

use serde::Deserialize;
use tracing::{error, info};

use crate::catalog::CatalogError;
use crate::domain::Tier;
use crate::error::GymError;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GymConfig {
  #[serde(default)]
  pub server: ServerCfg,
  #[serde(default)]
  pub database: DatabaseCfg,
  #[serde(default)]
  pub session: SessionCfg,
  #[serde(default)]
  pub catalog: CatalogCfg,
  #[serde(default)]
  pub board: BoardCfg,
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerCfg {
  pub port: u16,
  pub static_dir: String,
}

impl Default for ServerCfg {
  fn default() -> Self {
    Self { port: 3000, static_dir: "./static".into() }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseCfg {
  /// sqlx SQLite URL; `mode=rwc` creates the file on first run.
  pub url: String,
}

impl Default for DatabaseCfg {
  fn default() -> Self {
    Self { url: "sqlite:data/gym.db?mode=rwc".into() }
  }
}

/// How many questions a session draws per tier, and what a correct answer
/// pays.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SessionCfg {
  pub beginner: usize,
  pub mid: usize,
  pub expert: usize,
  pub coin_reward: u32,
  /// Sessions idle longer than this are dropped on the next create.
  pub idle_ttl_secs: u64,
}

impl Default for SessionCfg {
  fn default() -> Self {
    Self { beginner: 5, mid: 7, expert: 8, coin_reward: 100, idle_ttl_secs: 7200 }
  }
}

impl SessionCfg {
  pub fn sample_for(&self, tier: Tier) -> usize {
    match tier {
      Tier::Beginner => self.beginner,
      Tier::Mid => self.mid,
      Tier::Expert => self.expert,
    }
  }

  pub fn total(&self) -> usize {
    self.beginner + self.mid + self.expert
  }
}

/// Exact per-kind counts one tier of the catalog must hold.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Composition {
  pub image: usize,
  pub typeface: usize,
}

impl Default for Composition {
  fn default() -> Self {
    Self { image: 15, typeface: 5 }
  }
}

#[derive(Clone, Copy, Debug, Deserialize, Default)]
#[serde(default)]
pub struct CatalogCfg {
  pub beginner: Composition,
  pub mid: Composition,
  pub expert: Composition,
}

impl CatalogCfg {
  pub fn for_tier(&self, tier: Tier) -> Composition {
    match tier {
      Tier::Beginner => self.beginner,
      Tier::Mid => self.mid,
      Tier::Expert => self.expert,
    }
  }
}

/// Leaderboard read limits.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BoardCfg {
  pub fetch_limit: usize,
  pub handle_limit: usize,
}

impl Default for BoardCfg {
  fn default() -> Self {
    Self { fetch_limit: 100, handle_limit: 12 }
  }
}

/// Question entry accepted in TOML configuration. A non-empty `questions`
/// list replaces the built-in catalog wholesale. Every field is optional at
/// parse time so an incomplete entry is rejected by id during catalog
/// validation instead of sinking the whole config parse.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct QuestionCfg {
  #[serde(default)] pub id: Option<String>,
  #[serde(default)] pub tier: Option<String>,
  #[serde(default)] pub kind: Option<String>,
  #[serde(default)] pub prompt: Option<String>,
  #[serde(default)] pub option_a: Option<String>,
  #[serde(default)] pub option_b: Option<String>,
  #[serde(default)] pub explanation: String,
}

/// Attempt to load `GymConfig` from GYM_CONFIG_PATH. A missing variable,
/// unreadable file, or malformed TOML falls back to the defaults, with one
/// exception: a file that carries a `questions` bank must parse. A broken
/// bank is fatal, never silently replaced by the built-ins.
pub fn load_gym_config_from_env() -> Result<GymConfig, GymError> {
  let path = match std::env::var("GYM_CONFIG_PATH") {
    Ok(p) => p,
    Err(_) => return Ok(GymConfig::default()),
  };
  let text = match std::fs::read_to_string(&path) {
    Ok(s) => s,
    Err(e) => {
      error!(target: "gym_backend", %path, error = %e, "Failed to read TOML config file");
      return Ok(GymConfig::default());
    }
  };
  match toml::from_str::<GymConfig>(&text) {
    Ok(cfg) => {
      info!(target: "gym_backend", %path, "Loaded gym config (TOML)");
      Ok(cfg)
    }
    Err(e) if has_question_bank(&text) => {
      error!(target: "gym_backend", %path, error = %e, "Question bank failed to parse");
      Err(CatalogError::MalformedBank { detail: e.to_string() }.into())
    }
    Err(e) => {
      error!(target: "gym_backend", %path, error = %e, "Failed to parse TOML config");
      Ok(GymConfig::default())
    }
  }
}

/// True when the raw TOML holds a `questions` key, readable even after the
/// typed parse has failed.
fn has_question_bank(text: &str) -> bool {
  text.parse::<toml::Table>().map(|t| t.contains_key("questions")).unwrap_or(false)
}
