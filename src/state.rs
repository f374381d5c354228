//! Application state: the validated catalog, live sessions, the score
//! store handle, and configuration.
//!
//! This module owns:
//!   - the question catalog (TOML bank or built-ins), validated at startup
//!   - the live-session map keyed by session id
//!   - the SQLite-backed score store
//!
//! Idle sessions are pruned inline whenever a new one is created; there is
//! no background reaper.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::catalog;
use crate::config::GymConfig;
use crate::domain::{Question, QuestionKind, Tier};
use crate::error::GymError;
use crate::session::Session;
use crate::store::ScoreStore;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Vec<Question>>,
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    pub store: ScoreStore,
    pub cfg: Arc<GymConfig>,
}

impl AppState {
    /// Build state: load the catalog (bank or built-ins), validate its
    /// composition, and log the startup inventory. Composition violations
    /// are fatal here, before any session can start.
    #[instrument(level = "info", skip_all)]
    pub fn new(cfg: GymConfig, store: ScoreStore) -> Result<AppState, GymError> {
        let catalog = catalog::load(&cfg)?;
        catalog::validate_composition(&catalog, &cfg.catalog)?;

        // Inventory summary by tier/kind.
        for tier in Tier::ALL {
            let images = catalog
                .iter()
                .filter(|q| q.tier == tier && q.kind == QuestionKind::Image)
                .count();
            let typefaces = catalog
                .iter()
                .filter(|q| q.tier == tier && q.kind == QuestionKind::Typeface)
                .count();
            info!(target: "gym_backend", tier = tier.as_str(), images, typefaces, "Startup catalog inventory");
        }

        Ok(AppState {
            catalog: Arc::new(catalog),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            store,
            cfg: Arc::new(cfg),
        })
    }

    /// Create a session parked on the instructions screen, dropping any
    /// session idle past the configured TTL on the way in.
    #[instrument(level = "info", skip(self))]
    pub async fn create_session(&self) -> Uuid {
        let now = Utc::now();
        let ttl = Duration::seconds(self.cfg.session.idle_ttl_secs as i64);
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, s| now - s.touched_at <= ttl);
        if sessions.len() < before {
            info!(target: "session", dropped = before - sessions.len(), "Pruned idle sessions");
        }

        let id = Uuid::new_v4();
        sessions.insert(id, Session::new(self.cfg.session.coin_reward, now));
        info!(target: "session", %id, live = sessions.len(), "Session created");
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use crate::config::{Composition, QuestionCfg};
    use crate::session::Phase;

    async fn test_state(cfg: GymConfig) -> Result<AppState, GymError> {
        let store = ScoreStore::connect("sqlite::memory:").await.unwrap();
        AppState::new(cfg, store)
    }

    #[tokio::test]
    async fn startup_succeeds_on_default_catalog() {
        let state = test_state(GymConfig::default()).await.unwrap();
        assert_eq!(state.catalog.len(), 60);
    }

    #[tokio::test]
    async fn startup_fails_fast_on_bad_composition() {
        let mut cfg = GymConfig::default();
        cfg.catalog.expert = Composition { image: 16, typeface: 5 };
        let err = test_state(cfg).await.err();
        assert!(matches!(err, Some(GymError::Catalog(_))));
    }

    #[tokio::test]
    async fn startup_fails_fast_on_an_untagged_bank_entry() {
        let mut cfg = GymConfig::default();
        cfg.questions = vec![QuestionCfg {
            id: Some("untagged".into()),
            kind: Some("image".into()),
            prompt: Some("Which?".into()),
            option_a: Some("a.png".into()),
            option_b: Some("b.png".into()),
            ..Default::default()
        }];
        match test_state(cfg).await.err() {
            Some(GymError::Catalog(CatalogError::BadItem { id, problem })) => {
                assert_eq!(id, "untagged");
                assert_eq!(problem, "missing tier");
            }
            other => panic!("expected a catalog failure naming the entry, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_session_parks_on_instructions() {
        let state = test_state(GymConfig::default()).await.unwrap();
        let id = state.create_session().await;
        let sessions = state.sessions.read().await;
        assert_eq!(sessions.get(&id).unwrap().phase, Phase::Instructions);
    }

    #[tokio::test]
    async fn idle_sessions_are_pruned_on_create() {
        let mut cfg = GymConfig::default();
        cfg.session.idle_ttl_secs = 60;
        let state = test_state(cfg).await.unwrap();

        let stale = state.create_session().await;
        {
            let mut sessions = state.sessions.write().await;
            sessions.get_mut(&stale).unwrap().touched_at = Utc::now() - Duration::seconds(120);
        }

        let fresh = state.create_session().await;
        let sessions = state.sessions.read().await;
        assert!(!sessions.contains_key(&stale));
        assert!(sessions.contains_key(&fresh));
    }
}
