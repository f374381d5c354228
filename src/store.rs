//! Leaderboard persistence over SQLite.
//!
//! The store is an explicitly owned handle: `main` connects once, hands it
//! to the app state, and everything else borrows it. No lazy globals. The
//! schema is created on connect, so a fresh database file works on first
//! run.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{Entry, NewEntry, RankLabel};
use crate::error::GymError;
use crate::util;

/// Upper bound on stored display names.
const MAX_NAME_LEN: usize = 64;
/// Upper bound on normalized social handles, `@` included.
const MAX_HANDLE_LEN: usize = 32;

#[derive(Clone)]
pub struct ScoreStore {
    pool: SqlitePool,
}

impl ScoreStore {
    /// Connect and create the schema. `url` is a sqlx SQLite URL such as
    /// `sqlite:data/gym.db?mode=rwc` or `sqlite::memory:`.
    pub async fn connect(url: &str) -> Result<ScoreStore, sqlx::Error> {
        ensure_parent_dir(url)?;
        // One connection: SQLite serializes writers anyway, and a wider pool
        // would hand each connection its own copy of a :memory: database.
        let pool = SqlitePoolOptions::new().max_connections(1).connect(url).await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                score INTEGER NOT NULL,
                accuracy INTEGER NOT NULL,
                time_taken_secs INTEGER NOT NULL,
                tier TEXT NOT NULL,
                social_handle TEXT,
                submitted_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_entries_rank
             ON entries(score DESC, accuracy DESC, time_taken_secs ASC, submitted_at ASC)",
        )
        .execute(&pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_entries_tier ON entries(tier)")
            .execute(&pool)
            .await?;
        info!(target: "board", %url, "score store ready");
        Ok(ScoreStore { pool })
    }

    /// Graceful teardown; lets an in-flight write finish.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Validate, normalize, and persist one submission. Returns the stored
    /// row, timestamped here so ordering is decided in one place.
    #[instrument(level = "info", skip(self, new), fields(score = new.score, tier = new.tier.as_str()))]
    pub async fn insert(&self, new: &NewEntry) -> Result<Entry, GymError> {
        let name = util::clean_name(&new.name)
            .ok_or_else(|| GymError::validation("name is required"))?;
        if name.chars().count() > MAX_NAME_LEN {
            return Err(GymError::Validation(format!("name longer than {MAX_NAME_LEN} characters")));
        }
        if new.accuracy > 100 {
            return Err(GymError::Validation(format!("accuracy {} out of range 0-100", new.accuracy)));
        }
        let social_handle = util::normalize_handle(new.social_handle.as_deref());
        if let Some(h) = &social_handle {
            if h.chars().count() > MAX_HANDLE_LEN {
                return Err(GymError::Validation(format!(
                    "social handle longer than {MAX_HANDLE_LEN} characters"
                )));
            }
        }

        let entry = Entry {
            id: Uuid::new_v4().to_string(),
            name,
            score: new.score,
            accuracy: new.accuracy,
            time_taken_secs: new.time_taken_secs,
            tier: new.tier,
            social_handle,
            submitted_at: truncate_to_micros(Utc::now()),
        };
        sqlx::query(
            "INSERT INTO entries (id, name, score, accuracy, time_taken_secs, tier, social_handle, submitted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&entry.id)
        .bind(&entry.name)
        .bind(entry.score as i64)
        .bind(entry.accuracy as i64)
        .bind(entry.time_taken_secs as i64)
        .bind(entry.tier.as_str())
        .bind(entry.social_handle.as_deref())
        .bind(rfc3339(entry.submitted_at))
        .execute(&self.pool)
        .await?;
        info!(target: "board", id = %entry.id, tier = entry.tier.as_str(), score = entry.score, "entry stored");
        Ok(entry)
    }

    /// Ranked read: score desc, then accuracy desc, then time asc (faster
    /// wins), then submission time asc as the stabilizer. Optionally
    /// filtered to one rank label.
    #[instrument(level = "info", skip(self))]
    pub async fn ranked(&self, tier: Option<RankLabel>, limit: usize) -> Result<Vec<Entry>, GymError> {
        const COLS: &str =
            "id, name, score, accuracy, time_taken_secs, tier, social_handle, submitted_at";
        let rows: Vec<EntryRow> = match tier {
            Some(t) => {
                sqlx::query_as(&format!(
                    "SELECT {COLS} FROM entries WHERE tier = ?
                     ORDER BY score DESC, accuracy DESC, time_taken_secs ASC, submitted_at ASC
                     LIMIT ?"
                ))
                .bind(t.as_str())
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {COLS} FROM entries
                     ORDER BY score DESC, accuracy DESC, time_taken_secs ASC, submitted_at ASC
                     LIMIT ?"
                ))
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.into_iter().map(row_to_entry).collect()
    }

    /// Most recently seen distinct handles, newest first.
    #[instrument(level = "info", skip(self))]
    pub async fn recent_handles(&self, limit: usize) -> Result<Vec<String>, GymError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT social_handle FROM entries
             WHERE social_handle IS NOT NULL
             GROUP BY social_handle
             ORDER BY MAX(submitted_at) DESC
             LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}

type EntryRow = (String, String, i64, i64, i64, String, Option<String>, String);

fn row_to_entry(row: EntryRow) -> Result<Entry, GymError> {
    let (id, name, score, accuracy, time_taken_secs, tier, social_handle, submitted_at) = row;
    let tier = RankLabel::parse(&tier)
        .ok_or_else(|| GymError::Corrupt(format!("entry {id} has tier '{tier}'")))?;
    let submitted_at = DateTime::parse_from_rfc3339(&submitted_at)
        .map_err(|e| GymError::Corrupt(format!("entry {id} has timestamp '{submitted_at}': {e}")))?
        .with_timezone(&Utc);
    Ok(Entry {
        id,
        name,
        score: score as u32,
        accuracy: accuracy as u32,
        time_taken_secs: time_taken_secs as u32,
        tier,
        social_handle,
        submitted_at,
    })
}

/// Fixed-width timestamps so the TEXT column sorts chronologically.
fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// The column keeps microseconds, so the returned entry must carry the same
/// instant a later read will see.
fn truncate_to_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_nanosecond(ts.nanosecond() / 1_000 * 1_000).unwrap_or(ts)
}

/// For file-backed URLs, create the parent directory; SQLite will not.
fn ensure_parent_dir(url: &str) -> Result<(), sqlx::Error> {
    let path = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:")).unwrap_or(url);
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(':') {
        return Ok(()); // :memory: and friends
    }
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> ScoreStore {
        ScoreStore::connect("sqlite::memory:").await.unwrap()
    }

    fn entry(name: &str, score: u32, accuracy: u32, time: u32) -> NewEntry {
        NewEntry {
            name: name.into(),
            score,
            accuracy,
            time_taken_secs: time,
            tier: RankLabel::from_accuracy(accuracy),
            social_handle: None,
        }
    }

    #[tokio::test]
    async fn insert_round_trips() {
        let store = memory_store().await;
        let stored = store
            .insert(&NewEntry {
                name: "  Ada  ".into(),
                score: 1800,
                accuracy: 90,
                time_taken_secs: 240,
                tier: RankLabel::Expert,
                social_handle: Some(" ada_l ".into()),
            })
            .await
            .unwrap();
        assert_eq!(stored.name, "Ada");
        assert_eq!(stored.social_handle.as_deref(), Some("@ada_l"));

        let all = store.ranked(None, 10).await.unwrap();
        assert_eq!(
            all[0].submitted_at, stored.submitted_at,
            "insert must return the timestamp it persisted"
        );
        assert_eq!(all, vec![stored]);
    }

    #[tokio::test]
    async fn ranking_breaks_ties_by_accuracy_then_time() {
        let store = memory_store().await;
        // Same score everywhere: accuracy decides, then time (faster first).
        let slow = store.insert(&entry("slow", 100, 90, 30)).await.unwrap();
        let fast = store.insert(&entry("fast", 100, 90, 20)).await.unwrap();
        let sharp = store.insert(&entry("sharp", 100, 95, 50)).await.unwrap();

        let ids: Vec<String> =
            store.ranked(None, 10).await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![sharp.id, fast.id, slow.id]);
    }

    #[tokio::test]
    async fn full_ties_keep_submission_order() {
        let store = memory_store().await;
        let first = store.insert(&entry("first", 500, 50, 60)).await.unwrap();
        let second = store.insert(&entry("second", 500, 50, 60)).await.unwrap();

        let names: Vec<String> =
            store.ranked(None, 10).await.unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec![first.name, second.name]);
    }

    #[tokio::test]
    async fn ranked_filters_by_tier_label() {
        let store = memory_store().await;
        store.insert(&entry("master", 2000, 100, 100)).await.unwrap();
        store.insert(&entry("novice", 300, 15, 100)).await.unwrap();

        let masters = store.ranked(Some(RankLabel::Master), 10).await.unwrap();
        assert_eq!(masters.len(), 1);
        assert_eq!(masters[0].name, "master");
        assert!(masters.iter().all(|e| e.tier == RankLabel::Master));
    }

    #[tokio::test]
    async fn ranked_respects_the_limit() {
        let store = memory_store().await;
        for i in 0..5 {
            store.insert(&entry(&format!("p{i}"), 100 * i, 50, 10)).await.unwrap();
        }
        assert_eq!(store.ranked(None, 3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn insert_rejects_blank_names() {
        let store = memory_store().await;
        let err = store.insert(&entry("   ", 100, 50, 10)).await.unwrap_err();
        assert!(matches!(err, GymError::Validation(_)));
        assert!(store.ranked(None, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_rejects_out_of_range_accuracy() {
        let store = memory_store().await;
        let err = store.insert(&entry("Ada", 100, 101, 10)).await.unwrap_err();
        assert!(matches!(err, GymError::Validation(_)));
    }

    #[tokio::test]
    async fn insert_rejects_oversized_fields() {
        let store = memory_store().await;
        let long_name = "x".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            store.insert(&entry(&long_name, 1, 1, 1)).await.unwrap_err(),
            GymError::Validation(_)
        ));

        let mut with_handle = entry("Ada", 1, 1, 1);
        with_handle.social_handle = Some("h".repeat(MAX_HANDLE_LEN + 1));
        assert!(matches!(
            store.insert(&with_handle).await.unwrap_err(),
            GymError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn blank_handles_are_stored_as_null() {
        let store = memory_store().await;
        let mut new = entry("Ada", 10, 10, 10);
        new.social_handle = Some("   ".into());
        let stored = store.insert(&new).await.unwrap();
        assert_eq!(stored.social_handle, None);
        assert!(store.recent_handles(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn recent_handles_are_distinct_newest_first() {
        let store = memory_store().await;
        for handle in ["one", "two", "one"] {
            let mut new = entry("Ada", 10, 10, 10);
            new.social_handle = Some(handle.into());
            store.insert(&new).await.unwrap();
        }
        let handles = store.recent_handles(10).await.unwrap();
        assert_eq!(handles, vec!["@one".to_string(), "@two".to_string()]);

        let capped = store.recent_handles(1).await.unwrap();
        assert_eq!(capped, vec!["@one".to_string()]);
    }
}
