//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - session lifecycle (create, begin, serve, answer, advance, restart)
//!   - the summary and its leaderboard submission
//!   - leaderboard reads and external submissions
//!
//! The finished run is submitted on the completing advance call. The phase
//! machine records completion first; the insert outcome is classified and
//! only decorates the summary. Nothing retries automatically.

use chrono::Utc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{NewEntry, RankLabel, Side};
use crate::error::GymError;
use crate::protocol::{
  answer_to_out, checkpoint_to_out, entry_to_out, question_to_out, summary_to_out, AdvanceOut,
  AnswerOut, EntryIn, EntryOut, PlanOut, QuestionOut, SessionOut, SummaryOut,
};
use crate::session::{self, Advanced, Phase, SubmissionStatus, SubmitFailureKind};
use crate::state::AppState;

fn plan_out(state: &AppState) -> PlanOut {
  let s = &state.cfg.session;
  PlanOut {
    beginner: s.beginner,
    mid: s.mid,
    expert: s.expert,
    question_count: s.total(),
    coin_reward: s.coin_reward,
  }
}

/// Session ids arrive as strings over the WebSocket.
pub fn parse_session_id(raw: &str) -> Result<Uuid, GymError> {
  Uuid::parse_str(raw.trim()).map_err(|_| GymError::validation("malformed session id"))
}

#[instrument(level = "info", skip(state))]
pub async fn create_session(state: &AppState) -> SessionOut {
  let id = state.create_session().await;
  SessionOut { session_id: id.to_string(), phase: Phase::Instructions, plan: plan_out(state) }
}

/// Leave the instructions screen: draw the question list, start the clock,
/// and serve the first question.
#[instrument(level = "info", skip(state, name, social_handle), fields(%session_id))]
pub async fn begin_session(
  state: &AppState,
  session_id: Uuid,
  name: Option<String>,
  social_handle: Option<String>,
) -> Result<QuestionOut, GymError> {
  let mut sessions = state.sessions.write().await;
  let s = sessions.get_mut(&session_id).ok_or(GymError::UnknownSession(session_id))?;
  // Lookup first: a bogus id must report unknown, not a catalog fault.
  let questions = {
    let mut rng = rand::thread_rng();
    session::select_questions(&state.catalog, &state.cfg.session, &state.cfg.catalog, &mut rng)?
  };
  s.begin(name, social_handle, questions, Utc::now())?;
  info!(target: "session", %session_id, questions = s.questions.len(), "Session began");
  let served = s.serve(&mut rand::thread_rng(), Utc::now())?;
  Ok(question_to_out(&served))
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn serve_question(state: &AppState, session_id: Uuid) -> Result<QuestionOut, GymError> {
  let mut sessions = state.sessions.write().await;
  let s = sessions.get_mut(&session_id).ok_or(GymError::UnknownSession(session_id))?;
  let served = s.serve(&mut rand::thread_rng(), Utc::now())?;
  Ok(question_to_out(&served))
}

#[instrument(level = "info", skip(state), fields(%session_id, side = side.as_str()))]
pub async fn submit_answer(state: &AppState, session_id: Uuid, side: Side) -> Result<AnswerOut, GymError> {
  let mut sessions = state.sessions.write().await;
  let s = sessions.get_mut(&session_id).ok_or(GymError::UnknownSession(session_id))?;
  let outcome = s.answer(side, Utc::now())?;
  info!(target: "session", %session_id, correct = outcome.correct, coins = outcome.coins, "Answer graded");
  Ok(answer_to_out(&outcome))
}

/// Move past a graded question. Into the next question, a tier checkpoint,
/// or completion; completion submits the run and returns the summary.
#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn advance_session(state: &AppState, session_id: Uuid) -> Result<AdvanceOut, GymError> {
  let advanced = {
    let mut sessions = state.sessions.write().await;
    let s = sessions.get_mut(&session_id).ok_or(GymError::UnknownSession(session_id))?;
    let advanced = s.advance(Utc::now())?;
    if matches!(advanced, Advanced::Finished) {
      s.submission = Some(SubmissionStatus::Pending);
    }
    advanced
  };

  match advanced {
    Advanced::NextQuestion => {
      let question = serve_question(state, session_id).await?;
      Ok(AdvanceOut {
        phase: Phase::QuestionActive,
        question: Some(question),
        checkpoint: None,
        summary: None,
      })
    }
    Advanced::TierBreak(cp) => {
      info!(target: "session", %session_id, finished = cp.finished_tier.as_str(), next = cp.next_tier.as_str(), coins = cp.coins, "Tier checkpoint");
      Ok(AdvanceOut {
        phase: Phase::TierComplete,
        question: None,
        checkpoint: Some(checkpoint_to_out(&cp)),
        summary: None,
      })
    }
    Advanced::Finished => {
      submit_finished(state, session_id).await;
      let summary = session_summary(state, session_id).await?;
      Ok(AdvanceOut {
        phase: Phase::SessionComplete,
        question: None,
        checkpoint: None,
        summary: Some(summary),
      })
    }
  }
}

/// Post the finished run to the score store. Failures are classified into
/// validation / transient / server, logged accordingly, and written into
/// the submission status for the summary screen.
#[instrument(level = "info", skip(state), fields(%session_id))]
async fn submit_finished(state: &AppState, session_id: Uuid) {
  let entry = {
    let sessions = state.sessions.read().await;
    match sessions.get(&session_id) {
      Some(s) if s.phase == Phase::SessionComplete => s.submission_entry(),
      _ => return,
    }
  };

  let status = match state.store.insert(&entry).await {
    Ok(stored) => {
      info!(target: "board", %session_id, entry_id = %stored.id, score = stored.score, "Run submitted");
      SubmissionStatus::Accepted { entry_id: stored.id }
    }
    Err(err) => {
      let kind = classify_submit_error(&err);
      match kind {
        SubmitFailureKind::Validation => {
          warn!(target: "board", %session_id, error = %err, "Submission rejected")
        }
        SubmitFailureKind::Transient => {
          warn!(target: "board", %session_id, error = %err, "Submission failed; a fresh run may succeed")
        }
        SubmitFailureKind::Server => {
          error!(target: "board", %session_id, error = %err, "Submission failed")
        }
      }
      SubmissionStatus::Failed { kind, message: err.to_string() }
    }
  };

  let mut sessions = state.sessions.write().await;
  if let Some(s) = sessions.get_mut(&session_id) {
    // A restart during the insert starts a new run; leave that one alone.
    if s.phase == Phase::SessionComplete {
      s.submission = Some(status);
    }
  }
}

fn classify_submit_error(err: &GymError) -> SubmitFailureKind {
  match err {
    GymError::Validation(_) => SubmitFailureKind::Validation,
    GymError::Database(sqlx::Error::Io(_)) | GymError::Database(sqlx::Error::PoolTimedOut) => {
      SubmitFailureKind::Transient
    }
    _ => SubmitFailureKind::Server,
  }
}

/// Back to the instructions screen; the run is cleared, identity kept.
#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn restart_session(state: &AppState, session_id: Uuid) -> Result<SessionOut, GymError> {
  let mut sessions = state.sessions.write().await;
  let s = sessions.get_mut(&session_id).ok_or(GymError::UnknownSession(session_id))?;
  s.restart(Utc::now());
  info!(target: "session", %session_id, "Session restarted");
  Ok(SessionOut { session_id: session_id.to_string(), phase: Phase::Instructions, plan: plan_out(state) })
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn session_summary(state: &AppState, session_id: Uuid) -> Result<SummaryOut, GymError> {
  let sessions = state.sessions.read().await;
  let s = sessions.get(&session_id).ok_or(GymError::UnknownSession(session_id))?;
  Ok(summary_to_out(&s.summary()?))
}

fn parse_rank_label(raw: &str) -> Result<RankLabel, GymError> {
  RankLabel::parse(raw).ok_or_else(|| {
    GymError::Validation(format!("tier must be one of beginner|mid|expert|master, got '{raw}'"))
  })
}

#[instrument(level = "info", skip(state))]
pub async fn board_entries(state: &AppState, tier: Option<String>) -> Result<Vec<EntryOut>, GymError> {
  let tier = match tier {
    Some(raw) => Some(parse_rank_label(&raw)?),
    None => None,
  };
  let entries = state.store.ranked(tier, state.cfg.board.fetch_limit).await?;
  Ok(entries.iter().map(entry_to_out).collect())
}

/// External submission path (the SPA posting a finished run directly).
#[instrument(level = "info", skip(state, body), fields(score = body.score))]
pub async fn submit_entry(state: &AppState, body: EntryIn) -> Result<EntryOut, GymError> {
  let tier = parse_rank_label(&body.tier)?;
  let entry = NewEntry {
    name: body.name,
    score: body.score,
    accuracy: body.accuracy,
    time_taken_secs: body.time_taken_secs,
    tier,
    social_handle: body.social_handle,
  };
  let stored = state.store.insert(&entry).await?;
  Ok(entry_to_out(&stored))
}

#[instrument(level = "info", skip(state))]
pub async fn recent_handles(state: &AppState) -> Result<Vec<String>, GymError> {
  state.store.recent_handles(state.cfg.board.handle_limit).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::GymConfig;
  use crate::store::ScoreStore;

  async fn gym(cfg: GymConfig) -> AppState {
    let store = ScoreStore::connect("sqlite::memory:").await.unwrap();
    AppState::new(cfg, store).unwrap()
  }

  fn short_plan() -> GymConfig {
    let mut cfg = GymConfig::default();
    cfg.session.beginner = 1;
    cfg.session.mid = 1;
    cfg.session.expert = 1;
    cfg
  }

  async fn current_correct_side(state: &AppState, id: Uuid) -> Side {
    let sessions = state.sessions.read().await;
    sessions.get(&id).unwrap().placement.unwrap().correct_side
  }

  fn flip(side: Side) -> Side {
    match side {
      Side::Left => Side::Right,
      Side::Right => Side::Left,
    }
  }

  /// Walk a session to completion, answering via `pick` per question index.
  async fn play(state: &AppState, id: Uuid, pick: impl Fn(usize, Side) -> Side) -> SummaryOut {
    let mut index = 0;
    loop {
      let side = current_correct_side(state, id).await;
      submit_answer(state, id, pick(index, side)).await.unwrap();
      index += 1;

      let advanced = advance_session(state, id).await.unwrap();
      match advanced.phase {
        Phase::QuestionActive => {}
        Phase::TierComplete => {
          let next = advance_session(state, id).await.unwrap();
          assert_eq!(next.phase, Phase::QuestionActive);
          assert!(next.question.is_some());
        }
        Phase::SessionComplete => return advanced.summary.unwrap(),
        other => panic!("unexpected phase {other:?}"),
      }
    }
  }

  #[tokio::test]
  async fn perfect_run_lands_on_the_board_as_master() {
    let state = gym(GymConfig::default()).await;
    let session = create_session(&state).await;
    let id = parse_session_id(&session.session_id).unwrap();

    let first = begin_session(&state, id, Some("Ada".into()), Some("ada".into())).await.unwrap();
    assert_eq!(first.index, 0);
    assert_eq!(first.total, 20);
    assert!(first.answered.is_none());

    let summary = play(&state, id, |_, correct| correct).await;
    assert_eq!(summary.score, 2000);
    assert_eq!(summary.accuracy, 100);
    assert_eq!(summary.tier, RankLabel::Master);
    assert_eq!(summary.social_handle.as_deref(), Some("@ada"));

    match &summary.submission {
      SubmissionStatus::Accepted { entry_id } => {
        let board = board_entries(&state, Some("master".into())).await.unwrap();
        assert_eq!(board[0].id, *entry_id, "a perfect run must sit at the top of its rank");
        assert_eq!(board[0].score, 2000);
        assert_eq!(board[0].tier, RankLabel::Master);
      }
      other => panic!("expected an accepted submission, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn mixed_run_earns_the_matching_rank() {
    let state = gym(short_plan()).await;
    let session = create_session(&state).await;
    let id = parse_session_id(&session.session_id).unwrap();
    begin_session(&state, id, Some("Bo".into()), None).await.unwrap();

    // Two right, one wrong: 200 coins, 67% accuracy, mid rank.
    let summary = play(&state, id, |i, correct| if i == 1 { flip(correct) } else { correct }).await;
    assert_eq!(summary.score, 200);
    assert_eq!(summary.accuracy, 67);
    assert_eq!(summary.tier, RankLabel::Mid);

    let board = board_entries(&state, Some("mid".into())).await.unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].name, "Bo");
  }

  #[tokio::test]
  async fn nameless_run_fails_submission_validation() {
    let state = gym(short_plan()).await;
    let session = create_session(&state).await;
    let id = parse_session_id(&session.session_id).unwrap();
    begin_session(&state, id, None, None).await.unwrap();

    let summary = play(&state, id, |_, correct| correct).await;
    match &summary.submission {
      SubmissionStatus::Failed { kind, .. } => assert_eq!(*kind, SubmitFailureKind::Validation),
      other => panic!("expected a validation failure, got {other:?}"),
    }
    assert!(board_entries(&state, None).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn unknown_session_is_reported_as_such() {
    let state = gym(GymConfig::default()).await;
    let ghost = Uuid::new_v4();
    assert!(matches!(
      begin_session(&state, ghost, None, None).await.unwrap_err(),
      GymError::UnknownSession(id) if id == ghost
    ));
    assert!(matches!(
      session_summary(&state, ghost).await.unwrap_err(),
      GymError::UnknownSession(_)
    ));
  }

  #[tokio::test]
  async fn unknown_session_outranks_an_undrawable_plan() {
    // Startup only checks composition, so an oversized draw plan survives
    // until session start. A bogus id must still come back as unknown.
    let mut cfg = GymConfig::default();
    cfg.session.beginner = 99;
    let state = gym(cfg).await;
    let ghost = Uuid::new_v4();
    assert!(matches!(
      begin_session(&state, ghost, None, None).await.unwrap_err(),
      GymError::UnknownSession(id) if id == ghost
    ));

    // With a real session the plan fault itself still surfaces.
    let session = create_session(&state).await;
    let id = parse_session_id(&session.session_id).unwrap();
    assert!(matches!(
      begin_session(&state, id, None, None).await.unwrap_err(),
      GymError::Catalog(_)
    ));
  }

  #[tokio::test]
  async fn malformed_session_ids_are_rejected() {
    assert!(matches!(parse_session_id("not-a-uuid"), Err(GymError::Validation(_))));
  }

  #[tokio::test]
  async fn board_rejects_labels_outside_the_four() {
    let state = gym(GymConfig::default()).await;
    let err = board_entries(&state, Some("diamond".into())).await.unwrap_err();
    assert!(matches!(err, GymError::Validation(_)));
  }

  #[tokio::test]
  async fn external_entries_are_validated_and_stored() {
    let state = gym(GymConfig::default()).await;
    let stored = submit_entry(
      &state,
      EntryIn {
        name: "Remote".into(),
        score: 700,
        accuracy: 70,
        time_taken_secs: 321,
        tier: "mid".into(),
        social_handle: Some("remote".into()),
      },
    )
    .await
    .unwrap();
    assert_eq!(stored.tier, RankLabel::Mid);
    assert_eq!(stored.social_handle.as_deref(), Some("@remote"));

    let err = submit_entry(
      &state,
      EntryIn {
        name: "Remote".into(),
        score: 700,
        accuracy: 70,
        time_taken_secs: 321,
        tier: "gold".into(),
        social_handle: None,
      },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, GymError::Validation(_)));

    let handles = recent_handles(&state).await.unwrap();
    assert_eq!(handles, vec!["@remote".to_string()]);
  }

  #[tokio::test]
  async fn restart_clears_the_run_for_another_go() {
    let state = gym(short_plan()).await;
    let session = create_session(&state).await;
    let id = parse_session_id(&session.session_id).unwrap();
    begin_session(&state, id, Some("Ada".into()), None).await.unwrap();
    play(&state, id, |_, correct| correct).await;

    let restarted = restart_session(&state, id).await.unwrap();
    assert_eq!(restarted.phase, Phase::Instructions);
    assert!(matches!(
      session_summary(&state, id).await.unwrap_err(),
      GymError::PhaseConflict { .. }
    ));

    let first = begin_session(&state, id, None, None).await.unwrap();
    assert_eq!(first.index, 0);
  }
}
