//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and log include parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::GymError;
use crate::protocol::*;
use crate::state::AppState;
use crate::logic::*;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let session = create_session(&state).await;
  info!(target: "session", id = %session.session_id, "HTTP session created");
  Json(session)
}

#[instrument(level = "info", skip(state, body), fields(%id, named = body.name.is_some()))]
pub async fn http_post_begin(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<BeginIn>,
) -> Result<Json<QuestionOut>, GymError> {
  let id = parse_session_id(&id)?;
  let question = begin_session(&state, id, body.name, body.social_handle).await?;
  info!(target: "session", %id, total = question.total, "HTTP session began");
  Ok(Json(question))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_question(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<QuestionOut>, GymError> {
  let id = parse_session_id(&id)?;
  let question = serve_question(&state, id).await?;
  info!(target: "session", %id, index = question.index, "HTTP question served");
  Ok(Json(question))
}

#[instrument(level = "info", skip(state, body), fields(%id, side = body.side.as_str()))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<AnswerOut>, GymError> {
  let id = parse_session_id(&id)?;
  let result = submit_answer(&state, id, body.side).await?;
  info!(target: "session", %id, correct = result.correct, "HTTP answer evaluated");
  Ok(Json(result))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_post_advance(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<AdvanceOut>, GymError> {
  let id = parse_session_id(&id)?;
  let advanced = advance_session(&state, id).await?;
  info!(target: "session", %id, phase = advanced.phase.as_str(), "HTTP advanced");
  Ok(Json(advanced))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_post_restart(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionOut>, GymError> {
  let id = parse_session_id(&id)?;
  let session = restart_session(&state, id).await?;
  Ok(Json(session))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_summary(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SummaryOut>, GymError> {
  let id = parse_session_id(&id)?;
  let summary = session_summary(&state, id).await?;
  Ok(Json(summary))
}

#[instrument(level = "info", skip(state), fields(tier = q.tier.as_deref().unwrap_or("all")))]
pub async fn http_get_entries(
  State(state): State<Arc<AppState>>,
  Query(q): Query<BoardQuery>,
) -> Result<Json<Vec<EntryOut>>, GymError> {
  let entries = board_entries(&state, q.tier).await?;
  info!(target: "board", count = entries.len(), "HTTP ranked entries served");
  Ok(Json(entries))
}

#[instrument(level = "info", skip(state, body), fields(score = body.score, tier = %body.tier))]
pub async fn http_post_entry(
  State(state): State<Arc<AppState>>,
  Json(body): Json<EntryIn>,
) -> Result<Json<EntryOut>, GymError> {
  let stored = submit_entry(&state, body).await?;
  info!(target: "board", id = %stored.id, "HTTP entry stored");
  Ok(Json(stored))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_handles(
  State(state): State<Arc<AppState>>,
) -> Result<Json<HandlesOut>, GymError> {
  let handles = recent_handles(&state).await?;
  Ok(Json(HandlesOut { handles }))
}
