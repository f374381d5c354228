//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::GymError;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "gym_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "gym_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "gym_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "gym_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "gym_backend", "WebSocket disconnected");
}

/// Dispatch one parsed client message. Errors never tear the socket down;
/// they come back as a typed `error` message on the same connection.
#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  dispatch(msg, state)
    .await
    .unwrap_or_else(|e| ServerWsMessage::Error { message: e.to_string() })
}

async fn dispatch(msg: ClientWsMessage, state: &AppState) -> Result<ServerWsMessage, GymError> {
  match msg {
    ClientWsMessage::Ping => Ok(ServerWsMessage::Pong),

    ClientWsMessage::CreateSession => {
      let session = create_session(state).await;
      tracing::info!(target: "session", id = %session.session_id, "WS session created");
      Ok(ServerWsMessage::Session { session })
    }

    ClientWsMessage::Begin { session_id, name, social_handle } => {
      let id = parse_session_id(&session_id)?;
      let question = begin_session(state, id, name, social_handle).await?;
      tracing::info!(target: "session", %id, total = question.total, "WS session began");
      Ok(ServerWsMessage::Question { question })
    }

    ClientWsMessage::Question { session_id } => {
      let id = parse_session_id(&session_id)?;
      Ok(ServerWsMessage::Question { question: serve_question(state, id).await? })
    }

    ClientWsMessage::Answer { session_id, side } => {
      let id = parse_session_id(&session_id)?;
      let result = submit_answer(state, id, side).await?;
      tracing::info!(target: "session", %id, correct = result.correct, "WS answer evaluated");
      Ok(ServerWsMessage::AnswerResult { result })
    }

    ClientWsMessage::Advance { session_id } => {
      let id = parse_session_id(&session_id)?;
      let advance = advance_session(state, id).await?;
      tracing::info!(target: "session", %id, phase = advance.phase.as_str(), "WS advanced");
      Ok(ServerWsMessage::Advanced { advance })
    }

    ClientWsMessage::Restart { session_id } => {
      let id = parse_session_id(&session_id)?;
      Ok(ServerWsMessage::Session { session: restart_session(state, id).await? })
    }

    ClientWsMessage::Summary { session_id } => {
      let id = parse_session_id(&session_id)?;
      Ok(ServerWsMessage::Summary { summary: session_summary(state, id).await? })
    }

    ClientWsMessage::Board { tier } => {
      let entries = board_entries(state, tier).await?;
      tracing::info!(target: "board", count = entries.len(), "WS ranked entries served");
      Ok(ServerWsMessage::Board { entries })
    }

    ClientWsMessage::Handles =>
      Ok(ServerWsMessage::Handles { handles: recent_handles(state).await? }),
  }
}
