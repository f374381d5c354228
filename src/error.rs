//! Error taxonomy shared by the HTTP and WebSocket surfaces.
//!
//! Catalog and database problems are server faults (500), an unknown session
//! id is a 404, calling an operation in the wrong phase is a 409, and bad
//! input is a 400.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::CatalogError;

#[derive(Error, Debug)]
pub enum GymError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("unknown session {0}")]
    UnknownSession(Uuid),

    #[error("not allowed while {phase}: {hint}")]
    PhaseConflict { phase: &'static str, hint: &'static str },

    #[error("{0}")]
    Validation(String),

    #[error("stored entry is corrupt: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl GymError {
    pub fn validation(msg: impl Into<String>) -> GymError {
        GymError::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GymError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GymError::UnknownSession(_) => StatusCode::NOT_FOUND,
            GymError::PhaseConflict { .. } => StatusCode::CONFLICT,
            GymError::Validation(_) => StatusCode::BAD_REQUEST,
            GymError::Corrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GymError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GymError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(GymError::UnknownSession(Uuid::nil()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            GymError::PhaseConflict { phase: "instructions", hint: "begin first" }.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(GymError::validation("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(GymError::Corrupt("tier".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
