//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! Nothing in here reveals the correct side of an unanswered question: the
//! options are already shuffled into `left`/`right` by the session engine
//! and the grading fields only appear after an answer is recorded.

use serde::{Deserialize, Serialize};

use crate::domain::{Entry, QuestionKind, RankLabel, Side, Tier};
use crate::session::{
    AnswerOutcome, Checkpoint, Phase, ServedQuestion, SessionSummary, SubmissionStatus,
};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    CreateSession,
    Begin {
        #[serde(rename = "sessionId")]
        session_id: String,
        name: Option<String>,
        #[serde(rename = "socialHandle")]
        social_handle: Option<String>,
    },
    Question {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Answer {
        #[serde(rename = "sessionId")]
        session_id: String,
        side: Side,
    },
    Advance {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Restart {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Summary {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Board {
        tier: Option<String>,
    },
    Handles,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Session {
        session: SessionOut,
    },
    Question {
        question: QuestionOut,
    },
    AnswerResult {
        result: AnswerOut,
    },
    Advanced {
        advance: AdvanceOut,
    },
    Summary {
        summary: SummaryOut,
    },
    Board {
        entries: Vec<EntryOut>,
    },
    Handles {
        handles: Vec<String>,
    },
    Error {
        message: String,
    },
}

/// DTO for session creation and restart acknowledgements.
#[derive(Debug, Serialize)]
pub struct SessionOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub phase: Phase,
    pub plan: PlanOut,
}

/// The per-tier draw counts and the payout, for the instructions screen.
#[derive(Debug, Serialize)]
pub struct PlanOut {
    pub beginner: usize,
    pub mid: usize,
    pub expert: usize,
    #[serde(rename = "questionCount")]
    pub question_count: usize,
    #[serde(rename = "coinReward")]
    pub coin_reward: u32,
}

#[derive(Debug, Deserialize, Default)]
pub struct BeginIn {
    pub name: Option<String>,
    #[serde(rename = "socialHandle")]
    pub social_handle: Option<String>,
}

/// DTO used by both WS and HTTP for question delivery.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub index: usize,
    pub total: usize,
    pub tier: Tier,
    pub kind: QuestionKind,
    pub prompt: String,
    pub left: String,
    pub right: String,
    pub coins: u32,
    /// Present only after the question was graded.
    pub answered: Option<AnsweredOut>,
}

#[derive(Debug, Serialize)]
pub struct AnsweredOut {
    pub picked: Side,
    pub correct: bool,
}

/// Lay the served question out left/right according to its placement.
pub fn question_to_out(served: &ServedQuestion) -> QuestionOut {
    let (left, right) = match served.placement.correct_side {
        Side::Left => (served.question.option_a.clone(), served.question.option_b.clone()),
        Side::Right => (served.question.option_b.clone(), served.question.option_a.clone()),
    };
    QuestionOut {
        index: served.index,
        total: served.total,
        tier: served.question.tier,
        kind: served.question.kind,
        prompt: served.question.prompt.clone(),
        left,
        right,
        coins: served.coins,
        answered: served.answered.map(|a| AnsweredOut { picked: a.picked, correct: a.correct }),
    }
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    pub side: Side,
}

#[derive(Debug, Serialize)]
pub struct AnswerOut {
    pub correct: bool,
    #[serde(rename = "correctSide")]
    pub correct_side: Side,
    pub explanation: String,
    pub awarded: u32,
    pub coins: u32,
}

pub fn answer_to_out(outcome: &AnswerOutcome) -> AnswerOut {
    AnswerOut {
        correct: outcome.correct,
        correct_side: outcome.correct_side,
        explanation: outcome.explanation.clone(),
        awarded: outcome.awarded,
        coins: outcome.coins,
    }
}

/// Result of an advance call; exactly one of the optional parts is set.
#[derive(Debug, Serialize)]
pub struct AdvanceOut {
    pub phase: Phase,
    pub question: Option<QuestionOut>,
    pub checkpoint: Option<CheckpointOut>,
    pub summary: Option<SummaryOut>,
}

/// The between-tiers screen.
#[derive(Debug, Serialize)]
pub struct CheckpointOut {
    #[serde(rename = "finishedTier")]
    pub finished_tier: Tier,
    #[serde(rename = "nextTier")]
    pub next_tier: Tier,
    pub coins: u32,
    pub answered: usize,
}

pub fn checkpoint_to_out(cp: &Checkpoint) -> CheckpointOut {
    CheckpointOut {
        finished_tier: cp.finished_tier,
        next_tier: cp.next_tier,
        coins: cp.coins,
        answered: cp.answered,
    }
}

/// The summary screen for one finished run.
#[derive(Debug, Serialize)]
pub struct SummaryOut {
    pub name: String,
    pub score: u32,
    pub accuracy: u32,
    #[serde(rename = "timeTaken")]
    pub time_taken_secs: u32,
    pub tier: RankLabel,
    #[serde(rename = "socialHandle")]
    pub social_handle: Option<String>,
    pub submission: SubmissionStatus,
}

pub fn summary_to_out(summary: &SessionSummary) -> SummaryOut {
    SummaryOut {
        name: summary.name.clone(),
        score: summary.score,
        accuracy: summary.accuracy,
        time_taken_secs: summary.time_taken_secs,
        tier: summary.rank,
        social_handle: summary.social_handle.clone(),
        submission: summary.submission.clone(),
    }
}

//
// Leaderboard DTOs
//

/// External submission payload; `tier` arrives as a string and is parsed
/// against the four accepted labels.
#[derive(Debug, Deserialize)]
pub struct EntryIn {
    pub name: String,
    pub score: u32,
    pub accuracy: u32,
    #[serde(rename = "timeTaken")]
    pub time_taken_secs: u32,
    pub tier: String,
    #[serde(rename = "socialHandle")]
    #[serde(default)]
    pub social_handle: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EntryOut {
    pub id: String,
    pub name: String,
    pub score: u32,
    pub accuracy: u32,
    #[serde(rename = "timeTaken")]
    pub time_taken_secs: u32,
    pub tier: RankLabel,
    #[serde(rename = "socialHandle")]
    pub social_handle: Option<String>,
    #[serde(rename = "submittedAt")]
    pub submitted_at: String,
}

pub fn entry_to_out(e: &Entry) -> EntryOut {
    EntryOut {
        id: e.id.clone(),
        name: e.name.clone(),
        score: e.score,
        accuracy: e.accuracy,
        time_taken_secs: e.time_taken_secs,
        tier: e.tier,
        social_handle: e.social_handle.clone(),
        submitted_at: e.submitted_at.to_rfc3339(),
    }
}

#[derive(Debug, Deserialize)]
pub struct BoardQuery {
    pub tier: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HandlesOut {
    pub handles: Vec<String>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Placement, Question};
    use crate::session::AnswerRecord;

    fn served(correct_side: Side) -> ServedQuestion {
        ServedQuestion {
            question: Question {
                id: "q".into(),
                tier: Tier::Beginner,
                kind: QuestionKind::Image,
                prompt: "Which?".into(),
                option_a: "correct.png".into(),
                option_b: "weaker.png".into(),
                explanation: "because".into(),
            },
            placement: Placement { correct_side },
            index: 0,
            total: 20,
            coins: 0,
            answered: None,
        }
    }

    #[test]
    fn placement_drives_left_right_layout() {
        let out = question_to_out(&served(Side::Left));
        assert_eq!(out.left, "correct.png");
        assert_eq!(out.right, "weaker.png");

        let out = question_to_out(&served(Side::Right));
        assert_eq!(out.left, "weaker.png");
        assert_eq!(out.right, "correct.png");
    }

    #[test]
    fn unanswered_question_leaks_no_grading_fields() {
        let out = question_to_out(&served(Side::Left));
        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("answered").unwrap().is_null());
        assert!(json.get("correctSide").is_none());
        assert!(json.get("explanation").is_none());
        // Option strings are present, but nothing marks which one wins.
        assert_eq!(json.get("left").unwrap(), "correct.png");
    }

    #[test]
    fn answered_question_carries_the_grade() {
        let mut s = served(Side::Right);
        s.answered = Some(AnswerRecord { picked: Side::Left, correct: false, awarded: 0 });
        let json = serde_json::to_value(question_to_out(&s)).unwrap();
        assert_eq!(json["answered"]["picked"], "left");
        assert_eq!(json["answered"]["correct"], false);
    }

    #[test]
    fn ws_client_messages_parse() {
        let msg: ClientWsMessage = serde_json::from_str(
            r#"{"type":"answer","sessionId":"abc","side":"left"}"#,
        )
        .unwrap();
        match msg {
            ClientWsMessage::Answer { session_id, side } => {
                assert_eq!(session_id, "abc");
                assert_eq!(side, Side::Left);
            }
            other => panic!("unexpected message: {other:?}"),
        }

        let msg: ClientWsMessage =
            serde_json::from_str(r#"{"type":"board","tier":"master"}"#).unwrap();
        assert!(matches!(msg, ClientWsMessage::Board { tier: Some(t) } if t == "master"));
    }

    #[test]
    fn submission_status_serializes_with_state_tag() {
        let json = serde_json::to_value(SubmissionStatus::Failed {
            kind: crate::session::SubmitFailureKind::Transient,
            message: "connection reset".into(),
        })
        .unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["kind"], "transient");

        let json = serde_json::to_value(SubmissionStatus::Accepted { entry_id: "e1".into() }).unwrap();
        assert_eq!(json["state"], "accepted");
    }
}
