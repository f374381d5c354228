//! The session engine: question selection, option placement, the coin
//! ledger, and the phase machine driving one run from the instructions
//! screen to the summary.
//!
//! Flow:
//! 1) `select_questions` draws a per-tier sample from the validated catalog.
//! 2) Each display of an unanswered question rolls a fresh placement; the
//!    placement freezes the moment an answer is graded.
//! 3) Correct answers credit the ledger exactly once per question index.
//! 4) `advance` walks QuestionAnswered into the next question, a tier
//!    checkpoint, or session completion.
//!
//! All randomness flows through a caller-provided `rand::Rng`, so tests can
//! pin orderings with a seeded generator.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::catalog::{self, CatalogError};
use crate::config::{CatalogCfg, SessionCfg};
use crate::domain::{NewEntry, Placement, Question, RankLabel, Side, Tier};
use crate::error::GymError;
use crate::util;

/// Where a session currently is.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Instructions,
  QuestionActive,
  QuestionAnswered,
  TierComplete,
  SessionComplete,
}

impl Phase {
  pub fn as_str(self) -> &'static str {
    match self {
      Phase::Instructions => "instructions",
      Phase::QuestionActive => "question_active",
      Phase::QuestionAnswered => "question_answered",
      Phase::TierComplete => "tier_complete",
      Phase::SessionComplete => "session_complete",
    }
  }
}

/// Draw one session's question list: per tier, filter, split by kind, check
/// the exact composition, shuffle each kind, shuffle the merged pool, and
/// take the tier's sample off the front. Tiers are concatenated in play
/// order, so difficulty never decreases along the list.
pub fn select_questions<R: Rng>(
  catalog: &[Question],
  plan: &SessionCfg,
  composition: &CatalogCfg,
  rng: &mut R,
) -> Result<Vec<Question>, CatalogError> {
  let mut out: Vec<Question> = Vec::with_capacity(plan.total());
  for tier in Tier::ALL {
    let mut images: Vec<&Question> =
      catalog.iter().filter(|q| q.tier == tier && q.kind == crate::domain::QuestionKind::Image).collect();
    let mut typefaces: Vec<&Question> =
      catalog.iter().filter(|q| q.tier == tier && q.kind == crate::domain::QuestionKind::Typeface).collect();
    catalog::check_tier(tier, &images, &typefaces, composition.for_tier(tier))?;

    images.shuffle(rng);
    typefaces.shuffle(rng);
    let mut pool = images;
    pool.append(&mut typefaces);
    pool.shuffle(rng);

    let want = plan.sample_for(tier);
    if want > pool.len() {
      return Err(CatalogError::SampleExceedsPool { tier: tier.as_str(), want, have: pool.len() });
    }
    out.extend(pool.into_iter().take(want).cloned());
  }
  Ok(out)
}

/// One fair coin flip: which side does the correct option land on?
pub fn place_options<R: Rng>(rng: &mut R) -> Placement {
  let correct_side = if rng.gen_bool(0.5) { Side::Left } else { Side::Right };
  Placement { correct_side }
}

/// Per-session coin accumulator. The total never decreases and each
/// question index credits at most once; wrong answers lock the index
/// without paying.
#[derive(Clone, Debug, Default)]
pub struct CoinLedger {
  coins: u32,
  answered: HashSet<usize>,
}

impl CoinLedger {
  pub fn coins(&self) -> u32 {
    self.coins
  }

  pub fn answered_count(&self) -> usize {
    self.answered.len()
  }

  pub fn is_answered(&self, index: usize) -> bool {
    self.answered.contains(&index)
  }

  /// Lock `index` without credit.
  pub fn mark(&mut self, index: usize) {
    self.answered.insert(index);
  }

  /// Credit `reward` for `index` unless the index is already locked.
  /// Returns the running total.
  pub fn credit(&mut self, index: usize, reward: u32) -> u32 {
    if self.answered.insert(index) {
      self.coins += reward;
    }
    self.coins
  }
}

/// The graded answer for the current question, kept until `advance` moves on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerRecord {
  pub picked: Side,
  pub correct: bool,
  pub awarded: u32,
}

/// What `serve` hands the surface layer for rendering.
#[derive(Clone, Debug)]
pub struct ServedQuestion {
  pub question: Question,
  pub placement: Placement,
  pub index: usize,
  pub total: usize,
  pub coins: u32,
  pub answered: Option<AnswerRecord>,
}

/// What `answer` hands back; replaying the same question returns the same
/// outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
  pub correct: bool,
  pub correct_side: Side,
  pub explanation: String,
  pub awarded: u32,
  pub coins: u32,
}

/// Data shown on the between-tiers screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
  pub finished_tier: Tier,
  pub next_tier: Tier,
  pub coins: u32,
  pub answered: usize,
}

/// Result of an `advance` call.
#[derive(Clone, Debug, PartialEq)]
pub enum Advanced {
  NextQuestion,
  TierBreak(Checkpoint),
  Finished,
}

/// How a submit attempt failed; drives log severity and the summary screen.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmitFailureKind {
  Validation,
  Transient,
  Server,
}

/// Outcome of posting the finished run to the leaderboard.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionStatus {
  Pending,
  Accepted { entry_id: String },
  Failed { kind: SubmitFailureKind, message: String },
}

/// Everything the summary screen needs for one finished run.
#[derive(Clone, Debug)]
pub struct SessionSummary {
  pub name: String,
  pub score: u32,
  pub accuracy: u32,
  pub time_taken_secs: u32,
  pub rank: RankLabel,
  pub social_handle: Option<String>,
  pub submission: SubmissionStatus,
}

/// A single player's run, owned by the live-session map.
#[derive(Clone, Debug)]
pub struct Session {
  pub questions: Vec<Question>,
  pub phase: Phase,
  pub current: usize,
  pub placement: Option<Placement>,
  pub last_answer: Option<AnswerRecord>,
  pub ledger: CoinLedger,
  pub name: Option<String>,
  pub social_handle: Option<String>,
  pub coin_reward: u32,
  pub started_at: Option<DateTime<Utc>>,
  pub finished_at: Option<DateTime<Utc>>,
  pub submission: Option<SubmissionStatus>,
  pub touched_at: DateTime<Utc>,
}

impl Session {
  pub fn new(coin_reward: u32, now: DateTime<Utc>) -> Session {
    Session {
      questions: Vec::new(),
      phase: Phase::Instructions,
      current: 0,
      placement: None,
      last_answer: None,
      ledger: CoinLedger::default(),
      name: None,
      social_handle: None,
      coin_reward,
      started_at: None,
      finished_at: None,
      submission: None,
      touched_at: now,
    }
  }

  fn conflict(&self, hint: &'static str) -> GymError {
    GymError::PhaseConflict { phase: self.phase.as_str(), hint }
  }

  /// Leave the instructions screen with a freshly selected question list.
  /// Provided identity fields overwrite what a previous run captured.
  pub fn begin(
    &mut self,
    name: Option<String>,
    social_handle: Option<String>,
    questions: Vec<Question>,
    now: DateTime<Utc>,
  ) -> Result<(), GymError> {
    if self.phase != Phase::Instructions {
      return Err(self.conflict("restart to draw a fresh question set"));
    }
    if questions.is_empty() {
      return Err(GymError::validation("a session needs at least one question"));
    }
    if let Some(n) = name {
      self.name = util::clean_name(&n);
    }
    if let Some(h) = social_handle {
      self.social_handle = util::normalize_handle(Some(&h));
    }
    self.questions = questions;
    self.current = 0;
    self.placement = None;
    self.last_answer = None;
    self.ledger = CoinLedger::default();
    self.started_at = Some(now);
    self.finished_at = None;
    self.submission = None;
    self.phase = Phase::QuestionActive;
    self.touched_at = now;
    Ok(())
  }

  /// Produce the current question for display. While unanswered, every call
  /// rolls a fresh placement; once answered, the placement that was graded
  /// stays frozen.
  pub fn serve<R: Rng>(&mut self, rng: &mut R, now: DateTime<Utc>) -> Result<ServedQuestion, GymError> {
    let placement = match self.phase {
      Phase::QuestionActive => {
        let p = place_options(rng);
        self.placement = Some(p);
        p
      }
      Phase::QuestionAnswered => match self.placement {
        Some(p) => p,
        None => return Err(GymError::validation("answered question lost its placement")),
      },
      _ => return Err(self.conflict("no question is on screen")),
    };
    self.touched_at = now;
    Ok(ServedQuestion {
      question: self.questions[self.current].clone(),
      placement,
      index: self.current,
      total: self.questions.len(),
      coins: self.ledger.coins(),
      answered: self.last_answer,
    })
  }

  /// Grade a pick against the placement the question was last displayed
  /// with. Replays of an already-graded question return the recorded
  /// outcome and never touch the ledger.
  pub fn answer(&mut self, picked: Side, now: DateTime<Utc>) -> Result<AnswerOutcome, GymError> {
    match self.phase {
      Phase::QuestionAnswered => {
        let placement = self
          .placement
          .ok_or_else(|| GymError::validation("answered question lost its placement"))?;
        let record = self
          .last_answer
          .ok_or_else(|| GymError::validation("answered question lost its grade"))?;
        self.touched_at = now;
        Ok(AnswerOutcome {
          correct: record.correct,
          correct_side: placement.correct_side,
          explanation: self.questions[self.current].explanation.clone(),
          awarded: record.awarded,
          coins: self.ledger.coins(),
        })
      }
      Phase::QuestionActive => {
        let placement = self
          .placement
          .ok_or_else(|| GymError::validation("question has not been displayed yet"))?;
        let correct = placement.is_correct(picked);
        let awarded = if correct {
          let before = self.ledger.coins();
          self.ledger.credit(self.current, self.coin_reward) - before
        } else {
          self.ledger.mark(self.current);
          0
        };
        self.last_answer = Some(AnswerRecord { picked, correct, awarded });
        self.phase = Phase::QuestionAnswered;
        self.touched_at = now;
        Ok(AnswerOutcome {
          correct,
          correct_side: placement.correct_side,
          explanation: self.questions[self.current].explanation.clone(),
          awarded,
          coins: self.ledger.coins(),
        })
      }
      _ => Err(self.conflict("answer a question that is on screen")),
    }
  }

  /// Move past a graded question: into the next question, into a tier
  /// checkpoint when the tier changes, or into session completion after the
  /// final question.
  pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Advanced, GymError> {
    self.touched_at = now;
    match self.phase {
      Phase::QuestionAnswered => {
        if self.current + 1 == self.questions.len() {
          self.finished_at = Some(now);
          self.phase = Phase::SessionComplete;
          return Ok(Advanced::Finished);
        }
        let here = self.questions[self.current].tier;
        let next = self.questions[self.current + 1].tier;
        if here != next {
          self.phase = Phase::TierComplete;
          return Ok(Advanced::TierBreak(Checkpoint {
            finished_tier: here,
            next_tier: next,
            coins: self.ledger.coins(),
            answered: self.ledger.answered_count(),
          }));
        }
        self.step_into(self.current + 1);
        Ok(Advanced::NextQuestion)
      }
      Phase::TierComplete => {
        self.step_into(self.current + 1);
        Ok(Advanced::NextQuestion)
      }
      _ => Err(self.conflict("nothing to advance past")),
    }
  }

  fn step_into(&mut self, index: usize) {
    self.current = index;
    self.placement = None;
    self.last_answer = None;
    self.phase = Phase::QuestionActive;
  }

  /// Back to the instructions screen. Clears the run (questions, index,
  /// coins, answered set, timestamps) but keeps the captured identity; the
  /// next `begin` draws a fresh question list.
  pub fn restart(&mut self, now: DateTime<Utc>) {
    self.questions = Vec::new();
    self.phase = Phase::Instructions;
    self.current = 0;
    self.placement = None;
    self.last_answer = None;
    self.ledger = CoinLedger::default();
    self.started_at = None;
    self.finished_at = None;
    self.submission = None;
    self.touched_at = now;
  }

  /// Percentage of the maximum possible coins, rounded half-up.
  pub fn accuracy(&self) -> u32 {
    let denom = (self.questions.len() as u64) * (self.coin_reward as u64);
    if denom == 0 {
      return 0;
    }
    let num = (self.ledger.coins() as u64) * 100;
    ((num + denom / 2) / denom) as u32
  }

  pub fn time_taken_secs(&self) -> u32 {
    match (self.started_at, self.finished_at) {
      (Some(start), Some(end)) => (end - start).num_seconds().max(0) as u32,
      _ => 0,
    }
  }

  /// The leaderboard payload for this run, as it stands.
  pub fn submission_entry(&self) -> NewEntry {
    let accuracy = self.accuracy();
    NewEntry {
      name: self.name.clone().unwrap_or_default(),
      score: self.ledger.coins(),
      accuracy,
      time_taken_secs: self.time_taken_secs(),
      tier: RankLabel::from_accuracy(accuracy),
      social_handle: self.social_handle.clone(),
    }
  }

  pub fn summary(&self) -> Result<SessionSummary, GymError> {
    if self.phase != Phase::SessionComplete {
      return Err(self.conflict("finish the run first"));
    }
    let accuracy = self.accuracy();
    Ok(SessionSummary {
      name: self.name.clone().unwrap_or_default(),
      score: self.ledger.coins(),
      accuracy,
      time_taken_secs: self.time_taken_secs(),
      rank: RankLabel::from_accuracy(accuracy),
      social_handle: self.social_handle.clone(),
      submission: self.submission.clone().unwrap_or(SubmissionStatus::Pending),
    })
  }
}
