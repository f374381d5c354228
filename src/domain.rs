//! Domain models used by the backend: tiers, question kinds, questions, and
//! leaderboard entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty bucket a question belongs to. Sessions always play the buckets
/// in the order of [`Tier::ALL`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
  Beginner,
  Mid,
  Expert,
}
impl Default for Tier {
  fn default() -> Self { Tier::Beginner }
}

impl Tier {
  /// Play order: beginner first, expert last.
  pub const ALL: [Tier; 3] = [Tier::Beginner, Tier::Mid, Tier::Expert];

  pub fn as_str(self) -> &'static str {
    match self {
      Tier::Beginner => "beginner",
      Tier::Mid => "mid",
      Tier::Expert => "expert",
    }
  }

  pub fn parse(s: &str) -> Option<Tier> {
    match s.trim().to_ascii_lowercase().as_str() {
      "beginner" => Some(Tier::Beginner),
      "mid" => Some(Tier::Mid),
      "expert" => Some(Tier::Expert),
      _ => None,
    }
  }

  /// Difficulty rank, non-decreasing along [`Tier::ALL`].
  pub fn rank(self) -> u8 {
    match self {
      Tier::Beginner => 0,
      Tier::Mid => 1,
      Tier::Expert => 2,
    }
  }
}

/// What is being compared in a question?
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
  /// Two rendered design screenshots; options are asset paths.
  Image,
  /// Two typeface choices; options are font names or settings.
  Typeface,
}

impl QuestionKind {
  pub fn as_str(self) -> &'static str {
    match self {
      QuestionKind::Image => "image",
      QuestionKind::Typeface => "typeface",
    }
  }

  pub fn parse(s: &str) -> Option<QuestionKind> {
    match s.trim().to_ascii_lowercase().as_str() {
      "image" => Some(QuestionKind::Image),
      "typeface" => Some(QuestionKind::Typeface),
      _ => None,
    }
  }
}

/// One comparison item from the catalog. `option_a` is the stronger choice
/// per the source data; which side it is rendered on is decided per display
/// (see placement in the session engine), never here.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
  pub id: String,
  pub tier: Tier,
  pub kind: QuestionKind,
  pub prompt: String,
  pub option_a: String,
  pub option_b: String,
  #[serde(default)] pub explanation: String,
}

/// Side of the two-up layout an option was rendered on.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Side {
  Left,
  Right,
}

impl Side {
  pub fn as_str(self) -> &'static str {
    match self {
      Side::Left => "left",
      Side::Right => "right",
    }
  }
}

/// Where the correct option landed for the current display of a question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
  pub correct_side: Side,
}

impl Placement {
  pub fn is_correct(self, picked: Side) -> bool {
    picked == self.correct_side
  }
}

/// Rank a finished session earned from its accuracy. These four labels are
/// the only values the leaderboard accepts.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RankLabel {
  Beginner,
  Mid,
  Expert,
  Master,
}

impl RankLabel {
  /// A perfect run is master; 80% and up expert; 50% and up mid.
  pub fn from_accuracy(accuracy: u32) -> RankLabel {
    if accuracy >= 100 {
      RankLabel::Master
    } else if accuracy >= 80 {
      RankLabel::Expert
    } else if accuracy >= 50 {
      RankLabel::Mid
    } else {
      RankLabel::Beginner
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      RankLabel::Beginner => "beginner",
      RankLabel::Mid => "mid",
      RankLabel::Expert => "expert",
      RankLabel::Master => "master",
    }
  }

  pub fn parse(s: &str) -> Option<RankLabel> {
    match s.trim().to_ascii_lowercase().as_str() {
      "beginner" => Some(RankLabel::Beginner),
      "mid" => Some(RankLabel::Mid),
      "expert" => Some(RankLabel::Expert),
      "master" => Some(RankLabel::Master),
      _ => None,
    }
  }
}

/// Submission payload for one finished session, before validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewEntry {
  pub name: String,
  pub score: u32,
  pub accuracy: u32,
  pub time_taken_secs: u32,
  pub tier: RankLabel,
  #[serde(default)] pub social_handle: Option<String>,
}

/// A persisted leaderboard row. Immutable once written.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
  pub id: String,
  pub name: String,
  pub score: u32,
  pub accuracy: u32,
  pub time_taken_secs: u32,
  pub tier: RankLabel,
  pub social_handle: Option<String>,
  pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tier_order_is_non_decreasing() {
    let ranks: Vec<u8> = Tier::ALL.iter().map(|t| t.rank()).collect();
    let mut sorted = ranks.clone();
    sorted.sort_unstable();
    assert_eq!(ranks, sorted);
  }

  #[test]
  fn rank_label_thresholds() {
    assert_eq!(RankLabel::from_accuracy(100), RankLabel::Master);
    assert_eq!(RankLabel::from_accuracy(99), RankLabel::Expert);
    assert_eq!(RankLabel::from_accuracy(80), RankLabel::Expert);
    assert_eq!(RankLabel::from_accuracy(79), RankLabel::Mid);
    assert_eq!(RankLabel::from_accuracy(50), RankLabel::Mid);
    assert_eq!(RankLabel::from_accuracy(49), RankLabel::Beginner);
    assert_eq!(RankLabel::from_accuracy(0), RankLabel::Beginner);
  }

  #[test]
  fn labels_round_trip_through_parse() {
    for label in [RankLabel::Beginner, RankLabel::Mid, RankLabel::Expert, RankLabel::Master] {
      assert_eq!(RankLabel::parse(label.as_str()), Some(label));
    }
    assert_eq!(RankLabel::parse("grandmaster"), None);
  }
}
