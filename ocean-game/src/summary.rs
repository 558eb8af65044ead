//! Round records and the persisted per-game summary.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game_id::GameId;

/// Outcome of one challenge/response cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Zero-based position of the round within its session.
    pub round_index: u32,
    /// Expected tokens, in order (sea-item slugs or words).
    pub expected: Vec<String>,
    /// Tokens the player produced, in order.
    pub observed: Vec<String>,
    pub correct: bool,
    pub reaction_time_seconds: f64,
    /// Hints used in the session so far when the round was submitted.
    #[serde(default)]
    pub hints_used: u32,
}

/// Derived metric a summary is scored by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameMetric {
    /// Count of correct rounds.
    Score { score: u32 },
    /// Longest sequence recalled correctly.
    MaxSequence { max_sequence_reached: u32 },
}

impl GameMetric {
    #[must_use]
    pub const fn raw_score(self) -> u32 {
        match self {
            Self::Score { score } => score,
            Self::MaxSequence {
                max_sequence_reached,
            } => max_sequence_reached,
        }
    }
}

/// Persisted outcome of one game's most recent session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: GameId,
    pub rounds: Vec<RoundRecord>,
    pub total_time_seconds: f64,
    pub metric: GameMetric,
    /// `true` when the session ran to its last round (for Memory Cove: every
    /// level was cleared).
    pub completed: bool,
    #[serde(default)]
    pub hints_used: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    #[error("{game} raw score {score} exceeds maximum {maximum}")]
    ScoreExceedsMaximum {
        game: GameId,
        score: u32,
        maximum: u32,
    },
    #[error("{game} summary has a negative or non-finite total time")]
    InvalidTotalTime { game: GameId },
}

impl GameSummary {
    #[must_use]
    pub const fn raw_score(&self) -> u32 {
        self.metric.raw_score()
    }

    #[must_use]
    pub fn correct_rounds(&self) -> usize {
        self.rounds.iter().filter(|r| r.correct).count()
    }

    /// Percentage of correct rounds out of `planned_rounds`, or out of the
    /// rounds actually played when `planned_rounds` is zero.
    #[must_use]
    pub fn accuracy(&self, planned_rounds: u32) -> f64 {
        let denominator = if planned_rounds == 0 {
            self.rounds.len()
        } else {
            planned_rounds as usize
        };
        if denominator == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.correct_rounds() as f64 / denominator as f64;
        ratio * 100.0
    }

    /// Check the summary against the maximum raw score configured for its game.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError`] when the raw score exceeds `maximum` or the
    /// total time is not a finite, non-negative number.
    pub fn validate(&self, maximum: u32) -> Result<(), SummaryError> {
        if self.raw_score() > maximum {
            return Err(SummaryError::ScoreExceedsMaximum {
                game: self.game_id,
                score: self.raw_score(),
                maximum,
            });
        }
        if !self.total_time_seconds.is_finite() || self.total_time_seconds < 0.0 {
            return Err(SummaryError::InvalidTotalTime { game: self.game_id });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(index: u32, correct: bool) -> RoundRecord {
        RoundRecord {
            round_index: index,
            expected: vec!["a".into(), "b".into()],
            observed: if correct {
                vec!["a".into(), "b".into()]
            } else {
                vec!["b".into()]
            },
            correct,
            reaction_time_seconds: 1.5,
            hints_used: 0,
        }
    }

    #[test]
    fn accuracy_uses_planned_rounds() {
        let summary = GameSummary {
            game_id: GameId::SentenceSea,
            rounds: vec![round(0, true), round(1, false), round(2, true)],
            total_time_seconds: 12.0,
            metric: GameMetric::Score { score: 2 },
            completed: false,
            hints_used: 0,
        };
        assert!((summary.accuracy(5) - 40.0).abs() < 1e-9);
        assert!((summary.accuracy(0) - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_scores_above_maximum() {
        let summary = GameSummary {
            game_id: GameId::MemoryCove,
            rounds: Vec::new(),
            total_time_seconds: 3.0,
            metric: GameMetric::MaxSequence {
                max_sequence_reached: 8,
            },
            completed: true,
            hints_used: 0,
        };
        assert_eq!(
            summary.validate(7),
            Err(SummaryError::ScoreExceedsMaximum {
                game: GameId::MemoryCove,
                score: 8,
                maximum: 7,
            })
        );
        assert!(summary.validate(8).is_ok());
    }

    #[test]
    fn metric_serializes_with_kind_tag() {
        let json = serde_json::to_value(GameMetric::MaxSequence {
            max_sequence_reached: 5,
        })
        .unwrap();
        assert_eq!(json["kind"], "max_sequence");
        assert_eq!(json["max_sequence_reached"], 5);
    }
}
