//! Suite-wide configuration and its validation.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game_id::GameId;
use crate::memory_cove::MemoryCoveConfig;
use crate::results::ResultsConfig;
use crate::sentence_sea::SentenceSeaConfig;

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: u32,
        value: u32,
    },
    #[error("{field} must be at most {max} (got {value})")]
    MaxViolation {
        field: &'static str,
        max: u32,
        value: u32,
    },
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{field} lists {value} more than once")]
    Duplicate { field: &'static str, value: String },
    #[error("band thresholds must strictly decrease (excellent {excellent}, good {good}, developing {developing})")]
    BandOrder {
        excellent: u32,
        good: u32,
        developing: u32,
    },
    #[error("no maximum score configured for {0}")]
    MissingMaximum(GameId),
    #[error("{game} maximum {configured} disagrees with its session settings ({expected})")]
    MaximumMismatch {
        game: GameId,
        configured: u32,
        expected: u32,
    },
    #[error("no recommendation texts configured for {0}")]
    MissingRecommendations(GameId),
    #[error("invalid configuration JSON: {0}")]
    Json(String),
}

pub(crate) fn ensure_min(field: &'static str, value: u32, min: u32) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::MinViolation { field, min, value });
    }
    Ok(())
}

pub(crate) fn ensure_max(field: &'static str, value: u32, max: u32) -> Result<(), ConfigError> {
    if value > max {
        return Err(ConfigError::MaxViolation { field, max, value });
    }
    Ok(())
}

/// Every tunable of the suite in one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SuiteConfig {
    #[serde(default)]
    pub memory_cove: MemoryCoveConfig,
    #[serde(default)]
    pub sentence_sea: SentenceSeaConfig,
    #[serde(default)]
    pub results: ResultsConfig,
}

impl SuiteConfig {
    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON, or the first violated invariant.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Json(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check each section, then that the aggregator's maximums match what the
    /// session settings can actually produce.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.memory_cove.validate()?;
        self.sentence_sea.validate()?;
        self.results.validate()?;

        for (game, expected) in [
            (GameId::MemoryCove, self.memory_cove.max_score()),
            (GameId::SentenceSea, self.sentence_sea.max_score()),
        ] {
            let configured = self.results.limits.max_score(game);
            if configured != expected {
                return Err(ConfigError::MaximumMismatch {
                    game,
                    configured,
                    expected,
                });
            }
        }
        Ok(())
    }
}
