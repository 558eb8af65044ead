//! Stores each game's latest summary as JSON, with a registry of stored games.
//!
//! Layout: `ocean.game.<game-id>` holds a [`GameSummary`]; `ocean.registry`
//! holds a JSON array of the game ids written so far. Writes across keys are
//! best-effort: a crash between the summary write and the registry write can
//! leave them out of step, and readers tolerate that.
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::game_id::GameId;
use crate::results::ScoreLimits;
use crate::storage::KeyValueStore;
use crate::summary::{GameSummary, SummaryError};

pub const KEY_PREFIX: &str = "ocean.game.";
pub const REGISTRY_KEY: &str = "ocean.registry";

#[must_use]
pub fn summary_key(game_id: GameId) -> String {
    format!("{KEY_PREFIX}{game_id}")
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("refusing to save invalid summary: {0}")]
    InvalidSummary(#[from] SummaryError),
    #[error("summary belongs to {found}, not {expected}")]
    MismatchedGame { expected: GameId, found: GameId },
}

fn storage_err(err: impl std::error::Error) -> PersistenceError {
    PersistenceError::Storage(err.to_string())
}

/// Persistence adapter over any [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct GameDataStore<S> {
    store: S,
    limits: ScoreLimits,
}

impl<S: KeyValueStore> GameDataStore<S> {
    /// Adapter validating against each game's default maximum score.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_limits(store, ScoreLimits::default())
    }

    #[must_use]
    pub const fn with_limits(store: S, limits: ScoreLimits) -> Self {
        Self { store, limits }
    }

    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.store
    }

    /// Write `summary` under `game_id` and add the id to the registry,
    /// replacing any earlier summary for that game.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the summary belongs to another game,
    /// fails validation, cannot be serialized, or the backend rejects a write.
    pub fn save(&self, game_id: GameId, summary: &GameSummary) -> Result<(), PersistenceError> {
        if summary.game_id != game_id {
            return Err(PersistenceError::MismatchedGame {
                expected: game_id,
                found: summary.game_id,
            });
        }
        summary.validate(self.limits.max_score(game_id))?;
        let json = serde_json::to_string(summary)?;
        self.store
            .set(&summary_key(game_id), &json)
            .map_err(storage_err)?;

        let mut registry = self.registry();
        if registry.insert(game_id) {
            let ids: Vec<GameId> = registry.into_iter().collect();
            self.store
                .set(REGISTRY_KEY, &serde_json::to_string(&ids)?)
                .map_err(storage_err)?;
        }
        log::debug!("saved {game_id} summary (raw score {})", summary.raw_score());
        Ok(())
    }

    /// Stored summary for `game_id`. Missing, unreadable, malformed or
    /// out-of-range entries all read as `None`.
    #[must_use]
    pub fn load(&self, game_id: GameId) -> Option<GameSummary> {
        let raw = match self.store.get(&summary_key(game_id)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("could not read {game_id} summary: {err}");
                return None;
            }
        };
        let summary: GameSummary = match serde_json::from_str(&raw) {
            Ok(summary) => summary,
            Err(err) => {
                log::warn!("ignoring malformed {game_id} summary: {err}");
                return None;
            }
        };
        if summary.game_id != game_id {
            log::warn!("ignoring {game_id} entry holding a {} summary", summary.game_id);
            return None;
        }
        if let Err(err) = summary.validate(self.limits.max_score(game_id)) {
            log::warn!("ignoring invalid {game_id} summary: {err}");
            return None;
        }
        Some(summary)
    }

    /// Every summary listed in the registry that can be read back.
    #[must_use]
    pub fn load_all(&self) -> BTreeMap<GameId, GameSummary> {
        self.registry()
            .into_iter()
            .filter_map(|id| self.load(id).map(|summary| (id, summary)))
            .collect()
    }

    /// Game ids in the registry. A missing or malformed registry is empty;
    /// unknown ids in it are skipped.
    #[must_use]
    pub fn registry(&self) -> BTreeSet<GameId> {
        let raw = match self.store.get(REGISTRY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeSet::new(),
            Err(err) => {
                log::warn!("could not read summary registry: {err}");
                return BTreeSet::new();
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(names) => names
                .iter()
                .filter_map(|name| match name.parse::<GameId>() {
                    Ok(id) => Some(id),
                    Err(err) => {
                        log::warn!("skipping registry entry: {err}");
                        None
                    }
                })
                .collect(),
            Err(err) => {
                log::warn!("ignoring malformed summary registry: {err}");
                BTreeSet::new()
            }
        }
    }

    /// Erase every stored summary and the registry. Summaries left behind by
    /// an interrupted save (present but unregistered) are erased too.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Storage`] if the backend cannot be
    /// enumerated or a removal fails.
    pub fn clear_all(&self) -> Result<(), PersistenceError> {
        let mut doomed: BTreeSet<String> = self.registry().into_iter().map(summary_key).collect();
        doomed.extend(
            self.store
                .keys()
                .map_err(storage_err)?
                .into_iter()
                .filter(|key| key.starts_with(KEY_PREFIX)),
        );
        for key in &doomed {
            self.store.remove(key).map_err(storage_err)?;
        }
        self.store.remove(REGISTRY_KEY).map_err(storage_err)?;
        log::debug!("cleared {} stored summaries", doomed.len());
        Ok(())
    }
}
