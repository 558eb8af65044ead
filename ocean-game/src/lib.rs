//! Ocean Adventure game core
//!
//! Platform-agnostic session controllers, result persistence and scoring for
//! the Ocean Adventure reading-skills suite. Storage, time and configuration
//! sources are injected so the same code runs natively and in the browser.

pub mod clock;
pub mod config;
pub mod game_id;
pub mod memory_cove;
pub mod persistence;
pub mod results;
pub mod sentence_sea;
pub mod session;
pub mod storage;
pub mod summary;

pub use clock::{Clock, ManualClock, SystemClock, elapsed_seconds};
pub use config::{ConfigError, SuiteConfig};
pub use game_id::{GameId, GameIdError};
pub use memory_cove::{ItemPick, MemoryCoveConfig, MemoryCoveSession, RevealStep, RevealTiming, SeaItem};
pub use persistence::{GameDataStore, PersistenceError, REGISTRY_KEY, summary_key};
pub use results::{
    Band, BandThresholds, GameResult, Recommendations, ResultsConfig, ResultsReport, ScoreLimits,
    percentage,
};
pub use sentence_sea::{Sentence, SentenceChallenge, SentenceSeaConfig, SentenceSeaSession};
pub use session::{GameSession, SessionError, SessionPhase, pick_unused, sequences_match};
pub use storage::{KeyValueStore, MemoryStore};
pub use summary::{GameMetric, GameSummary, RoundRecord, SummaryError};

use thiserror::Error;

/// Name under which the suite configuration is loaded.
pub const SUITE_CONFIG: &str = "suite";

/// Trait for abstracting configuration loading.
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load a named configuration document
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned;
}

#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("failed to load configuration: {0}")]
    Load(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Entry point tying configuration, session creation and persistence together.
pub struct GameSuite<S: KeyValueStore> {
    config: SuiteConfig,
    store: GameDataStore<S>,
}

impl<S: KeyValueStore> GameSuite<S> {
    /// Build a suite from the configuration named [`SUITE_CONFIG`].
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Load`] if the loader fails, or
    /// [`SuiteError::Config`] if the loaded configuration is invalid.
    pub fn load<L: DataLoader>(loader: &L, store: S) -> Result<Self, SuiteError> {
        let config: SuiteConfig = loader
            .load_config(SUITE_CONFIG)
            .map_err(|err| SuiteError::Load(err.to_string()))?;
        Self::with_config(config, store)
    }

    /// # Errors
    ///
    /// Returns [`SuiteError::Config`] if `config` is invalid.
    pub fn with_config(config: SuiteConfig, store: S) -> Result<Self, SuiteError> {
        config.validate()?;
        let store = GameDataStore::with_limits(store, config.results.limits.clone());
        Ok(Self { config, store })
    }

    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    #[must_use]
    pub const fn data_store(&self) -> &GameDataStore<S> {
        &self.store
    }

    #[must_use]
    pub fn memory_cove<C: Clock>(&self, seed: u64, clock: C) -> MemoryCoveSession<C> {
        MemoryCoveSession::new(self.config.memory_cove.clone(), seed, clock)
    }

    #[must_use]
    pub fn sentence_sea<C: Clock>(&self, seed: u64, clock: C) -> SentenceSeaSession<C> {
        SentenceSeaSession::new(self.config.sentence_sea.clone(), seed, clock)
    }

    /// Persist the summary of a finished session. Returns the saved summary,
    /// or `None` when the session has not completed.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the summary cannot be stored.
    pub fn finish<G: GameSession + ?Sized>(
        &self,
        session: &G,
    ) -> Result<Option<GameSummary>, PersistenceError> {
        let Some(summary) = session.summary() else {
            log::debug!("{} session not complete; nothing saved", session.game_id());
            return Ok(None);
        };
        self.store.save(session.game_id(), &summary)?;
        Ok(Some(summary))
    }

    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the summary is invalid or cannot be stored.
    pub fn save_summary(&self, summary: &GameSummary) -> Result<(), PersistenceError> {
        self.store.save(summary.game_id, summary)
    }

    #[must_use]
    pub fn results_report(&self) -> ResultsReport {
        ResultsReport::from_store(&self.store, &self.config.results)
    }

    /// # Errors
    ///
    /// Returns [`PersistenceError::Storage`] if stored results cannot be removed.
    pub fn clear_results(&self) -> Result<(), PersistenceError> {
        self.store.clear_all()
    }
}
