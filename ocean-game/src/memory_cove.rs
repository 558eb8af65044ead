//! Memory Cove: watch a sequence of sea creatures, then repeat it.
//!
//! Level `n` shows `n + 1` creatures drawn with replacement. A correct answer
//! moves to the next level; the first mistake ends the session.
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, ensure_max, ensure_min};
use crate::game_id::GameId;
use crate::session::{GameSession, RoundLog, SessionError, SessionPhase};
use crate::summary::{GameMetric, GameSummary, RoundRecord};

const MAX_LEVEL_CAP: u32 = 20;
/// Draws tried for an unused sequence before accepting a repeat.
const MAX_DRAW_ATTEMPTS: usize = 64;

/// The creatures a sequence is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeaItem {
    Starfish,
    Shell,
    Fish,
    Coral,
    Seahorse,
    Turtle,
    Jellyfish,
    Crab,
}

impl SeaItem {
    pub const ALL: [Self; 8] = [
        Self::Starfish,
        Self::Shell,
        Self::Fish,
        Self::Coral,
        Self::Seahorse,
        Self::Turtle,
        Self::Jellyfish,
        Self::Crab,
    ];

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Starfish => "starfish",
            Self::Shell => "shell",
            Self::Fish => "fish",
            Self::Coral => "coral",
            Self::Seahorse => "seahorse",
            Self::Turtle => "turtle",
            Self::Jellyfish => "jellyfish",
            Self::Crab => "crab",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Starfish => "Starfish",
            Self::Shell => "Shell",
            Self::Fish => "Fish",
            Self::Coral => "Coral",
            Self::Seahorse => "Seahorse",
            Self::Turtle => "Turtle",
            Self::Jellyfish => "Jellyfish",
            Self::Crab => "Crab",
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Starfish => "🌟",
            Self::Shell => "🐚",
            Self::Fish => "🐟",
            Self::Coral => "🪸",
            Self::Seahorse => "🦄",
            Self::Turtle => "🐢",
            Self::Jellyfish => "🪼",
            Self::Crab => "🦀",
        }
    }
}

/// Delays for presenting a sequence and for the post-answer pause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTiming {
    /// Pause before each creature lights up.
    pub reveal_delay_ms: u32,
    /// How long each creature stays highlighted.
    pub highlight_ms: u32,
    /// Pause after an answer before the next level (or the end screen).
    pub feedback_ms: u32,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 800,
            highlight_ms: 600,
            feedback_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryCoveConfig {
    pub max_level: u32,
    pub items: Vec<SeaItem>,
    pub timing: RevealTiming,
}

impl Default for MemoryCoveConfig {
    fn default() -> Self {
        Self {
            max_level: 6,
            items: SeaItem::ALL.to_vec(),
            timing: RevealTiming::default(),
        }
    }
}

impl MemoryCoveConfig {
    /// Longest sequence a session can produce, which is also the game's maximum raw score.
    #[must_use]
    pub const fn max_score(&self) -> u32 {
        self.max_level + 1
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] when the level range or item set is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_min("memory_cove.max_level", self.max_level, 1)?;
        ensure_max("memory_cove.max_level", self.max_level, MAX_LEVEL_CAP)?;
        if self.items.is_empty() {
            return Err(ConfigError::Empty("memory_cove.items"));
        }
        let mut seen = HashSet::new();
        if let Some(item) = self.items.iter().find(|item| !seen.insert(**item)) {
            return Err(ConfigError::Duplicate {
                field: "memory_cove.items",
                value: item.slug().to_string(),
            });
        }
        Ok(())
    }
}

/// One serialized step of showing a sequence: wait, then highlight `item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealStep {
    pub item: SeaItem,
    pub wait_ms: u32,
    pub highlight_ms: u32,
}

/// Result of adding one creature to the player's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemPick {
    /// Still matching; `matched` creatures placed so far.
    Pending { matched: usize },
    /// The answer was submitted, either complete or at the first wrong creature.
    Submitted { correct: bool },
}

/// Sequence-recall controller.
#[derive(Debug, Clone)]
pub struct MemoryCoveSession<C = SystemClock> {
    config: MemoryCoveConfig,
    rng: ChaCha20Rng,
    log: RoundLog<C>,
    level: u32,
    sequence: Vec<SeaItem>,
    player_sequence: Vec<SeaItem>,
    used: HashSet<Vec<SeaItem>>,
    max_sequence_reached: u32,
    completed_all_levels: bool,
}

impl MemoryCoveSession<SystemClock> {
    #[must_use]
    pub fn with_seed(config: MemoryCoveConfig, seed: u64) -> Self {
        Self::new(config, seed, SystemClock)
    }
}

impl<C: Clock> MemoryCoveSession<C> {
    #[must_use]
    pub fn new(config: MemoryCoveConfig, seed: u64, clock: C) -> Self {
        Self {
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
            log: RoundLog::new(clock),
            level: 0,
            sequence: Vec::new(),
            player_sequence: Vec::new(),
            used: HashSet::new(),
            max_sequence_reached: 0,
            completed_all_levels: false,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &MemoryCoveConfig {
        &self.config
    }

    /// Current level, starting at 1 (0 before the session starts).
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn max_level(&self) -> u32 {
        self.config.max_level
    }

    #[must_use]
    pub const fn max_sequence_reached(&self) -> u32 {
        self.max_sequence_reached
    }

    #[must_use]
    pub const fn completed_all_levels(&self) -> bool {
        self.completed_all_levels
    }

    #[must_use]
    pub fn player_sequence(&self) -> &[SeaItem] {
        &self.player_sequence
    }

    /// Per position of the current sequence: `Some(true)` placed correctly,
    /// `Some(false)` placed wrongly, `None` not placed yet.
    #[must_use]
    pub fn progress_marks(&self) -> Vec<Option<bool>> {
        self.sequence
            .iter()
            .enumerate()
            .map(|(i, expected)| self.player_sequence.get(i).map(|got| got == expected))
            .collect()
    }

    /// Steps to show the current sequence, one creature at a time.
    #[must_use]
    pub fn reveal_schedule(&self) -> Vec<RevealStep> {
        self.sequence
            .iter()
            .map(|&item| RevealStep {
                item,
                wait_ms: self.config.timing.reveal_delay_ms,
                highlight_ms: self.config.timing.highlight_ms,
            })
            .collect()
    }

    /// Add one creature to the answer. The answer is submitted as soon as it
    /// stops matching the sequence or reaches its full length.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotInRound`] unless the player's turn is open.
    pub fn select_item(&mut self, item: SeaItem) -> Result<ItemPick, SessionError> {
        self.log.ensure_in_round()?;
        self.player_sequence.push(item);
        let position = self.player_sequence.len() - 1;
        if self.sequence.get(position) != Some(&item) {
            return Ok(ItemPick::Submitted {
                correct: self.finish_round(),
            });
        }
        if self.player_sequence.len() == self.sequence.len() {
            return Ok(ItemPick::Submitted {
                correct: self.finish_round(),
            });
        }
        Ok(ItemPick::Pending {
            matched: self.player_sequence.len(),
        })
    }

    fn draw_sequence(&mut self, length: usize) -> Vec<SeaItem> {
        let items = &self.config.items;
        (0..length)
            .map(|_| items[self.rng.gen_range(0..items.len())])
            .collect()
    }

    fn pool_exhausted(&self, length: usize) -> bool {
        let used = self.used.iter().filter(|s| s.len() == length).count();
        let distinct = self.config.items.iter().collect::<HashSet<_>>().len();
        u32::try_from(length)
            .ok()
            .and_then(|len| distinct.checked_pow(len))
            .is_some_and(|pool| used >= pool)
    }

    fn begin_level(&mut self, level: u32) -> Result<(), SessionError> {
        self.sequence = self.generate_challenge(level)?;
        self.used.insert(self.sequence.clone());
        self.level = level;
        self.player_sequence.clear();
        log::debug!(
            "memory-cove level {level}: sequence of {} items",
            self.sequence.len()
        );
        Ok(())
    }

    fn finish_round(&mut self) -> bool {
        let expected = slugs(&self.sequence);
        let observed = slugs(&self.player_sequence);
        let correct = self.log.record(expected, observed, 0);
        if correct {
            let length = u32::try_from(self.sequence.len()).unwrap_or(u32::MAX);
            self.max_sequence_reached = self.max_sequence_reached.max(length);
        }
        correct
    }
}

fn slugs(items: &[SeaItem]) -> Vec<String> {
    items.iter().map(|item| item.slug().to_string()).collect()
}

impl<C: Clock> GameSession for MemoryCoveSession<C> {
    type Challenge = Vec<SeaItem>;
    type Response = Vec<SeaItem>;

    fn game_id(&self) -> GameId {
        GameId::MemoryCove
    }

    fn phase(&self) -> SessionPhase {
        self.log.phase()
    }

    fn start_session(&mut self) -> Result<&Self::Challenge, SessionError> {
        self.used.clear();
        self.max_sequence_reached = 0;
        self.completed_all_levels = false;
        self.begin_level(1)?;
        self.log.start();
        Ok(&self.sequence)
    }

    fn generate_challenge(&mut self, level: u32) -> Result<Self::Challenge, SessionError> {
        if self.config.items.is_empty() {
            return Err(SessionError::EmptyPool(GameId::MemoryCove));
        }
        let length = level as usize + 1;
        if self.pool_exhausted(length) {
            return Ok(self.draw_sequence(length));
        }
        let mut candidate = self.draw_sequence(length);
        for _ in 1..MAX_DRAW_ATTEMPTS {
            if !self.used.contains(&candidate) {
                break;
            }
            candidate = self.draw_sequence(length);
        }
        Ok(candidate)
    }

    fn current_challenge(&self) -> Option<&Self::Challenge> {
        match self.log.phase() {
            SessionPhase::NotStarted => None,
            _ => Some(&self.sequence),
        }
    }

    fn submit_response(&mut self, response: Self::Response) -> Result<bool, SessionError> {
        self.log.ensure_in_round()?;
        self.player_sequence = response;
        Ok(self.finish_round())
    }

    fn advance(&mut self) -> Result<SessionPhase, SessionError> {
        let correct = self.log.evaluated()?;
        if correct && self.level < self.config.max_level {
            self.begin_level(self.level + 1)?;
            self.log.begin_round();
        } else {
            self.completed_all_levels = correct;
            self.log.complete();
            log::debug!(
                "memory-cove complete: max sequence {} (all levels: {})",
                self.max_sequence_reached,
                self.completed_all_levels
            );
        }
        Ok(self.log.phase())
    }

    fn rounds(&self) -> &[RoundRecord] {
        self.log.rounds()
    }

    fn summary(&self) -> Option<GameSummary> {
        if !self.log.phase().is_complete() {
            return None;
        }
        Some(GameSummary {
            game_id: GameId::MemoryCove,
            rounds: self.log.rounds().to_vec(),
            total_time_seconds: self.log.total_time_seconds(),
            metric: GameMetric::MaxSequence {
                max_sequence_reached: self.max_sequence_reached,
            },
            completed: self.completed_all_levels,
            hints_used: 0,
        })
    }
}
