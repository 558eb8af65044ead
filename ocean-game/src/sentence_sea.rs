//! Sentence Sea: put scrambled words back into sentence order.
//!
//! Every round is played regardless of mistakes; the score is the number of
//! sentences rebuilt exactly.
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, ensure_max, ensure_min};
use crate::game_id::GameId;
use crate::session::{GameSession, RoundLog, SessionError, SessionPhase, pick_unused};
use crate::summary::{GameMetric, GameSummary, RoundRecord};

const MAX_ROUNDS_CAP: u32 = 50;
const SCRAMBLE_ATTEMPTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub words: Vec<String>,
    pub hint: String,
}

impl Sentence {
    #[must_use]
    pub fn new(words: &[&str], hint: &str) -> Self {
        Self {
            words: words.iter().map(|w| (*w).to_string()).collect(),
            hint: hint.to_string(),
        }
    }

    /// Words joined with single spaces; identifies the sentence within a session.
    #[must_use]
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    fn has_distinct_arrangements(&self) -> bool {
        self.words.iter().any(|w| w != &self.words[0])
    }
}

fn default_sentences() -> Vec<Sentence> {
    vec![
        Sentence::new(
            &["The", "fish", "swims", "in", "the", "ocean"],
            "Action of a fish in water",
        ),
        Sentence::new(
            &["Dolphins", "jump", "over", "the", "waves"],
            "What dolphins do above water",
        ),
        Sentence::new(
            &["Crabs", "walk", "on", "the", "sandy", "beach"],
            "Where crabs move around",
        ),
        Sentence::new(
            &["The", "turtle", "hides", "in", "its", "shell"],
            "Where a turtle goes for protection",
        ),
        Sentence::new(
            &["Sharks", "have", "many", "sharp", "teeth"],
            "What sharks use to bite",
        ),
        Sentence::new(
            &["Sailors", "navigate", "by", "the", "stars"],
            "How people find their way at sea",
        ),
        Sentence::new(
            &["Whales", "sing", "beautiful", "ocean", "songs"],
            "What whales do to communicate",
        ),
        Sentence::new(
            &["The", "treasure", "chest", "is", "buried", "deep"],
            "Where pirates hide valuable things",
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentenceSeaConfig {
    pub total_rounds: u32,
    pub sentences: Vec<Sentence>,
    /// Pause after checking a sentence before the next round.
    pub feedback_ms: u32,
}

impl Default for SentenceSeaConfig {
    fn default() -> Self {
        Self {
            total_rounds: 5,
            sentences: default_sentences(),
            feedback_ms: 2_000,
        }
    }
}

impl SentenceSeaConfig {
    #[must_use]
    pub const fn max_score(&self) -> u32 {
        self.total_rounds
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unusable round count or an empty or blank sentence pool.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_min("sentence_sea.total_rounds", self.total_rounds, 1)?;
        ensure_max("sentence_sea.total_rounds", self.total_rounds, MAX_ROUNDS_CAP)?;
        if self.sentences.is_empty() {
            return Err(ConfigError::Empty("sentence_sea.sentences"));
        }
        if self.sentences.iter().any(|s| s.words.is_empty()) {
            return Err(ConfigError::Empty("sentence_sea.sentences[].words"));
        }
        Ok(())
    }
}

/// A sentence and its scrambled word tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceChallenge {
    pub sentence: Sentence,
    /// Scrambled words; tiles are addressed by index so repeated words stay distinct.
    pub tiles: Vec<String>,
}

/// Sentence-ordering controller.
#[derive(Debug, Clone)]
pub struct SentenceSeaSession<C = SystemClock> {
    config: SentenceSeaConfig,
    rng: ChaCha20Rng,
    log: RoundLog<C>,
    round: u32,
    challenge: Option<SentenceChallenge>,
    selected: Vec<usize>,
    used: HashSet<String>,
    score: u32,
    hints_used: u32,
}

impl SentenceSeaSession<SystemClock> {
    #[must_use]
    pub fn with_seed(config: SentenceSeaConfig, seed: u64) -> Self {
        Self::new(config, seed, SystemClock)
    }
}

impl<C: Clock> SentenceSeaSession<C> {
    #[must_use]
    pub fn new(config: SentenceSeaConfig, seed: u64, clock: C) -> Self {
        Self {
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
            log: RoundLog::new(clock),
            round: 0,
            challenge: None,
            selected: Vec::new(),
            used: HashSet::new(),
            score: 0,
            hints_used: 0,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SentenceSeaConfig {
        &self.config
    }

    /// Zero-based index of the current round.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub const fn total_rounds(&self) -> u32 {
        self.config.total_rounds
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub const fn hints_used(&self) -> u32 {
        self.hints_used
    }

    /// Hint for the current sentence, once the player has asked for hints.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        if self.hints_used == 0 {
            return None;
        }
        self.challenge.as_ref().map(|c| c.sentence.hint.as_str())
    }

    /// Reveal the hint. Only the first request counts toward the hint total;
    /// after that hints stay visible for the rest of the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotInRound`] unless a sentence is being built.
    pub fn show_hint(&mut self) -> Result<Option<&str>, SessionError> {
        self.log.ensure_in_round()?;
        if self.hints_used == 0 {
            self.hints_used = 1;
        }
        Ok(self.hint())
    }

    /// Move a tile onto the end of the sentence being built. Selecting a tile
    /// that is already placed does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotInRound`] outside a round, or
    /// [`SessionError::InvalidTile`] for an index past the last tile.
    pub fn select_tile(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_tile(index)?;
        if !self.selected.contains(&index) {
            self.selected.push(index);
        }
        Ok(())
    }

    /// Put a placed tile back among the available ones.
    ///
    /// # Errors
    ///
    /// Same as [`Self::select_tile`].
    pub fn deselect_tile(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_tile(index)?;
        self.selected.retain(|&i| i != index);
        Ok(())
    }

    fn check_tile(&self, index: usize) -> Result<(), SessionError> {
        self.log.ensure_in_round()?;
        let len = self.challenge.as_ref().map_or(0, |c| c.tiles.len());
        if index >= len {
            return Err(SessionError::InvalidTile { index, len });
        }
        Ok(())
    }

    /// Words placed so far, in order.
    #[must_use]
    pub fn selected_words(&self) -> Vec<&str> {
        let Some(challenge) = self.challenge.as_ref() else {
            return Vec::new();
        };
        self.selected
            .iter()
            .map(|&i| challenge.tiles[i].as_str())
            .collect()
    }

    /// Tiles not yet placed, with their indices.
    #[must_use]
    pub fn available_tiles(&self) -> Vec<(usize, &str)> {
        let Some(challenge) = self.challenge.as_ref() else {
            return Vec::new();
        };
        challenge
            .tiles
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.selected.contains(i))
            .map(|(i, w)| (i, w.as_str()))
            .collect()
    }

    /// Submit the placed words as the answer.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotInRound`] unless a sentence is being built.
    pub fn check_sentence(&mut self) -> Result<bool, SessionError> {
        let words = self
            .selected_words()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.submit_response(words)
    }

    fn scramble(&mut self, sentence: &Sentence) -> Vec<String> {
        let mut tiles = sentence.words.clone();
        tiles.shuffle(&mut self.rng);
        if sentence.has_distinct_arrangements() {
            for _ in 0..SCRAMBLE_ATTEMPTS {
                if tiles != sentence.words {
                    break;
                }
                tiles.shuffle(&mut self.rng);
            }
        }
        tiles
    }

    fn begin_round(&mut self, round: u32) -> Result<(), SessionError> {
        let challenge = self.generate_challenge(round)?;
        self.used.insert(challenge.sentence.text());
        log::debug!(
            "sentence-sea round {}: {} words",
            round + 1,
            challenge.tiles.len()
        );
        self.challenge = Some(challenge);
        self.round = round;
        self.selected.clear();
        Ok(())
    }
}

impl<C: Clock> GameSession for SentenceSeaSession<C> {
    type Challenge = SentenceChallenge;
    type Response = Vec<String>;

    fn game_id(&self) -> GameId {
        GameId::SentenceSea
    }

    fn phase(&self) -> SessionPhase {
        self.log.phase()
    }

    fn start_session(&mut self) -> Result<&Self::Challenge, SessionError> {
        self.used.clear();
        self.score = 0;
        self.hints_used = 0;
        self.begin_round(0)?;
        self.log.start();
        self.challenge
            .as_ref()
            .ok_or(SessionError::EmptyPool(GameId::SentenceSea))
    }

    /// `level` is the round index; every round draws from the same pool.
    fn generate_challenge(&mut self, _level: u32) -> Result<Self::Challenge, SessionError> {
        let used = &self.used;
        let index = pick_unused(&mut self.rng, self.config.sentences.len(), |i| {
            used.contains(&self.config.sentences[i].text())
        })
        .ok_or(SessionError::EmptyPool(GameId::SentenceSea))?;
        let sentence = self.config.sentences[index].clone();
        let tiles = self.scramble(&sentence);
        Ok(SentenceChallenge { sentence, tiles })
    }

    fn current_challenge(&self) -> Option<&Self::Challenge> {
        self.challenge.as_ref()
    }

    fn submit_response(&mut self, response: Self::Response) -> Result<bool, SessionError> {
        self.log.ensure_in_round()?;
        let expected = self
            .challenge
            .as_ref()
            .map(|c| c.sentence.words.clone())
            .unwrap_or_default();
        let correct = self.log.record(expected, response, self.hints_used);
        if correct {
            self.score += 1;
        }
        Ok(correct)
    }

    fn advance(&mut self) -> Result<SessionPhase, SessionError> {
        self.log.evaluated()?;
        if self.round + 1 < self.config.total_rounds {
            self.begin_round(self.round + 1)?;
            self.log.begin_round();
        } else {
            self.log.complete();
            log::debug!(
                "sentence-sea complete: {}/{} correct",
                self.score,
                self.config.total_rounds
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
            game_id: GameId::SentenceSea,
            rounds: self.log.rounds().to_vec(),
            total_time_seconds: self.log.total_time_seconds(),
            metric: GameMetric::Score { score: self.score },
            completed: true,
            hints_used: self.hints_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn session(seed: u64) -> SentenceSeaSession<ManualClock> {
        SentenceSeaSession::new(SentenceSeaConfig::default(), seed, ManualClock::default())
    }

    fn solve_with_tiles(game: &mut SentenceSeaSession<ManualClock>) {
        let challenge = game.current_challenge().unwrap().clone();
        let mut taken = vec![false; challenge.tiles.len()];
        for word in &challenge.sentence.words {
            let idx = challenge
                .tiles
                .iter()
                .enumerate()
                .position(|(i, w)| !taken[i] && w == word)
                .unwrap();
            taken[idx] = true;
            game.select_tile(idx).unwrap();
        }
    }

    #[test]
    fn tiles_are_a_permutation_of_the_sentence() {
        let mut game = session(4);
        let challenge = game.start_session().unwrap().clone();
        let mut tiles = challenge.tiles.clone();
        let mut words = challenge.sentence.words.clone();
        tiles.sort();
        words.sort();
        assert_eq!(tiles, words);
        assert_ne!(challenge.tiles, challenge.sentence.words);
    }

    #[test]
    fn placing_tiles_in_order_is_correct() {
        let mut game = session(8);
        game.start_session().unwrap();
        solve_with_tiles(&mut game);
        assert!(game.available_tiles().is_empty());
        assert!(game.check_sentence().unwrap());
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn deselect_returns_tile() {
        let mut game = session(8);
        game.start_session().unwrap();
        game.select_tile(0).unwrap();
        game.select_tile(0).unwrap();
        assert_eq!(game.selected_words().len(), 1);
        game.deselect_tile(0).unwrap();
        assert!(game.selected_words().is_empty());
        let len = game.current_challenge().unwrap().tiles.len();
        assert_eq!(
            game.select_tile(len),
            Err(SessionError::InvalidTile { index: len, len })
        );
    }

    #[test]
    fn hint_counts_once_and_stays_visible() {
        let mut game = session(1);
        game.start_session().unwrap();
        assert!(game.hint().is_none());
        let hint = game.show_hint().unwrap().map(str::to_string);
        assert_eq!(
            hint.as_deref(),
            Some(game.current_challenge().unwrap().sentence.hint.as_str())
        );
        game.show_hint().unwrap();
        assert_eq!(game.hints_used(), 1);

        game.submit_response(Vec::new()).unwrap();
        game.advance().unwrap();
        assert!(game.hint().is_some());
        assert_eq!(game.rounds()[0].hints_used, 1);
    }

    #[test]
    fn session_plays_every_round_despite_mistakes() {
        let mut game = session(12);
        game.start_session().unwrap();
        for _ in 0..5 {
            assert!(!game.submit_response(vec!["wrong".to_string()]).unwrap());
            game.advance().unwrap();
        }
        assert_eq!(game.phase(), SessionPhase::Complete);
        let summary = game.summary().unwrap();
        assert_eq!(summary.rounds.len(), 5);
        assert_eq!(summary.raw_score(), 0);
        assert!(summary.completed);
    }

    #[test]
    fn sentences_do_not_repeat_until_pool_is_used() {
        let config = SentenceSeaConfig {
            total_rounds: 10,
            ..SentenceSeaConfig::default()
        };
        let mut game = SentenceSeaSession::new(config, 99, ManualClock::default());
        game.start_session().unwrap();
        let mut seen = Vec::new();
        for _ in 0..10 {
            seen.push(game.current_challenge().unwrap().sentence.text());
            game.submit_response(Vec::new()).unwrap();
            game.advance().unwrap();
        }
        let first_eight: HashSet<_> = seen[..8].iter().collect();
        assert_eq!(first_eight.len(), 8);
    }

    #[test]
    fn single_word_sentence_is_left_as_is() {
        let config = SentenceSeaConfig {
            total_rounds: 1,
            sentences: vec![Sentence::new(&["Splash"], "A sound")],
            feedback_ms: 0,
        };
        let mut game = SentenceSeaSession::new(config, 3, ManualClock::default());
        let challenge = game.start_session().unwrap().clone();
        assert_eq!(challenge.tiles, vec!["Splash".to_string()]);
        assert!(game.submit_response(vec!["Splash".to_string()]).unwrap());
        assert_eq!(game.advance().unwrap(), SessionPhase::Complete);
        assert_eq!(game.summary().unwrap().raw_score(), 1);
    }
}
