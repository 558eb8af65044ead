//! Round-by-round state machine shared by the mini-game controllers.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::clock::{Clock, elapsed_seconds};
use crate::game_id::GameId;
use crate::summary::{GameSummary, RoundRecord};

/// Where a session stands.
///
/// `NotStarted -> InRound -> Evaluating -> (InRound | Complete)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    NotStarted,
    /// A challenge is on screen and a response is expected.
    InRound,
    /// The last response has been scored; waiting for [`GameSession::advance`].
    Evaluating { correct: bool },
    Complete,
}

impl SessionPhase {
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not started"),
            Self::InRound => f.write_str("in round"),
            Self::Evaluating { correct: true } => f.write_str("evaluating (correct)"),
            Self::Evaluating { correct: false } => f.write_str("evaluating (incorrect)"),
            Self::Complete => f.write_str("complete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no round is waiting for a response (session is {0})")]
    NotInRound(SessionPhase),
    #[error("no evaluated round to advance from (session is {0})")]
    NotEvaluating(SessionPhase),
    #[error("challenge pool for {0} is empty")]
    EmptyPool(GameId),
    #[error("tile {index} does not exist (challenge has {len} tiles)")]
    InvalidTile { index: usize, len: usize },
}

/// Driving interface every mini-game controller exposes.
pub trait GameSession {
    type Challenge;
    type Response;

    fn game_id(&self) -> GameId;

    fn phase(&self) -> SessionPhase;

    /// Reset the session and produce the first challenge.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyPool`] when the game has no content to draw from.
    fn start_session(&mut self) -> Result<&Self::Challenge, SessionError>;

    /// Produce a fresh challenge for `level`, avoiding repeats within the session
    /// while unused alternatives remain. Does not change the current round.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyPool`] when the game has no content to draw from.
    fn generate_challenge(&mut self, level: u32) -> Result<Self::Challenge, SessionError>;

    fn current_challenge(&self) -> Option<&Self::Challenge>;

    /// Score a response against the current challenge and record the round.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotInRound`] unless a challenge is awaiting a response.
    fn submit_response(&mut self, response: Self::Response) -> Result<bool, SessionError>;

    /// Leave the evaluated round for the next round or for completion.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotEvaluating`] unless a round was just scored, or
    /// [`SessionError::EmptyPool`] if the next challenge cannot be drawn.
    fn advance(&mut self) -> Result<SessionPhase, SessionError>;

    fn rounds(&self) -> &[RoundRecord];

    /// The summary to persist, once the session is complete.
    fn summary(&self) -> Option<GameSummary>;
}

/// Exact ordered equality; any length difference is a mismatch.
#[must_use]
pub fn sequences_match<T: PartialEq>(expected: &[T], observed: &[T]) -> bool {
    expected == observed
}

/// Pick an index in `0..len`, preferring indices not yet used.
///
/// Falls back to any index once every entry has been used. Returns `None`
/// only for an empty pool.
pub fn pick_unused<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    is_used: impl Fn(usize) -> bool,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let fresh: Vec<usize> = (0..len).filter(|&i| !is_used(i)).collect();
    if fresh.is_empty() {
        Some(rng.gen_range(0..len))
    } else {
        Some(fresh[rng.gen_range(0..fresh.len())])
    }
}

/// Phase, timing and round log bookkeeping embedded in each controller.
#[derive(Debug, Clone)]
pub(crate) struct RoundLog<C> {
    clock: C,
    phase: SessionPhase,
    rounds: Vec<RoundRecord>,
    session_started_ms: f64,
    round_started_ms: f64,
    finished_ms: Option<f64>,
}

impl<C: Clock> RoundLog<C> {
    pub(crate) const fn new(clock: C) -> Self {
        Self {
            clock,
            phase: SessionPhase::NotStarted,
            rounds: Vec::new(),
            session_started_ms: 0.0,
            round_started_ms: 0.0,
            finished_ms: None,
        }
    }

    pub(crate) const fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub(crate) fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub(crate) fn start(&mut self) {
        let now = self.clock.now_ms();
        self.rounds.clear();
        self.session_started_ms = now;
        self.finished_ms = None;
        self.begin_round();
    }

    pub(crate) fn begin_round(&mut self) {
        self.round_started_ms = self.clock.now_ms();
        self.phase = SessionPhase::InRound;
    }

    pub(crate) fn ensure_in_round(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::InRound => Ok(()),
            other => Err(SessionError::NotInRound(other)),
        }
    }

    pub(crate) fn evaluated(&self) -> Result<bool, SessionError> {
        match self.phase {
            SessionPhase::Evaluating { correct } => Ok(correct),
            other => Err(SessionError::NotEvaluating(other)),
        }
    }

    /// Append the round and move to `Evaluating`.
    pub(crate) fn record(
        &mut self,
        expected: Vec<String>,
        observed: Vec<String>,
        hints_used: u32,
    ) -> bool {
        let correct = sequences_match(&expected, &observed);
        let reaction_time_seconds = elapsed_seconds(self.round_started_ms, self.clock.now_ms());
        let round_index = u32::try_from(self.rounds.len()).unwrap_or(u32::MAX);
        self.rounds.push(RoundRecord {
            round_index,
            expected,
            observed,
            correct,
            reaction_time_seconds,
            hints_used,
        });
        self.phase = SessionPhase::Evaluating { correct };
        correct
    }

    pub(crate) fn complete(&mut self) {
        self.finished_ms = Some(self.clock.now_ms());
        self.phase = SessionPhase::Complete;
    }

    pub(crate) fn total_time_seconds(&self) -> f64 {
        let end = self.finished_ms.unwrap_or_else(|| self.clock.now_ms());
        elapsed_seconds(self.session_started_ms, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    #[test]
    fn sequences_match_requires_same_order_and_length() {
        assert!(sequences_match(&[1, 2, 3], &[1, 2, 3]));
        assert!(!sequences_match(&[1, 2, 3], &[1, 3, 2]));
        assert!(!sequences_match(&[1, 2, 3], &[1, 2]));
        assert!(!sequences_match(&[1, 2], &[1, 2, 2]));
        assert!(sequences_match::<u8>(&[], &[]));
    }

    #[test]
    fn pick_unused_exhausts_pool_before_repeating() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut used = HashSet::new();
        for _ in 0..6 {
            let idx = pick_unused(&mut rng, 6, |i| used.contains(&i)).unwrap();
            assert!(used.insert(idx), "index {idx} repeated early");
        }
        let again = pick_unused(&mut rng, 6, |i| used.contains(&i)).unwrap();
        assert!(again < 6);
        assert_eq!(pick_unused(&mut rng, 0, |_| false), None);
    }

    #[test]
    fn round_log_times_rounds_and_session() {
        let clock = ManualClock::starting_at(10_000.0);
        let mut log = RoundLog::new(clock.clone());
        assert_eq!(log.phase(), SessionPhase::NotStarted);
        assert_eq!(
            log.ensure_in_round(),
            Err(SessionError::NotInRound(SessionPhase::NotStarted))
        );

        log.start();
        clock.advance_ms(2_500.0);
        let correct = log.record(vec!["a".into()], vec!["a".into()], 0);
        assert!(correct);
        assert_eq!(log.phase(), SessionPhase::Evaluating { correct: true });
        assert!((log.rounds()[0].reaction_time_seconds - 2.5).abs() < 1e-9);

        clock.advance_ms(1_000.0);
        log.begin_round();
        clock.advance_ms(500.0);
        log.record(vec!["a".into()], vec!["b".into()], 1);
        assert_eq!(log.rounds()[1].round_index, 1);
        assert!((log.rounds()[1].reaction_time_seconds - 0.5).abs() < 1e-9);

        log.complete();
        clock.advance_ms(9_000.0);
        assert!((log.total_time_seconds() - 4.0).abs() < 1e-9);
    }
}
