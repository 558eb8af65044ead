use anyhow::{Context, Result, bail};
use ocean_game::{
    GameId, GameSession, GameSummary, ManualClock, MemoryCoveConfig, MemoryCoveSession,
    SentenceSeaConfig, SentenceSeaSession,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::policy::PlayerPolicy;

/// Hard stop for a session that never completes.
const MAX_ROUNDS: usize = 200;
/// Simulated sessions start at a fixed wall-clock time.
const SESSION_START_MS: f64 = 1_700_000_000_000.0;

/// Outcome of one simulated session.
#[derive(Debug, Clone)]
pub struct SessionRun {
    pub game_id: GameId,
    pub policy: &'static str,
    pub seed: u64,
    /// Correctness of each submitted answer, in order.
    pub outcomes: Vec<bool>,
    pub think_time_ms: Vec<f64>,
    pub summary: GameSummary,
}

impl SessionRun {
    #[must_use]
    pub fn correct_answers(&self) -> usize {
        self.outcomes.iter().filter(|c| **c).count()
    }

    /// Leading run of correct answers.
    #[must_use]
    pub fn correct_streak(&self) -> usize {
        self.outcomes.iter().take_while(|c| **c).count()
    }
}

/// Drive any session to completion. `answer` is asked once per round.
///
/// # Errors
///
/// Returns an error if the session rejects a transition, never completes,
/// or completes without a summary.
pub fn play_session<G, F>(
    session: &mut G,
    clock: &ManualClock,
    think_rng: &mut ChaCha20Rng,
    mut answer: F,
) -> Result<(Vec<bool>, Vec<f64>, GameSummary)>
where
    G: GameSession,
    F: FnMut(&mut G) -> Result<G::Response>,
{
    session.start_session()?;
    let mut outcomes = Vec::new();
    let mut think_times = Vec::new();
    loop {
        let think_ms = think_rng.gen_range(400.0..4_000.0);
        clock.advance_ms(think_ms);
        think_times.push(think_ms);

        let response = answer(session)?;
        outcomes.push(session.submit_response(response)?);
        if session.advance()?.is_complete() {
            break;
        }
        if outcomes.len() >= MAX_ROUNDS {
            bail!("{} session still running after {MAX_ROUNDS} rounds", session.game_id());
        }
    }
    let summary = session
        .summary()
        .with_context(|| format!("{} completed without a summary", session.game_id()))?;
    Ok((outcomes, think_times, summary))
}

/// Play one Memory Cove session.
///
/// # Errors
///
/// Propagates [`play_session`] failures.
pub fn simulate_memory_cove(
    config: &MemoryCoveConfig,
    policy: &mut dyn PlayerPolicy,
    seed: u64,
) -> Result<(SessionRun, MemoryCoveSession<ManualClock>)> {
    let clock = ManualClock::starting_at(SESSION_START_MS);
    let mut session = MemoryCoveSession::new(config.clone(), seed, clock.clone());
    let mut think_rng = ChaCha20Rng::seed_from_u64(seed ^ 0x5EED);
    let pool = config.items.clone();
    let (outcomes, think_time_ms, summary) =
        play_session(&mut session, &clock, &mut think_rng, |session| {
            let shown = session
                .current_challenge()
                .context("memory cove has no sequence")?;
            Ok(policy.recall(shown, &pool))
        })?;
    let run = SessionRun {
        game_id: GameId::MemoryCove,
        policy: policy.name(),
        seed,
        outcomes,
        think_time_ms,
        summary,
    };
    Ok((run, session))
}

/// Play one Sentence Sea session, building each answer through the tile API.
///
/// # Errors
///
/// Propagates [`play_session`] failures.
pub fn simulate_sentence_sea(
    config: &SentenceSeaConfig,
    policy: &mut dyn PlayerPolicy,
    seed: u64,
) -> Result<(SessionRun, SentenceSeaSession<ManualClock>)> {
    let clock = ManualClock::starting_at(SESSION_START_MS);
    let mut session = SentenceSeaSession::new(config.clone(), seed, clock.clone());
    let mut think_rng = ChaCha20Rng::seed_from_u64(seed ^ 0x5EED);
    let (outcomes, think_time_ms, summary) =
        play_session(&mut session, &clock, &mut think_rng, |session| {
            if policy.wants_hint() {
                session.show_hint()?;
            }
            let challenge = session
                .current_challenge()
                .context("sentence sea has no challenge")?
                .clone();
            let words = policy.arrange(&challenge);
            place_words(session, &words)?;
            Ok(session
                .selected_words()
                .into_iter()
                .map(str::to_string)
                .collect())
        })?;
    let run = SessionRun {
        game_id: GameId::SentenceSea,
        policy: policy.name(),
        seed,
        outcomes,
        think_time_ms,
        summary,
    };
    Ok((run, session))
}

/// Select tiles so the placed words read `words`, as far as the tiles allow.
fn place_words(session: &mut SentenceSeaSession<ManualClock>, words: &[String]) -> Result<()> {
    for word in words {
        let tile = session
            .available_tiles()
            .into_iter()
            .find(|(_, tile)| *tile == word.as_str())
            .map(|(index, _)| index);
        match tile {
            Some(index) => session.select_tile(index)?,
            None => log::debug!("no free tile for '{word}'"),
        }
    }
    Ok(())
}
