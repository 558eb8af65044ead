use std::collections::VecDeque;
use std::fmt;

use ocean_game::{SeaItem, SentenceChallenge};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Simulated player answering challenges.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Repeat a shown memory sequence, drawing from `pool`.
    fn recall(&mut self, shown: &[SeaItem], pool: &[SeaItem]) -> Vec<SeaItem>;

    /// Put the tiles of a sentence challenge in order.
    fn arrange(&mut self, challenge: &SentenceChallenge) -> Vec<String>;

    /// Whether to ask for the hint before answering.
    fn wants_hint(&mut self) -> bool {
        false
    }
}

/// Built-in player profiles for simulated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerStrategy {
    Perfect,
    Skilled,
    Novice,
    Random,
}

impl PlayerStrategy {
    pub const ALL: [Self; 4] = [Self::Perfect, Self::Skilled, Self::Novice, Self::Random];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect",
            Self::Skilled => "Skilled",
            Self::Novice => "Novice",
            Self::Random => "Random",
        }
    }

    /// Chance of answering a round correctly, for strategies that know the answer.
    #[must_use]
    pub const fn accuracy(self) -> Option<f64> {
        match self {
            Self::Perfect => Some(1.0),
            Self::Skilled => Some(0.85),
            Self::Novice => Some(0.5),
            Self::Random => None,
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy> {
        match self.accuracy() {
            Some(accuracy) => Box::new(AccuracyPolicy::new(self, accuracy, seed)),
            None => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for PlayerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A copy of `shown` guaranteed to differ from it.
pub fn mistaken_sequence<R: Rng + ?Sized>(
    shown: &[SeaItem],
    pool: &[SeaItem],
    rng: &mut R,
) -> Vec<SeaItem> {
    let mut answer = shown.to_vec();
    if answer.is_empty() {
        answer.extend(pool.first().copied());
        return answer;
    }
    let index = rng.gen_range(0..answer.len());
    let alternatives: Vec<SeaItem> = pool
        .iter()
        .copied()
        .filter(|item| *item != answer[index])
        .collect();
    match alternatives.choose(rng) {
        Some(&item) => answer[index] = item,
        None => {
            answer.pop();
        }
    }
    answer
}

/// A misordering of `words` guaranteed to differ from it.
pub fn mistaken_sentence<R: Rng + ?Sized>(words: &[String], rng: &mut R) -> Vec<String> {
    let mut answer = words.to_vec();
    let swappable: Vec<(usize, usize)> = (0..answer.len())
        .flat_map(|i| ((i + 1)..answer.len()).map(move |j| (i, j)))
        .filter(|&(i, j)| answer[i] != answer[j])
        .collect();
    match swappable.choose(rng) {
        Some(&(i, j)) => answer.swap(i, j),
        None => {
            answer.pop();
        }
    }
    answer
}

/// Knows every answer and gets each round right with a fixed probability.
pub struct AccuracyPolicy {
    strategy: PlayerStrategy,
    accuracy: f64,
    rng: ChaCha20Rng,
}

impl AccuracyPolicy {
    #[must_use]
    pub fn new(strategy: PlayerStrategy, accuracy: f64, seed: u64) -> Self {
        Self {
            strategy,
            accuracy: accuracy.clamp(0.0, 1.0),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    fn answers_correctly(&mut self) -> bool {
        self.rng.gen_bool(self.accuracy)
    }
}

impl PlayerPolicy for AccuracyPolicy {
    fn name(&self) -> &'static str {
        self.strategy.label()
    }

    fn recall(&mut self, shown: &[SeaItem], pool: &[SeaItem]) -> Vec<SeaItem> {
        if self.answers_correctly() {
            shown.to_vec()
        } else {
            mistaken_sequence(shown, pool, &mut self.rng)
        }
    }

    fn arrange(&mut self, challenge: &SentenceChallenge) -> Vec<String> {
        if self.answers_correctly() {
            challenge.sentence.words.clone()
        } else {
            mistaken_sentence(&challenge.sentence.words, &mut self.rng)
        }
    }

    fn wants_hint(&mut self) -> bool {
        self.accuracy < 0.75 && self.rng.gen_bool(0.5)
    }
}

/// Taps at random: random creatures, tiles in whatever order they lie.
pub struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        PlayerStrategy::Random.label()
    }

    fn recall(&mut self, shown: &[SeaItem], pool: &[SeaItem]) -> Vec<SeaItem> {
        (0..shown.len())
            .filter_map(|_| pool.choose(&mut self.rng).copied())
            .collect()
    }

    fn arrange(&mut self, challenge: &SentenceChallenge) -> Vec<String> {
        let mut tiles = challenge.tiles.clone();
        tiles.shuffle(&mut self.rng);
        tiles
    }
}

/// Follows a fixed script of right and wrong answers, then answers correctly.
pub struct ScriptedPolicy {
    script: VecDeque<bool>,
    rng: ChaCha20Rng,
}

impl ScriptedPolicy {
    #[must_use]
    pub fn new(script: &[bool], seed: u64) -> Self {
        Self {
            script: script.iter().copied().collect(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    fn next_correct(&mut self) -> bool {
        self.script.pop_front().unwrap_or(true)
    }
}

impl PlayerPolicy for ScriptedPolicy {
    fn name(&self) -> &'static str {
        "Scripted"
    }

    fn recall(&mut self, shown: &[SeaItem], pool: &[SeaItem]) -> Vec<SeaItem> {
        if self.next_correct() {
            shown.to_vec()
        } else {
            mistaken_sequence(shown, pool, &mut self.rng)
        }
    }

    fn arrange(&mut self, challenge: &SentenceChallenge) -> Vec<String> {
        if self.next_correct() {
            challenge.sentence.words.clone()
        } else {
            mistaken_sentence(&challenge.sentence.words, &mut self.rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| (*w).to_string()).collect()
    }

    #[test]
    fn mistakes_always_differ_from_the_answer() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let shown = [SeaItem::Crab, SeaItem::Crab, SeaItem::Fish];
        for _ in 0..50 {
            assert_ne!(mistaken_sequence(&shown, &SeaItem::ALL, &mut rng), shown);
            assert_ne!(mistaken_sequence(&shown, &[SeaItem::Crab], &mut rng), shown);
        }

        let sentence = words(&["the", "fish", "swims", "in", "the", "sea"]);
        let repeated = words(&["la", "la"]);
        for _ in 0..50 {
            assert_ne!(mistaken_sentence(&sentence, &mut rng), sentence);
            assert_ne!(mistaken_sentence(&repeated, &mut rng), repeated);
        }
    }

    #[test]
    fn scripted_policy_follows_script_then_succeeds() {
        let mut policy = ScriptedPolicy::new(&[false, true], 1);
        let shown = [SeaItem::Shell, SeaItem::Coral];
        assert_ne!(policy.recall(&shown, &SeaItem::ALL), shown);
        assert_eq!(policy.recall(&shown, &SeaItem::ALL), shown);
        assert_eq!(policy.recall(&shown, &SeaItem::ALL), shown);
    }

    #[test]
    fn perfect_policy_never_misses() {
        let mut policy = PlayerStrategy::Perfect.create_policy(9);
        let shown = [SeaItem::Turtle, SeaItem::Jellyfish, SeaItem::Starfish];
        for _ in 0..20 {
            assert_eq!(policy.recall(&shown, &SeaItem::ALL), shown);
        }
        assert_eq!(policy.name(), "Perfect");
    }
}
