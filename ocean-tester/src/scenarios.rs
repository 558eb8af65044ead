//! Scenario catalogue: each scenario plays seeded sessions and checks one
//! property of the suite.
use anyhow::{Context, Result, ensure};
use ocean_game::{
    Band, GameDataStore, GameId, GameMetric, GameSession, GameSuite, KeyValueStore, MemoryStore,
    REGISTRY_KEY, ResultsReport, SeaItem, SuiteConfig, percentage, sequences_match, summary_key,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::collections::HashSet;

use crate::policy::{PlayerStrategy, ScriptedPolicy, mistaken_sequence};
use crate::simulation::{SessionRun, simulate_memory_cove, simulate_sentence_sea};

/// Shared inputs for every scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioCtx {
    pub config: SuiteConfig,
    pub verbose: bool,
}

type ScenarioCheck = fn(&ScenarioCtx, u64) -> Result<()>;

#[derive(Clone, Copy)]
pub struct Scenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub check: ScenarioCheck,
}

impl Scenario {
    /// # Errors
    ///
    /// Returns the first property violation found for `seed`.
    pub fn run(&self, ctx: &ScenarioCtx, seed: u64) -> Result<()> {
        (self.check)(ctx, seed)
    }
}

const CATALOG: &[Scenario] = &[
    Scenario {
        key: "smoke",
        name: "Smoke",
        description: "Play one session of each game and build a report",
        check: smoke,
    },
    Scenario {
        key: "record-count",
        name: "Round Record Count",
        description: "Every played round leaves exactly one record, for every player profile",
        check: record_count,
    },
    Scenario {
        key: "sequence-match",
        name: "Ordered Sequence Matching",
        description: "Exact answers match; any substitution, reorder or length change does not",
        check: sequence_match,
    },
    Scenario {
        key: "no-repeat",
        name: "No Repeated Challenges",
        description: "Sessions never repeat a sentence or sequence while alternatives remain",
        check: no_repeat,
    },
    Scenario {
        key: "percentage-bounds",
        name: "Percentage Bounds",
        description: "Per-game and overall percentages stay within 0..=100",
        check: percentage_bounds,
    },
    Scenario {
        key: "persistence-roundtrip",
        name: "Persistence Round Trip",
        description: "Saved summaries load back unchanged and clear-all empties storage",
        check: persistence_roundtrip,
    },
    Scenario {
        key: "malformed-storage",
        name: "Malformed Storage",
        description: "Corrupt stored entries are skipped instead of failing the report",
        check: malformed_storage,
    },
    Scenario {
        key: "sentence-developing",
        name: "Sentence Sea Three of Five",
        description: "Three correct sentences out of five score 60% (Developing)",
        check: sentence_developing,
    },
    Scenario {
        key: "memory-level-five",
        name: "Memory Cove Level Five Miss",
        description: "Clearing levels 1-4 then missing level 5 keeps a best sequence of 5",
        check: memory_level_five,
    },
    Scenario {
        key: "determinism",
        name: "Deterministic Sessions",
        description: "The same seed and answers reproduce the same session",
        check: determinism,
    },
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG.iter().map(|s| (s.key, s.description)).collect()
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<Scenario> {
    CATALOG.iter().copied().find(|s| s.key == key)
}

#[must_use]
pub fn all_scenario_keys() -> Vec<String> {
    CATALOG.iter().map(|s| s.key.to_string()).collect()
}

fn suite(ctx: &ScenarioCtx, store: MemoryStore) -> Result<GameSuite<MemoryStore>> {
    GameSuite::with_config(ctx.config.clone(), store).context("suite configuration rejected")
}

fn describe(run: &SessionRun) -> String {
    format!(
        "{} {} seed {}: {}/{} correct",
        run.game_id,
        run.policy,
        run.seed,
        run.correct_answers(),
        run.outcomes.len()
    )
}

fn smoke(ctx: &ScenarioCtx, seed: u64) -> Result<()> {
    let store = MemoryStore::new();
    let suite = suite(ctx, store)?;
    let mut policy = PlayerStrategy::Skilled.create_policy(seed);

    let (memory, memory_session) =
        simulate_memory_cove(&ctx.config.memory_cove, policy.as_mut(), seed)?;
    let (sentence, sentence_session) =
        simulate_sentence_sea(&ctx.config.sentence_sea, policy.as_mut(), seed)?;
    if ctx.verbose {
        println!("     ↳ {}", describe(&memory));
        println!("     ↳ {}", describe(&sentence));
    }
    suite.finish(&memory_session)?;
    suite.finish(&sentence_session)?;

    let report = suite.results_report();
    ensure!(report.played_count() == 2, "expected 2 played games, found {}", report.played_count());
    ensure!(report.games.len() == GameId::ALL.len(), "report must list every game");
    Ok(())
}

fn record_count(ctx: &ScenarioCtx, seed: u64) -> Result<()> {
    for strategy in PlayerStrategy::ALL {
        let mut policy = strategy.create_policy(seed);
        let (run, session) = simulate_memory_cove(&ctx.config.memory_cove, policy.as_mut(), seed)?;
        ensure!(
            session.rounds().len() == run.outcomes.len(),
            "{}: {} records for {} rounds",
            describe(&run),
            session.rounds().len(),
            run.outcomes.len()
        );
        let streak = run.correct_streak();
        let max_level = ctx.config.memory_cove.max_level as usize;
        let expected_rounds = if streak >= max_level { max_level } else { streak + 1 };
        ensure!(
            run.outcomes.len() == expected_rounds,
            "{}: session should stop at the first mistake",
            describe(&run)
        );
        let expected_best = if streak == 0 { 0 } else { streak + 1 };
        ensure!(
            session.max_sequence_reached() as usize == expected_best,
            "{}: best sequence {} but expected {expected_best}",
            describe(&run),
            session.max_sequence_reached()
        );

        let (run, session) =
            simulate_sentence_sea(&ctx.config.sentence_sea, policy.as_mut(), seed)?;
        let planned = ctx.config.sentence_sea.total_rounds as usize;
        ensure!(
            session.rounds().len() == planned && run.outcomes.len() == planned,
            "{}: sentence sea must play all {planned} rounds",
            describe(&run)
        );
        let expected_metric = GameMetric::Score {
            score: u32::try_from(run.correct_answers())?,
        };
        ensure!(
            run.summary.metric == expected_metric,
            "{}: score does not match correct answers",
            describe(&run)
        );
    }
    Ok(())
}

fn sequence_match(_ctx: &ScenarioCtx, seed: u64) -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    for _ in 0..100 {
        let len = rng.gen_range(1..=8);
        let expected: Vec<SeaItem> = (0..len)
            .filter_map(|_| SeaItem::ALL.choose(&mut rng).copied())
            .collect();
        ensure!(sequences_match(&expected, &expected), "identical sequences must match");

        let wrong = mistaken_sequence(&expected, &SeaItem::ALL, &mut rng);
        ensure!(!sequences_match(&expected, &wrong), "substitution matched: {wrong:?}");

        let shorter = &expected[..expected.len() - 1];
        ensure!(!sequences_match(&expected, shorter), "prefix matched");

        let mut longer = expected.clone();
        longer.push(expected[0]);
        ensure!(!sequences_match(&expected, &longer), "extension matched");
    }
    Ok(())
}

fn no_repeat(ctx: &ScenarioCtx, seed: u64) -> Result<()> {
    let mut policy = PlayerStrategy::Novice.create_policy(seed);
    let (run, _) = simulate_sentence_sea(&ctx.config.sentence_sea, policy.as_mut(), seed)?;
    let distinct_pool: HashSet<String> = ctx
        .config
        .sentence_sea
        .sentences
        .iter()
        .map(ocean_game::Sentence::text)
        .collect();
    let shown: Vec<&Vec<String>> = run.summary.rounds.iter().map(|r| &r.expected).collect();
    let distinct: HashSet<&Vec<String>> = shown.iter().copied().collect();
    let expected_distinct = shown.len().min(distinct_pool.len());
    ensure!(
        distinct.len() == expected_distinct,
        "{}: {} distinct sentences across {} rounds",
        describe(&run),
        distinct.len(),
        shown.len()
    );

    let mut session = ocean_game::MemoryCoveSession::new(
        ctx.config.memory_cove.clone(),
        seed,
        ocean_game::ManualClock::default(),
    );
    let first = session.start_session()?.clone();
    if ctx.config.memory_cove.items.len() > 1 {
        for _ in 0..20 {
            ensure!(
                session.generate_challenge(1)? != first,
                "memory cove redrew the sequence already shown"
            );
        }
    }
    Ok(())
}

fn percentage_bounds(ctx: &ScenarioCtx, seed: u64) -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let limits = &ctx.config.results.limits;
    for game in GameId::ALL {
        let maximum = limits.max_score(game);
        for raw in 0..=maximum {
            let pct = percentage(raw, maximum);
            ensure!(pct <= 100, "{game}: {raw}/{maximum} gave {pct}%");
        }
    }

    let store = MemoryStore::new();
    let suite = suite(ctx, store)?;
    for strategy in PlayerStrategy::ALL {
        let mut policy = strategy.create_policy(rng.gen_range(0..u64::MAX));
        let (_, memory) = simulate_memory_cove(&ctx.config.memory_cove, policy.as_mut(), seed)?;
        let (_, sentence) = simulate_sentence_sea(&ctx.config.sentence_sea, policy.as_mut(), seed)?;
        suite.finish(&memory)?;
        suite.finish(&sentence)?;
        let report = suite.results_report();
        ensure!(report.overall_percentage <= 100, "overall {}%", report.overall_percentage);
        for game in &report.games {
            ensure!(game.percentage <= 100, "{}: {}%", game.game_id, game.percentage);
        }
    }
    Ok(())
}

fn persistence_roundtrip(ctx: &ScenarioCtx, seed: u64) -> Result<()> {
    let store = MemoryStore::new();
    let suite = suite(ctx, store.clone())?;
    let mut policy = PlayerStrategy::Skilled.create_policy(seed);
    let (_, memory) = simulate_memory_cove(&ctx.config.memory_cove, policy.as_mut(), seed)?;
    let (_, sentence) = simulate_sentence_sea(&ctx.config.sentence_sea, policy.as_mut(), seed)?;
    let saved_memory = suite.finish(&memory)?.context("memory cove not saved")?;
    let saved_sentence = suite.finish(&sentence)?.context("sentence sea not saved")?;

    let reopened = GameDataStore::with_limits(store.clone(), ctx.config.results.limits.clone());
    let loaded = reopened.load_all();
    ensure!(loaded.get(&GameId::MemoryCove) == Some(&saved_memory), "memory cove summary changed");
    ensure!(
        loaded.get(&GameId::SentenceSea) == Some(&saved_sentence),
        "sentence sea summary changed"
    );

    reopened.clear_all()?;
    ensure!(reopened.load_all().is_empty(), "summaries survived clear-all");
    ensure!(store.keys()?.is_empty(), "keys survived clear-all: {:?}", store.keys()?);
    Ok(())
}

fn malformed_storage(ctx: &ScenarioCtx, seed: u64) -> Result<()> {
    let store = MemoryStore::new();
    let suite = suite(ctx, store.clone())?;
    let mut policy = PlayerStrategy::Perfect.create_policy(seed);
    let (_, sentence) = simulate_sentence_sea(&ctx.config.sentence_sea, policy.as_mut(), seed)?;
    suite.finish(&sentence)?;

    store.set(REGISTRY_KEY, r#"["sentence-sea","memory-cove","word-reef","kelp-forest"]"#)?;
    store.set(&summary_key(GameId::MemoryCove), "{\"game_id\":")?;
    store.set(&summary_key(GameId::WordReef), r#"{"game_id":"word-reef","rounds":[],"total_time_seconds":1.0,"metric":{"kind":"score","score":99},"completed":true}"#)?;

    let report = ResultsReport::from_store(suite.data_store(), &ctx.config.results);
    ensure!(report.played_count() == 1, "only the valid summary should count");
    let sentence = report.game(GameId::SentenceSea).context("sentence sea missing")?;
    ensure!(sentence.percentage == 100, "perfect sentence sea scored {}%", sentence.percentage);
    ensure!(report.overall_band == Band::Excellent, "overall band {}", report.overall_band);
    Ok(())
}

fn sentence_developing(ctx: &ScenarioCtx, seed: u64) -> Result<()> {
    let mut script = vec![true, true, true, false, false];
    script.shuffle(&mut ChaCha20Rng::seed_from_u64(seed));
    let mut policy = ScriptedPolicy::new(&script, seed);
    let suite = suite(ctx, MemoryStore::new())?;
    let mut sentence_config = ctx.config.sentence_sea.clone();
    sentence_config.total_rounds = 5;
    let (run, session) = simulate_sentence_sea(&sentence_config, &mut policy, seed)?;
    ensure!(run.outcomes == script, "answers {:?} did not follow {script:?}", run.outcomes);
    ensure!(session.score() == 3, "score {}", session.score());

    let summary = suite.finish(&session)?.context("sentence sea not saved")?;
    let percentage = percentage(summary.raw_score(), sentence_config.max_score());
    let band = ctx.config.results.bands.band_for(percentage);
    ensure!(percentage == 60, "percentage {percentage}");
    ensure!(band == Band::Developing, "band {band}");
    Ok(())
}

fn memory_level_five(ctx: &ScenarioCtx, seed: u64) -> Result<()> {
    let mut policy = ScriptedPolicy::new(&[true, true, true, true, false], seed);
    let mut memory_config = ctx.config.memory_cove.clone();
    memory_config.max_level = memory_config.max_level.max(5);
    let (run, session) = simulate_memory_cove(&memory_config, &mut policy, seed)?;
    ensure!(run.outcomes.len() == 5, "played {} levels", run.outcomes.len());
    ensure!(
        session.max_sequence_reached() == 5,
        "best sequence {}",
        session.max_sequence_reached()
    );
    ensure!(!run.summary.completed, "session marked completed after a miss");
    Ok(())
}

fn determinism(ctx: &ScenarioCtx, seed: u64) -> Result<()> {
    let play = || -> Result<(SessionRun, SessionRun)> {
        let mut policy = PlayerStrategy::Novice.create_policy(seed);
        let (memory, _) = simulate_memory_cove(&ctx.config.memory_cove, policy.as_mut(), seed)?;
        let (sentence, _) =
            simulate_sentence_sea(&ctx.config.sentence_sea, policy.as_mut(), seed)?;
        Ok((memory, sentence))
    };
    let (memory_a, sentence_a) = play()?;
    let (memory_b, sentence_b) = play()?;
    ensure!(memory_a.summary == memory_b.summary, "memory cove diverged for seed {seed}");
    ensure!(sentence_a.summary == sentence_b.summary, "sentence sea diverged for seed {seed}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ScenarioCtx {
        ScenarioCtx {
            config: SuiteConfig::default(),
            verbose: false,
        }
    }

    #[test]
    fn catalog_keys_are_unique() {
        let keys: HashSet<&str> = CATALOG.iter().map(|s| s.key).collect();
        assert_eq!(keys.len(), CATALOG.len());
        assert!(get_scenario("smoke").is_some());
        assert!(get_scenario("missing").is_none());
    }

    #[test]
    fn every_scenario_passes_on_defaults() {
        for scenario in CATALOG {
            for seed in [1, 1337] {
                scenario
                    .run(&ctx(), seed)
                    .unwrap_or_else(|err| panic!("{} seed {seed}: {err:#}", scenario.key));
            }
        }
    }
}
