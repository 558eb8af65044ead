use ocean_game::{
    Band, GameDataStore, GameId, GameMetric, GameSession, GameSuite, ItemPick, KeyValueStore,
    ManualClock, MemoryCoveSession, MemoryStore, ResultsReport, SentenceSeaSession, SessionPhase,
    SuiteConfig, percentage,
};
use std::collections::HashSet;

fn suite_config() -> SuiteConfig {
    SuiteConfig::from_json(include_str!(
        "../../ocean-web/static/assets/data/suite.json"
    ))
    .unwrap()
}

fn suite() -> GameSuite<MemoryStore> {
    GameSuite::with_config(suite_config(), MemoryStore::new()).unwrap()
}

/// Play a sentence-sea session, answering correctly in the rounds listed in `correct`.
fn play_sentences(
    session: &mut SentenceSeaSession<ManualClock>,
    clock: &ManualClock,
    correct: &[bool],
) {
    session.start_session().unwrap();
    for &answer_correctly in correct {
        clock.advance_ms(3_500.0);
        if answer_correctly {
            let words = session.current_challenge().unwrap().sentence.words.clone();
            for word in &words {
                let index = session
                    .available_tiles()
                    .into_iter()
                    .find(|(_, tile)| tile == word)
                    .map(|(i, _)| i)
                    .unwrap();
                session.select_tile(index).unwrap();
            }
        } else {
            session.select_tile(0).unwrap();
        }
        assert_eq!(session.check_sentence().unwrap(), answer_correctly);
        let phase = session.advance().unwrap();
        assert!(matches!(
            phase,
            SessionPhase::InRound | SessionPhase::Complete
        ));
    }
}

/// Play memory cove, clearing `pass_levels` levels and then missing the next one.
fn play_memory(
    session: &mut MemoryCoveSession<ManualClock>,
    clock: &ManualClock,
    pass_levels: u32,
) -> SessionPhase {
    session.start_session().unwrap();
    loop {
        clock.advance_ms(1_200.0);
        let sequence = session.current_challenge().unwrap().clone();
        if session.level() <= pass_levels {
            let mut last = None;
            for item in sequence {
                last = Some(session.select_item(item).unwrap());
            }
            assert_eq!(last, Some(ItemPick::Submitted { correct: true }));
        } else {
            let mut answer = sequence;
            answer.pop();
            assert!(!session.submit_response(answer).unwrap());
        }
        let phase = session.advance().unwrap();
        if phase.is_complete() {
            return phase;
        }
    }
}

#[test]
fn shipped_config_matches_defaults() {
    assert_eq!(suite_config(), SuiteConfig::default());
}

#[test]
fn sentence_sea_three_of_five_is_developing() {
    let suite = suite();
    let clock = ManualClock::starting_at(1_000.0);
    let mut session = suite.sentence_sea(42, clock.clone());
    play_sentences(&mut session, &clock, &[true, false, true, false, true]);

    assert_eq!(session.phase(), SessionPhase::Complete);
    assert_eq!(session.rounds().len(), 5);
    let summary = suite.finish(&session).unwrap().unwrap();
    assert_eq!(summary.metric, GameMetric::Score { score: 3 });
    assert!(summary.completed);
    assert!((summary.total_time_seconds - 17.5).abs() < 1e-9);
    assert!(
        summary
            .rounds
            .iter()
            .all(|r| (r.reaction_time_seconds - 3.5).abs() < 1e-9)
    );

    let report = suite.results_report();
    let result = report.game(GameId::SentenceSea).unwrap();
    assert_eq!(result.percentage, 60);
    assert_eq!(result.band, Band::Developing);
    assert_eq!(
        result.recommendation,
        suite
            .config()
            .results
            .recommendation(GameId::SentenceSea, Band::Developing)
    );
}

#[test]
fn memory_cove_failing_level_five_keeps_five() {
    let suite = suite();
    let clock = ManualClock::starting_at(0.0);
    let mut session = suite.memory_cove(7, clock.clone());
    play_memory(&mut session, &clock, 4);

    assert_eq!(session.rounds().len(), 5);
    assert_eq!(session.max_sequence_reached(), 5);
    let summary = suite.finish(&session).unwrap().unwrap();
    assert!(!summary.completed);
    assert_eq!(
        summary.metric,
        GameMetric::MaxSequence {
            max_sequence_reached: 5
        }
    );
    let result = suite.results_report();
    assert_eq!(result.game(GameId::MemoryCove).unwrap().percentage, 71);
}

#[test]
fn memory_cove_clearing_every_level_completes() {
    let suite = suite();
    let clock = ManualClock::starting_at(0.0);
    let mut session = suite.memory_cove(9, clock.clone());
    play_memory(&mut session, &clock, u32::MAX);

    assert_eq!(session.rounds().len(), 6);
    let summary = session.summary().unwrap();
    assert!(summary.completed);
    assert_eq!(summary.raw_score(), 7);
    assert!(summary.rounds.iter().all(|r| r.correct));
}

#[test]
fn record_count_matches_rounds_played() {
    for pass_levels in 0..=6 {
        let clock = ManualClock::starting_at(0.0);
        let mut session = suite().memory_cove(u64::from(pass_levels), clock.clone());
        play_memory(&mut session, &clock, pass_levels);
        let expected = (pass_levels + 1).min(6) as usize;
        assert_eq!(session.rounds().len(), expected, "passing {pass_levels} levels");
    }

    for mask in [0b00000_u8, 0b11111, 0b10101, 0b01000] {
        let clock = ManualClock::starting_at(0.0);
        let mut session = suite().sentence_sea(u64::from(mask), clock.clone());
        let answers: Vec<bool> = (0..5).map(|bit| mask & (1 << bit) != 0).collect();
        play_sentences(&mut session, &clock, &answers);
        assert_eq!(session.rounds().len(), 5);
        assert_eq!(session.score(), mask.count_ones());
    }
}

#[test]
fn sentences_do_not_repeat_within_a_session() {
    for seed in 0..20 {
        let clock = ManualClock::starting_at(0.0);
        let mut session = suite().sentence_sea(seed, clock.clone());
        play_sentences(&mut session, &clock, &[false; 5]);
        let distinct: HashSet<Vec<String>> = session
            .rounds()
            .iter()
            .map(|r| r.expected.clone())
            .collect();
        assert_eq!(distinct.len(), 5, "seed {seed}");
    }
}

#[test]
fn memory_sequences_avoid_those_already_shown() {
    let clock = ManualClock::starting_at(0.0);
    let mut session = suite().memory_cove(5, clock);
    session.start_session().unwrap();
    let shown = session.current_challenge().unwrap().clone();
    for _ in 0..40 {
        assert_ne!(session.generate_challenge(1).unwrap(), shown);
    }
}

#[test]
fn percentage_stays_within_bounds() {
    for game in GameId::ALL {
        let maximum = game.default_max_score();
        for raw in 0..=maximum {
            let pct = percentage(raw, maximum);
            assert!(pct <= 100, "{game} {raw}/{maximum}");
        }
        assert_eq!(percentage(maximum, maximum), 100);
        assert_eq!(percentage(0, maximum), 0);
    }
    assert_eq!(percentage(3, 0), 0);
}

#[test]
fn summaries_survive_a_fresh_adapter() {
    let store = MemoryStore::new();
    let suite = GameSuite::with_config(suite_config(), store.clone()).unwrap();
    let clock = ManualClock::starting_at(0.0);
    let mut session = suite.sentence_sea(1, clock.clone());
    play_sentences(&mut session, &clock, &[true; 5]);
    let saved = suite.finish(&session).unwrap().unwrap();

    let reopened = GameDataStore::new(store.clone());
    let loaded = reopened.load_all();
    assert_eq!(loaded.get(&GameId::SentenceSea), Some(&saved));

    let report = ResultsReport::from_store(&reopened, &suite_config().results);
    assert_eq!(report.overall_percentage, 100);
    assert_eq!(report.overall_band, Band::Excellent);

    reopened.clear_all().unwrap();
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn wall_clock_sessions_survive_a_fresh_adapter() {
    let store = MemoryStore::new();
    let suite = GameSuite::with_config(suite_config(), store.clone()).unwrap();
    let reopened = GameDataStore::new(store);
    for seed in 0..200_u32 {
        let clock = ManualClock::starting_at(1.76e12 + f64::from(seed) * 0.137);
        let mut session = suite.memory_cove(u64::from(seed), clock.clone());
        session.start_session().unwrap();
        loop {
            clock.advance_ms(1_234.567 + f64::from(seed) * 3.3);
            let sequence = session.current_challenge().unwrap().clone();
            session.submit_response(sequence).unwrap();
            if session.advance().unwrap().is_complete() {
                break;
            }
        }
        let saved = suite.finish(&session).unwrap().unwrap();
        assert_eq!(
            reopened.load(GameId::MemoryCove).as_ref(),
            Some(&saved),
            "seed {seed}: {} s changed on reload",
            saved.total_time_seconds
        );
    }
}

#[test]
fn unknown_game_ids_are_rejected() {
    assert!("kelp-forest".parse::<GameId>().is_err());
    assert!("".parse::<GameId>().is_err());
    assert_eq!(" Memory-Cove ".parse::<GameId>().unwrap(), GameId::MemoryCove);
}
