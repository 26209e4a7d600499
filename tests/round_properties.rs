use std::collections::BTreeSet;

use hangr::difficulty::{EASY, HARD, MEDIUM};
use hangr::round::{Phase, RoundEngine, ROUND_DURATION_SECS};
use hangr::DifficultyProfile;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Guess(char),
    Tick,
    ForceLoss,
    Start(String),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => any::<char>().prop_map(Op::Guess),
        6 => proptest::char::range('a', 'z').prop_map(Op::Guess),
        3 => Just(Op::Tick),
        1 => Just(Op::ForceLoss),
        1 => "[a-z]{1,8}( [a-z]{1,6})?".prop_map(Op::Start),
    ]
}

fn profile() -> impl Strategy<Value = DifficultyProfile> {
    prop_oneof![Just(EASY), Just(MEDIUM), Just(HARD)]
}

fn check_invariants(engine: &RoundEngine) {
    let round = engine.snapshot().round;
    let targets: BTreeSet<char> = round
        .secret()
        .chars()
        .filter(|c| c.is_ascii_uppercase())
        .collect();

    assert!(round.guessed_letters().iter().all(|c| c.is_ascii_uppercase()));

    let misses = round
        .guessed_letters()
        .iter()
        .filter(|c| !targets.contains(c))
        .count() as u32;
    assert_eq!(round.wrong_count(), misses);

    match round.phase() {
        Phase::Won => assert!(targets.is_subset(round.guessed_letters())),
        Phase::Playing => {
            assert!(round.time_remaining() > 0);
            assert!(round.wrong_count() < round.active_difficulty().max_wrong_guesses);
            assert!(!targets.is_subset(round.guessed_letters()));
        }
        Phase::Idle | Phase::Lost => {}
    }
    assert!(round.time_remaining() <= ROUND_DURATION_SECS);
}

proptest! {
    #[test]
    fn invariants_hold_for_any_event_sequence(
        secret in "[a-zA-Z]{1,10}( [a-zA-Z]{1,6})?",
        difficulty in profile(),
        ops in prop::collection::vec(op(), 0..200),
    ) {
        let mut engine = RoundEngine::new(difficulty);
        engine.start_round(&secret, difficulty).unwrap();
        check_invariants(&engine);

        for op in ops {
            let before = engine.snapshot().round.clone();
            let counters_before = engine.counters();
            let was_playing = before.phase() == Phase::Playing;

            match op {
                Op::Guess(c) => { engine.guess_letter(c); }
                Op::Tick => { engine.tick(); }
                Op::ForceLoss => { engine.force_loss(); }
                Op::Start(word) => {
                    let started = engine.start_round(&word, difficulty).is_ok();
                    prop_assert_eq!(started, !was_playing);
                    if started {
                        let round = engine.snapshot().round;
                        prop_assert!(round.guessed_letters().is_empty());
                        prop_assert_eq!(round.wrong_count(), 0);
                        prop_assert_eq!(round.time_remaining(), ROUND_DURATION_SECS);
                    }
                }
            }

            let round = engine.snapshot().round;
            check_invariants(&engine);

            if !was_playing {
                // only a new round may change a round that is not in progress
                if !matches!(round.phase(), Phase::Playing) {
                    prop_assert_eq!(round, &before);
                    prop_assert_eq!(engine.counters(), counters_before);
                }
            } else {
                prop_assert!(round.guessed_letters().is_superset(before.guessed_letters()));
                prop_assert!(round.wrong_count() >= before.wrong_count());
                prop_assert!(round.time_remaining() <= before.time_remaining());
                let finished = round.phase().is_finished() as u32;
                prop_assert_eq!(
                    engine.counters().rounds_played(),
                    counters_before.rounds_played() + finished
                );
            }
        }
    }

    #[test]
    fn repeated_guess_changes_nothing(
        secret in "[a-z]{2,10}",
        letter in proptest::char::range('a', 'z'),
    ) {
        let mut engine = RoundEngine::default();
        engine.start_round(&secret, MEDIUM).unwrap();
        engine.guess_letter(letter);
        let after_first = engine.snapshot().round.clone();
        let counters = engine.counters();

        engine.guess_letter(letter);
        engine.guess_letter(letter.to_ascii_uppercase());

        prop_assert_eq!(engine.snapshot().round, &after_first);
        prop_assert_eq!(engine.counters(), counters);
    }

    #[test]
    fn guessing_every_letter_wins(secret in "[a-z]{1,8}( [a-z]{1,8})?") {
        let mut engine = RoundEngine::default();
        engine.start_round(&secret, HARD).unwrap();

        let letters: BTreeSet<char> = secret.chars().filter(|c| *c != ' ').collect();
        for c in letters {
            engine.guess_letter(c);
        }
        prop_assert_eq!(engine.phase(), Phase::Won);
        prop_assert_eq!(engine.snapshot().round.wrong_count(), 0);
        prop_assert_eq!(engine.counters().wins, 1);
    }
}
