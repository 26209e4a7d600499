use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use hangr::app::{App, Control};
use hangr::round::{Phase, RoundEngine, ROUND_DURATION_SECS};
use hangr::runtime::{GameEvent, Runner, TestEventSource};
use hangr::word_source::{resolve_secret, BundledWords, FixedWord, WordSource, FALLBACK_WORD};
use hangr::DifficultyProfile;

fn key(c: char) -> GameEvent {
    GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn enter() -> GameEvent {
    GameEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
}

// Drives the app the same way the binary does, until it settles or quits.
fn drive(app: &mut App, runner: &Runner<TestEventSource>, max_steps: u32) {
    for _ in 0..max_steps {
        if let Some(ev) = runner.step() {
            if app.handle_event(ev) == Control::Quit {
                break;
            }
        }
        if app.engine().phase().is_finished() {
            break;
        }
    }
}

#[test]
fn headless_round_is_won_by_typing() {
    let runner = Runner::new(TestEventSource::new(), Duration::from_millis(5));
    let mut app = App::new(
        RoundEngine::default(),
        Box::new(FixedWord("sea tea".into())),
        runner.sender(),
    )
    .with_tick_interval(Duration::from_secs(3600));

    let tx = runner.sender();
    tx.send(enter()).unwrap();
    for c in "seat".chars() {
        tx.send(key(c)).unwrap();
    }

    drive(&mut app, &runner, 100);

    let snap = app.snapshot();
    assert_eq!(snap.round.phase(), Phase::Won);
    assert_eq!(snap.counters.wins, 1);
    assert!(!app.timer_running());
}

#[test]
fn headless_round_times_out() {
    let runner = Runner::new(TestEventSource::new(), Duration::from_millis(50));
    let mut app = App::new(
        RoundEngine::default(),
        Box::new(FixedWord("ab".into())),
        runner.sender(),
    )
    .with_tick_interval(Duration::from_millis(1));

    runner.sender().send(enter()).unwrap();
    drive(&mut app, &runner, 10_000);

    let snap = app.snapshot();
    assert_eq!(snap.round.phase(), Phase::Lost);
    assert_eq!(snap.round.time_remaining(), 0);
    assert_eq!(snap.counters.losses, 1);
    assert!(!app.timer_running());
}

#[test]
fn headless_rounds_keep_session_score() {
    let runner = Runner::new(TestEventSource::new(), Duration::from_millis(5));
    let mut app = App::new(
        RoundEngine::default(),
        Box::new(FixedWord("dog".into())),
        runner.sender(),
    )
    .with_tick_interval(Duration::from_secs(3600));

    let tx = runner.sender();
    tx.send(enter()).unwrap();
    for c in "dog".chars() {
        tx.send(key(c)).unwrap();
    }
    drive(&mut app, &runner, 100);
    assert_eq!(app.engine().phase(), Phase::Won);

    tx.send(enter()).unwrap();
    tx.send(GameEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))
        .unwrap();
    drive(&mut app, &runner, 100);

    let snap = app.snapshot();
    assert_eq!(snap.round.phase(), Phase::Lost);
    assert_eq!(snap.round.time_remaining(), ROUND_DURATION_SECS);
    assert_eq!((snap.counters.wins, snap.counters.losses), (1, 1));
}

struct Offline;

impl WordSource for Offline {
    fn next_word(
        &mut self,
        _: &DifficultyProfile,
    ) -> Result<String, hangr::word_source::WordSourceError> {
        Err(hangr::word_source::WordSourceError::EmptyResponse)
    }
}

#[test]
fn failing_word_source_plays_the_fallback_word() {
    let runner = Runner::new(TestEventSource::new(), Duration::from_millis(5));
    let mut app = App::new(RoundEngine::default(), Box::new(Offline), runner.sender())
        .with_tick_interval(Duration::from_secs(3600));

    app.start_round().unwrap();
    assert_eq!(app.snapshot().round.secret(), FALLBACK_WORD.to_uppercase());
}

#[test]
fn bundled_words_always_start_a_round() {
    let mut words = BundledWords::new().unwrap();
    for difficulty in hangr::Difficulty::ALL {
        let profile = difficulty.profile();
        let secret = resolve_secret(&mut words, &profile);
        let mut engine = RoundEngine::new(profile);
        engine.start_round(&secret, profile).unwrap();
        assert_eq!(engine.phase(), Phase::Playing);
    }
}
