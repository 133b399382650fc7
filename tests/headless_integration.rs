use std::num::{NonZeroU32, NonZeroUsize};
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use speedtype::dictionary::Dictionary;
use speedtype::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use speedtype::timer::TickOutcome;
use speedtype::word_source::IndexedWordSource;
use speedtype::{SessionConfig, SessionState, TypingSession};

fn cat_dog_session(words: usize, secs: u32) -> TypingSession<IndexedWordSource> {
    let dict = Dictionary::new("test", ["cat", "dog"]).unwrap();
    let config = SessionConfig {
        number_of_words: NonZeroUsize::new(words).unwrap(),
        number_of_secs: NonZeroU32::new(secs).unwrap(),
    };
    TypingSession::new(config, dict, IndexedWordSource::new(vec![0, 1]))
}

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

/// Feed events through a Runner the way the binary does, keeping the
/// runner's schedule in step with the session's live timer.
fn drive<S: speedtype::word_source::WordSource>(
    runner: &mut Runner<TestEventSource, FixedTicker>,
    session: &mut TypingSession<S>,
    max_steps: u32,
    until: impl Fn(&TypingSession<S>) -> bool,
) {
    for _ in 0..max_steps {
        runner.track(session.timer_handle());
        match runner.step() {
            Some(AppEvent::Tick(handle)) => {
                session.on_tick(handle);
            }
            Some(AppEvent::Key(key)) => {
                if session.on_key_event(key.code) {
                    continue;
                }
                if let KeyCode::Char(c) = key.code {
                    let mut value = session.input_buffer().to_owned();
                    value.push(c);
                    session.on_input_changed(&value);
                }
            }
            Some(AppEvent::Paste(text)) => {
                let mut value = session.input_buffer().to_owned();
                value.push_str(&text);
                session.on_input_changed(&value);
            }
            Some(AppEvent::Resize) => {}
            None => break,
        }
        if until(session) {
            break;
        }
    }
}

// Headless end-to-end: two exact words exhaust the stream before the clock runs out.
#[test]
fn headless_typing_flow_completes() {
    let mut session = cat_dog_session(2, 60);
    assert_eq!(session.words(), ["cat", "dog"]);

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_secs(1)),
    );

    for c in "cat dog ".chars() {
        tx.send(key(c)).unwrap();
    }

    drive(&mut runner, &mut session, 100, |s| {
        s.state() == SessionState::Finished
    });

    assert_eq!(session.state(), SessionState::Finished);
    assert_eq!(session.typed_word_count(), 2);
    assert_eq!(session.error_count(), 0);
    assert_eq!(session.accuracy(), 100);
    assert!(session.timer_handle().is_none());
}

#[test]
fn headless_timed_session_finishes_by_time() {
    let mut session = cat_dog_session(50, 3);

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(AppEvent::Paste("cat dgo ".into())).unwrap();

    drive(&mut runner, &mut session, 50, |s| {
        s.state() == SessionState::Finished
    });

    assert_eq!(
        session.state(),
        SessionState::Finished,
        "timed session should finish by timeout"
    );
    assert_eq!(session.remaining_time(), 0);
    // pasted "cat dgo" is one submission against "cat"
    assert_eq!(session.typed_word_count(), 1);
    assert_eq!(session.error_count(), 4);
    assert_eq!(session.wpm(), 20);
    assert_eq!(session.accuracy(), 43);
}

#[test]
fn headless_enter_restarts_finished_session() {
    let mut session = cat_dog_session(1, 60);

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_secs(1)),
    );

    for c in "cat ".chars() {
        tx.send(key(c)).unwrap();
    }
    tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
        .unwrap();
    drop(tx);

    drive(&mut runner, &mut session, 20, |_| false);

    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.typed_word_count(), 0);
    assert!(session.results().is_none());
}

#[test]
fn headless_reset_discards_in_flight_tick() {
    let mut session = cat_dog_session(50, 60);
    session.on_input_changed("c");

    let (_tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    runner.track(session.timer_handle());

    // a tick is already due for the first run when the session resets
    let Some(AppEvent::Tick(stale)) = runner.step() else {
        panic!("expected a tick for the running session");
    };
    session.reset();
    session.on_input_changed("d");

    assert_eq!(session.on_tick(stale), TickOutcome::Ignored);
    assert_eq!(session.remaining_time(), 60);

    runner.track(session.timer_handle());
    let Some(AppEvent::Tick(fresh)) = runner.step() else {
        panic!("expected a tick for the new run");
    };
    assert_ne!(stale, fresh);
    assert_eq!(
        session.on_tick(fresh),
        TickOutcome::Ticked { remaining: 59 }
    );
}
