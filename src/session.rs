use crate::config::{Config, ConfigError};
use crate::dictionary::Dictionary;
use crate::scoring::{score, SessionResults, Tally, WordScore};
use crate::timer::{SessionTimer, TickOutcome, TimerHandle};
use crate::word_source::{RandomWordSource, WordSource, WordStream};
use crossterm::event::KeyCode;
use std::num::{NonZeroU32, NonZeroUsize};
use tracing::{debug, info, trace};

/// Typing a separator completes the current word
pub const SEPARATOR: char = ' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub number_of_words: NonZeroUsize,
    pub number_of_secs: NonZeroU32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            number_of_words: NonZeroUsize::new(50).unwrap_or(NonZeroUsize::MIN),
            number_of_secs: NonZeroU32::new(60).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl TryFrom<&Config> for SessionConfig {
    type Error = ConfigError;

    fn try_from(cfg: &Config) -> Result<Self, Self::Error> {
        Ok(Self {
            number_of_words: NonZeroUsize::new(cfg.number_of_words)
                .ok_or(ConfigError::ZeroWords)?,
            number_of_secs: NonZeroU32::new(cfg.number_of_secs).ok_or(ConfigError::ZeroSeconds)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionState {
    Idle,
    Running,
    Finished,
}

/// What a single input change did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// rejected: the session is over, or nothing to start with
    Ignored,
    Buffered,
    Submitted(WordScore),
    /// the submission consumed the last word
    Completed(WordScore),
}

/// One timed attempt: the word stream, the cursor into it, the running
/// tally and the countdown. All mutation goes through the `on_*` handlers
/// and `reset`.
#[derive(Debug)]
pub struct TypingSession<S: WordSource = RandomWordSource> {
    config: SessionConfig,
    dictionary: Dictionary,
    source: S,
    words: WordStream,
    cursor: usize,
    input: String,
    state: SessionState,
    timer: SessionTimer,
    tally: Tally,
    results: Option<SessionResults>,
}

impl<S: WordSource> TypingSession<S> {
    pub fn new(config: SessionConfig, dictionary: Dictionary, source: S) -> Self {
        let mut session = Self {
            config,
            dictionary,
            source,
            words: WordStream::default(),
            cursor: 0,
            input: String::new(),
            state: SessionState::Idle,
            timer: SessionTimer::new(config.number_of_secs),
            tally: Tally::default(),
            results: None,
        };
        session.initialize();
        session
    }

    /// Draws a fresh word stream and parks the session at the first word.
    pub fn initialize(&mut self) {
        self.words = self
            .source
            .generate(self.config.number_of_words, &self.dictionary);
        self.cursor = 0;
        self.input.clear();
        self.state = SessionState::Idle;
        debug!(words = self.words.len(), "generated word stream");
    }

    pub fn on_input_changed(&mut self, raw: &str) -> InputOutcome {
        if self.state == SessionState::Finished {
            return InputOutcome::Ignored;
        }

        if self.state == SessionState::Idle && !raw.is_empty() {
            self.start();
        }

        if self.state != SessionState::Running {
            return InputOutcome::Ignored;
        }

        if raw.ends_with(SEPARATOR) {
            self.submit(raw.trim())
        } else {
            self.input.clear();
            self.input.push_str(raw);
            InputOutcome::Buffered
        }
    }

    /// Delivers one scheduled second. Ticks from a superseded timer run are
    /// dropped without touching the session.
    pub fn on_tick(&mut self, handle: TimerHandle) -> TickOutcome {
        let outcome = self.timer.tick(handle);
        match outcome {
            TickOutcome::Ignored => debug!(?handle, "dropped stale tick"),
            TickOutcome::Ticked { remaining } => trace!(remaining, "tick"),
            TickOutcome::Expired => self.on_timer_expired(),
        }
        outcome
    }

    pub fn on_timer_expired(&mut self) {
        if self.state == SessionState::Running {
            self.finish();
        }
    }

    /// Returns true when the key restarted the session.
    pub fn on_key_event(&mut self, key: KeyCode) -> bool {
        if self.state == SessionState::Finished && key == KeyCode::Enter {
            self.reset();
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        let from = self.state;
        self.timer.rewind(self.config.number_of_secs);
        self.tally = Tally::default();
        self.results = None;
        self.initialize();
        debug!(%from, "session reset");
    }

    fn start(&mut self) {
        let handle = self.timer.start(self.config.number_of_secs);
        self.state = SessionState::Running;
        debug!(?handle, secs = self.config.number_of_secs.get(), "session started");
    }

    fn submit(&mut self, typed: &str) -> InputOutcome {
        let Some(expected) = self.words.get(self.cursor) else {
            return InputOutcome::Ignored;
        };

        let word = score(expected, typed);
        trace!(expected, typed, errors = word.error_count, "word submitted");

        self.tally.record(word);
        self.cursor += 1;
        self.input.clear();

        if self.cursor >= self.words.len() {
            self.timer.stop();
            self.finish();
            InputOutcome::Completed(word)
        } else {
            InputOutcome::Submitted(word)
        }
    }

    fn finish(&mut self) {
        self.state = SessionState::Finished;
        if self.results.is_some() {
            return;
        }

        let results = SessionResults::compute(&self.tally, self.timer.elapsed());
        info!(
            wpm = results.wpm,
            accuracy = results.accuracy,
            words = self.tally.typed_word_count,
            errors = self.tally.error_count,
            elapsed_secs = self.timer.elapsed(),
            "session finished"
        );
        self.results = Some(results);
    }

    pub fn words(&self) -> &[String] {
        self.words.words()
    }

    pub fn current_word_index(&self) -> usize {
        self.cursor
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.cursor)
    }

    pub fn remaining_time(&self) -> u32 {
        self.timer.remaining()
    }

    pub fn wpm(&self) -> u32 {
        self.results.map_or(0, |r| r.wpm)
    }

    pub fn accuracy(&self) -> u8 {
        self.results.map_or(100, |r| r.accuracy)
    }

    pub fn results(&self) -> Option<SessionResults> {
        self.results
    }

    pub fn typed_word_count(&self) -> usize {
        self.tally.typed_word_count
    }

    pub fn error_count(&self) -> usize {
        self.tally.error_count
    }

    pub fn total_chars_typed(&self) -> usize {
        self.tally.total_chars_typed
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn input_buffer(&self) -> &str {
        &self.input
    }

    /// Handle of the running countdown, if any; the scheduler keys its
    /// ticks on this.
    pub fn timer_handle(&self) -> Option<TimerHandle> {
        self.timer.handle()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn progress_percent(&self) -> f64 {
        if self.words.is_empty() {
            return 0.0;
        }
        self.cursor as f64 / self.words.len() as f64 * 100.0
    }
}
