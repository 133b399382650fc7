mod ui;

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use speedtype::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    dictionary::Dictionary,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    word_source::{RandomWordSource, WordSource},
    SessionConfig, TypingSession,
};
use std::{
    fs::{self, OpenOptions},
    io::{self, stdin},
    sync::Mutex,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// timed typing test: type the word stream, get wpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed typing test. Type each word and press space to move on; the test ends when the clock runs out or the words do. Paste is allowed."
)]
pub struct Cli {
    /// number of words to use in test [default: saved setting, or 50]
    #[clap(short = 'w', long)]
    number_of_words: Option<usize>,

    /// number of seconds to run test [default: saved setting, or 60]
    #[clap(short = 's', long)]
    number_of_secs: Option<u32>,

    /// save the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlay command line flags on the stored settings
    fn apply(&self, stored: Config) -> Config {
        Config {
            number_of_words: self.number_of_words.unwrap_or(stored.number_of_words),
            number_of_secs: self.number_of_secs.unwrap_or(stored.number_of_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App<S: WordSource = RandomWordSource> {
    pub session: TypingSession<S>,
}

impl<S: WordSource> App<S> {
    pub fn new(session: TypingSession<S>) -> Self {
        Self { session }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Quit
            }
            KeyCode::Tab => {
                self.session.reset();
                return Flow::Continue;
            }
            _ => {}
        }

        if self.session.on_key_event(key.code) {
            return Flow::Continue;
        }

        match key.code {
            // chords produce no text
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let mut value = self.session.input_buffer().to_owned();
                value.push(c);
                self.session.on_input_changed(&value);
            }
            KeyCode::Backspace => {
                let mut value = self.session.input_buffer().to_owned();
                value.pop();
                self.session.on_input_changed(&value);
            }
            _ => {}
        }

        Flow::Continue
    }

    fn paste(&mut self, text: &str) {
        let mut value = self.session.input_buffer().to_owned();
        value.push_str(text);
        self.session.on_input_changed(&value);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    let session_config = match SessionConfig::try_from(&config) {
        Ok(sc) => sc,
        Err(err) => Cli::command().error(ErrorKind::ValueValidation, err).exit(),
    };

    if cli.save_config {
        store
            .save(&config)
            .with_context(|| format!("saving settings to {}", store.path().display()))?;
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let dictionary = Dictionary::builtin().context("loading the built-in word list")?;
    let mut app = App::new(TypingSession::new(
        session_config,
        dictionary,
        RandomWordSource::new(),
    ));
    info!(
        words = session_config.number_of_words.get(),
        secs = session_config.number_of_secs.get(),
        "starting"
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    result
}

/// Log to a file: the terminal belongs to the UI. Silently runs without
/// logging when the state dir is unusable.
fn init_tracing() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env("SPEEDTYPE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("speedtype=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::every_second());

    loop {
        runner.track(app.session.timer_handle());
        terminal.draw(|f| ui(app, f))?;

        let Some(event) = runner.step() else {
            break;
        };

        match event {
            AppEvent::Tick(handle) => {
                app.session.on_tick(handle);
            }
            AppEvent::Resize => {}
            AppEvent::Paste(text) => app.paste(&text),
            AppEvent::Key(key) => {
                if app.handle_key(key) == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn ui<S: WordSource>(app: &App<S>, f: &mut Frame) {
    f.render_widget(app, f.area());
}
