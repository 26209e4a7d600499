use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use hangr::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    difficulty::Difficulty,
    round::RoundEngine,
    runtime::{CrosstermEventSource, Runner},
    word_source::{BundledWords, FixedWord, HttpWordSource, WordSource},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL_MS: u64 = 250;

/// terminal hangman with difficulty levels and a round timer
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Guess the secret word one letter at a time before you run out of wrong guesses or the 60 second round timer runs out."
)]
pub struct Cli {
    /// difficulty to start with (defaults to the last one played)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// use this secret word for every round
    #[clap(short = 'w', long)]
    word: Option<String>,

    /// fetch secret words from an online word API instead of the bundled list
    #[clap(long)]
    online: bool,

    /// word API endpoint; must return a JSON array of words
    #[clap(long)]
    word_api_url: Option<String>,

    /// log file (default: ~/.local/state/hangr/hangr.log, filter with HANGR_LOG)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn word_source(&self, config: &Config) -> Result<Box<dyn WordSource>, Box<dyn Error>> {
        if let Some(word) = &self.word {
            return Ok(Box::new(FixedWord(word.clone())));
        }
        if self.online || config.online_words {
            let url = self
                .word_api_url
                .clone()
                .unwrap_or_else(|| config.word_api_url.clone());
            return Ok(Box::new(HttpWordSource::new(url)?));
        }
        Ok(Box::new(BundledWords::new()?))
    }
}

// The terminal belongs to the TUI, so logs only ever go to a file.
fn init_logging(path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let Some(path) = path.or_else(AppDirs::log_path) else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_env("HANGR_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(cli.log_file.clone())?;

    let store = FileConfigStore::new();
    let mut config = store.load();
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    let words = cli.word_source(&config)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(POLL_INTERVAL_MS),
    );
    let mut app = App::new(
        RoundEngine::new(config.difficulty.profile()),
        words,
        runner.sender(),
    );
    info!(difficulty = %config.difficulty, "session started");

    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    config.difficulty = app.selected_difficulty();
    if let Err(e) = store.save(&config) {
        warn!(error = %e, path = %store.path().display(), "could not save config");
    }

    let counters = app.snapshot().counters;
    info!(wins = counters.wins, losses = counters.losses, "session over");
    if counters.rounds_played() > 0 {
        println!("wins: {}  losses: {}", counters.wins, counters.losses);
    }

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<CrosstermEventSource>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let Some(event) = runner.step() else {
            continue;
        };
        if app.handle_event(event) == Control::Quit {
            break;
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
