use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use memory_match::config::AppConfig;
use memory_match::game::Difficulty;
use memory_match::session::{RecordingSink, Services, Session, SystemClock};
use memory_match::storage::{open_store, Leaderboard, Settings, StorageConfig};
use memory_match::symbols::Theme;
use memory_match::ui::App;

const LOG_FILE: &str = "memory-match.log";

/// Flip cards, find pairs, chase combos.
#[derive(Parser)]
#[command(name = "memory-match", about = "Memory card-matching game for the terminal")]
struct Cli {
    /// Difficulty: easy, medium, hard or expert
    #[arg(long, default_value = "easy")]
    difficulty: Difficulty,

    /// Play hot-seat multiplayer with these player names
    #[arg(long, num_args = 1..)]
    players: Vec<String>,

    /// Symbol theme (overrides the saved setting)
    #[arg(long)]
    theme: Option<String>,

    /// Seed for a reproducible deal
    #[arg(long)]
    seed: Option<u64>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "memory-match.toml")]
    config: PathBuf,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    if let Err(e) = init_logging(&config.storage, cli.verbose) {
        eprintln!("Warning: logging disabled: {e}");
    }
    tracing::info!(config = %cli.config.display(), "starting");

    let (mut settings_store, open_err) = open_store(&config.storage);
    let (mut settings, settings_err) = Settings::load(&*settings_store);

    let (leaderboard_store, _) = open_store(&config.storage);
    let (leaderboard, leaderboard_err) = Leaderboard::load(leaderboard_store);

    if let Some(tag) = cli.theme.as_deref() {
        let theme = Theme::from_tag_or_default(tag);
        // non-fatal, save logs its own failure
        let _ = settings.set_theme(theme.tag(), &mut *settings_store);
    }
    let theme = Theme::from_tag_or_default(&settings.theme);

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let notifications = RecordingSink::new();
    let services = Services {
        clock: Box::new(SystemClock::new()),
        sink: Box::new(notifications.clone()),
        symbols: Box::new(theme),
        leaderboard,
        rng,
    };

    let mut session = Session::new(&config, services);
    if cli.players.is_empty() {
        session.start_single(cli.difficulty)
    } else {
        session.start_multiplayer(cli.difficulty, &cli.players)
    }
    .context("starting round")?;

    let mut app = App::new(session, notifications, settings, settings_store);
    if open_err.is_some() || settings_err.is_some() || leaderboard_err.is_some() {
        app.set_message("Storage unavailable: settings and scores will not be saved");
    }

    run(&mut app).context("running terminal UI")?;
    tracing::info!("exiting");
    Ok(())
}

/// Log to a file in the data directory; the terminal belongs to the UI.
fn init_logging(storage: &StorageConfig, verbose: bool) -> io::Result<()> {
    std::fs::create_dir_all(&storage.data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(storage.data_dir.join(LOG_FILE))?;

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn run(app: &mut App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
