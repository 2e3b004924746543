use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use nextguest::{
    app::{App, AppAction},
    app_dirs::AppDirs,
    catalog::PuzzleCatalog,
    clips::{ClipLocator, ExternalPlayer},
    config::{Config, ConfigStore, FileConfigStore},
    engine::SessionEngine,
    prefs::FileKeyValueStore,
    runtime::{GameEvent, Runner, TerminalEvents},
    share::{FileClipboard, Osc52Clipboard},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 100;
const LOG_ENV: &str = "NEXTGUEST_LOG";

/// guess the guest from a handful of short clips
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Each puzzle reveals a talk-show guest through up to five short clips. Guess who it is before your attempts run out, then share your result."
)]
pub struct Cli {
    /// puzzle catalog (json) to use instead of the built-in one
    #[clap(short = 'c', long)]
    catalog: Option<PathBuf>,

    /// puzzle to open first
    #[clap(short = 'p', long)]
    puzzle: Option<String>,

    /// directory holding clips/{puzzle}/{clip}.{format}
    #[clap(long)]
    clips_dir: Option<PathBuf>,

    /// clip file extension
    #[clap(long)]
    clip_format: Option<String>,

    /// command used to play clips (default: the system opener)
    #[clap(long)]
    player: Option<String>,

    /// incorrect guesses allowed before the game is lost
    #[clap(short = 'm', long, value_parser = clap::value_parser!(u16).range(1..))]
    max_attempts: Option<u16>,

    /// switch to the dark theme and remember it
    #[clap(long, conflicts_with = "light")]
    dark: bool,

    /// switch to the light theme and remember it
    #[clap(long)]
    light: bool,

    /// list the available puzzles and exit
    #[clap(long)]
    print_catalog: bool,
}

impl Cli {
    /// Command line flags take precedence over the config file
    fn apply_to(&self, mut cfg: Config) -> Config {
        if let Some(catalog) = &self.catalog {
            cfg.catalog_path = Some(catalog.clone());
        }
        if let Some(dir) = &self.clips_dir {
            cfg.clips_dir = dir.clone();
        }
        if let Some(format) = &self.clip_format {
            cfg.clip_format = format.clone();
        }
        if let Some(player) = &self.player {
            cfg.player = Some(player.clone());
        }
        if let Some(max) = self.max_attempts {
            cfg.max_attempts = max as usize;
        }
        if let Some(puzzle) = &self.puzzle {
            cfg.default_puzzle = Some(puzzle.clone());
        }
        cfg
    }

    fn theme_override(&self) -> Option<bool> {
        match (self.dark, self.light) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

fn load_catalog(cfg: &Config) -> Result<PuzzleCatalog, nextguest::error::CatalogError> {
    match &cfg.catalog_path {
        Some(path) => PuzzleCatalog::from_path(path),
        None => PuzzleCatalog::embedded(),
    }
}

fn build_engine(cfg: &Config, catalog: PuzzleCatalog) -> Result<SessionEngine, nextguest::GameError> {
    let engine = SessionEngine::new(catalog).with_max_attempts(cfg.max_attempts);
    match &cfg.default_puzzle {
        Some(id) => engine.with_puzzle(id),
        None => Ok(engine),
    }
}

fn init_logging() -> Option<WorkerGuard> {
    let dir = AppDirs::log_dir();
    std::fs::create_dir_all(&dir).ok()?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, "nextguest.log"));

    let default_level = "info";
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV)
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .ok()?;
    Some(guard)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let _log_guard = init_logging();

    let cfg = cli.apply_to(FileConfigStore::new().load());
    let catalog = match load_catalog(&cfg) {
        Ok(catalog) => catalog,
        Err(err) => Cli::command().error(ErrorKind::InvalidValue, err).exit(),
    };

    if cli.print_catalog {
        for puzzle in catalog.puzzles() {
            println!(
                "{}\t{} ({})\t{} clips",
                puzzle.id, puzzle.show, puzzle.date, puzzle.clip_count
            );
        }
        return Ok(());
    }

    let engine = match build_engine(&cfg, catalog) {
        Ok(engine) => engine,
        Err(err) => Cli::command().error(ErrorKind::InvalidValue, err).exit(),
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(
        engine,
        Box::new(FileKeyValueStore::new()),
        Box::new(ExternalPlayer::new(cfg.player.clone())),
        Box::new(Osc52Clipboard::stdout()),
        FileClipboard::with_path(AppDirs::last_result_path()),
    )
    .with_locator(ClipLocator::new(&cfg.clips_dir, &cfg.clip_format));
    if let Some(dark) = cli.theme_override() {
        app.set_theme(dark);
    }
    info!(puzzle = %app.engine.puzzle().id, puzzles = app.engine.catalog().len(), "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(TerminalEvents::new(), Duration::from_millis(TICK_RATE_MS));

    let size = terminal.size()?;
    app.screen_size = (size.width, size.height);

    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            GameEvent::Tick => app.on_tick(),
            GameEvent::Resize => {
                let size = terminal.size()?;
                app.screen_size = (size.width, size.height);
            }
            GameEvent::Key(key) => {
                if app.handle_key(key) == AppAction::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["nextguest"]);

        assert_eq!(cli.catalog, None);
        assert_eq!(cli.puzzle, None);
        assert_eq!(cli.max_attempts, None);
        assert!(!cli.dark);
        assert!(!cli.light);
        assert!(!cli.print_catalog);
        assert_eq!(cli.theme_override(), None);
    }

    #[test]
    fn test_cli_puzzle_and_catalog() {
        let cli = Cli::parse_from(["nextguest", "-p", "game2", "-c", "guests.json"]);
        assert_eq!(cli.puzzle.as_deref(), Some("game2"));
        assert_eq!(cli.catalog, Some(PathBuf::from("guests.json")));

        let cli = Cli::parse_from(["nextguest", "--puzzle", "game3"]);
        assert_eq!(cli.puzzle.as_deref(), Some("game3"));
    }

    #[test]
    fn test_cli_max_attempts_must_be_positive() {
        let cli = Cli::parse_from(["nextguest", "-m", "5"]);
        assert_eq!(cli.max_attempts, Some(5));

        assert!(Cli::try_parse_from(["nextguest", "-m", "0"]).is_err());
    }

    #[test]
    fn test_cli_theme_flags_conflict() {
        assert_eq!(
            Cli::parse_from(["nextguest", "--dark"]).theme_override(),
            Some(true)
        );
        assert_eq!(
            Cli::parse_from(["nextguest", "--light"]).theme_override(),
            Some(false)
        );
        assert!(Cli::try_parse_from(["nextguest", "--dark", "--light"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "nextguest",
            "--clips-dir",
            "/media/clips",
            "--clip-format",
            "webm",
            "--player",
            "mpv",
            "-m",
            "5",
            "-p",
            "game2",
        ]);

        let cfg = cli.apply_to(Config::default());

        assert_eq!(cfg.clips_dir, PathBuf::from("/media/clips"));
        assert_eq!(cfg.clip_format, "webm");
        assert_eq!(cfg.player.as_deref(), Some("mpv"));
        assert_eq!(cfg.max_attempts, 5);
        assert_eq!(cfg.default_puzzle.as_deref(), Some("game2"));
    }

    #[test]
    fn test_cli_keeps_config_when_flags_absent() {
        let file_cfg = Config {
            player: Some("vlc".into()),
            max_attempts: 3,
            ..Config::default()
        };

        let cfg = Cli::parse_from(["nextguest"]).apply_to(file_cfg.clone());

        assert_eq!(cfg, file_cfg);
    }

    #[test]
    fn test_build_engine_with_default_puzzle() {
        let cfg = Config {
            default_puzzle: Some("game2".into()),
            max_attempts: 5,
            ..Config::default()
        };

        let engine = build_engine(&cfg, PuzzleCatalog::embedded().unwrap()).unwrap();

        assert_eq!(engine.puzzle().id, "game2");
        assert_eq!(engine.state().max_attempts, 5);
    }

    #[test]
    fn test_build_engine_rejects_unknown_puzzle() {
        let cfg = Config {
            default_puzzle: Some("game404".into()),
            ..Config::default()
        };

        let err = build_engine(&cfg, PuzzleCatalog::embedded().unwrap()).unwrap_err();

        assert_eq!(
            err,
            nextguest::GameError::UnknownPuzzle {
                id: "game404".into()
            }
        );
    }

    #[test]
    fn test_load_catalog_defaults_to_embedded() {
        let catalog = load_catalog(&Config::default()).unwrap();

        assert!(catalog.contains("game1"));
    }

    #[test]
    fn test_ui_draws_through_terminal() {
        let engine = SessionEngine::new(PuzzleCatalog::embedded().unwrap());
        let app = App::headless(engine);

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| ui(&app, f)).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Start Game"));
    }
}
