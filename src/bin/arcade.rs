use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use quiz_arcade::config::ArcadeConfig;
use quiz_arcade::tui::{app::AppState, controller};
use ratatui::prelude::*;
use std::fs::File;
use std::io::{self, IsTerminal, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "arcade.toml";

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// The TUI owns the terminal, so logs go to the file named by `ARCADE_LOG`.
fn init_logging() -> io::Result<()> {
    let Some(path) = std::env::var_os("ARCADE_LOG") else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn config_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("ARCADE_CONFIG"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
}

fn main() -> io::Result<()> {
    init_logging()?;
    let config = ArcadeConfig::load_or_default(&config_path()).map_err(io::Error::other)?;
    let mut app = AppState::new(config).map_err(io::Error::other)?;

    if !io::stdout().is_terminal() {
        println!(
            "quiz-arcade TUI requires a real terminal (TTY).\nRun in Terminal and press q to quit. Version: {}",
            quiz_arcade::VERSION
        );
        return Ok(());
    }
    let tick_rate = Duration::from_millis(app.config.tui.tick_rate_ms);
    let mut terminal = setup_terminal()?;

    let res = controller::run(&mut terminal, &mut app, tick_rate);

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    res
}
