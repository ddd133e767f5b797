use crate::tui::app::{AppState, InputAction, Scene};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Map one key press to an action. Returns true when the user asked to quit.
pub fn handle_key(app: &mut AppState, code: KeyCode) -> bool {
    if matches!(code, KeyCode::Char('?')) {
        let _ = app.handle_input(InputAction::ToggleHelp);
        return false;
    }
    if app.help_open() {
        if matches!(code, KeyCode::Esc) {
            let _ = app.handle_input(InputAction::ToggleHelp);
        }
        return false;
    }
    if app.question_open() {
        // Only listed option keys answer; `q` still quits unless it is one.
        if let KeyCode::Char(c) = code {
            if app.is_option_key(c) {
                let _ = app.handle_input(InputAction::Answer(c));
            } else if c.eq_ignore_ascii_case(&'q') {
                return true;
            }
        }
        return false;
    }

    match app.scene {
        Scene::Menu => match code {
            KeyCode::Up => {
                let _ = app.handle_input(InputAction::MenuPrev);
            }
            KeyCode::Down => {
                let _ = app.handle_input(InputAction::MenuNext);
            }
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => {
                let _ = app.handle_input(InputAction::MenuInc);
            }
            KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('_') => {
                let _ = app.handle_input(InputAction::MenuDec);
            }
            KeyCode::Enter => {
                let _ = app.handle_input(InputAction::MenuApply);
            }
            KeyCode::Esc => {
                let _ = app.handle_input(InputAction::MenuCancel);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            _ => {}
        },
        Scene::Play => match code {
            KeyCode::Char('m') | KeyCode::Char('M') | KeyCode::Esc => {
                let _ = app.handle_input(InputAction::ToggleMenu);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            KeyCode::Left => {
                let _ = app.handle_input(InputAction::CursorLeft);
            }
            KeyCode::Right => {
                let _ = app.handle_input(InputAction::CursorRight);
            }
            KeyCode::Up => {
                let _ = app.handle_input(InputAction::CursorUp);
            }
            KeyCode::Down => {
                let _ = app.handle_input(InputAction::CursorDown);
            }
            KeyCode::Enter => {
                let _ = app.handle_input(InputAction::Place);
            }
            KeyCode::Char(' ') => {
                let _ = app.handle_input(InputAction::Jump);
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                let _ = app.handle_input(InputAction::TogglePause);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let _ = app.handle_input(InputAction::Restart);
            }
            _ => {}
        },
    }
    false
}
