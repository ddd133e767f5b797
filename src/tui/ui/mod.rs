mod board;
mod layout;
mod menu;
mod question;
mod runner;
mod status;

use crate::engine::Game;
use crate::tui::app::{AppState, Scene};
use ratatui::prelude::Frame;

pub fn draw(f: &mut Frame, app: &AppState) {
    match app.scene {
        Scene::Menu => menu::draw_menu(f, app),
        Scene::Play => {
            let (main, status_area) = layout::split_status(f.area());
            match &app.game {
                Game::RowMatch(g) => board::draw_board(f, main, g.board(), g.winning_line(), app),
                Game::ColumnDrop(g) => board::draw_board(f, main, g.board(), g.winning_line(), app),
                Game::Runner(g) => runner::draw_runner(f, main, g),
            }
            status::draw_status(f, status_area, app);
            if app.question_open() {
                question::draw_question(f, app);
            }
            if app.help_open() {
                status::draw_help(f);
            }
        }
    }
}
