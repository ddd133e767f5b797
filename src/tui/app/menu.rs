use crate::engine::{Game, GameEngine};
use crate::questions::Difficulty;

use super::{AppState, Scene};

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Game,
    Subject,
    Difficulty,
}

const MENU_ITEMS: [MenuItem; 3] = [MenuItem::Game, MenuItem::Subject, MenuItem::Difficulty];

fn difficulty_label(difficulty: Option<Difficulty>) -> &'static str {
    match difficulty {
        None => "Any",
        Some(Difficulty::Easy) => "Easy",
        Some(Difficulty::Medium) => "Medium",
        Some(Difficulty::Hard) => "Hard",
    }
}

impl MenuItem {
    fn display(self, app: &AppState) -> String {
        match self {
            MenuItem::Game => format!("Game: {}", app.cfg_variant.label()),
            MenuItem::Subject => format!("Subject: {}", app.cfg_subject),
            MenuItem::Difficulty => format!("Difficulty: {}", difficulty_label(app.cfg_difficulty)),
        }
    }

    fn step(self, app: &mut AppState, forward: bool) {
        match self {
            MenuItem::Game => {
                app.cfg_variant =
                    if forward { app.cfg_variant.next() } else { app.cfg_variant.prev() };
            }
            MenuItem::Subject => {
                let subjects: Vec<String> = app.bank.subjects().map(str::to_string).collect();
                if subjects.is_empty() {
                    return;
                }
                let n = subjects.len();
                let next = match subjects.iter().position(|s| *s == app.cfg_subject) {
                    Some(i) if forward => (i + 1) % n,
                    Some(i) => (i + n - 1) % n,
                    None => 0,
                };
                app.cfg_subject = subjects[next].clone();
            }
            MenuItem::Difficulty => {
                const CYCLE: [Option<Difficulty>; 4] = [
                    None,
                    Some(Difficulty::Easy),
                    Some(Difficulty::Medium),
                    Some(Difficulty::Hard),
                ];
                let i = CYCLE.iter().position(|d| *d == app.cfg_difficulty).unwrap_or(0);
                let next = if forward {
                    (i + 1) % CYCLE.len()
                } else {
                    (i + CYCLE.len() - 1) % CYCLE.len()
                };
                app.cfg_difficulty = CYCLE[next];
            }
        }
    }
}

impl AppState {
    pub fn menu_items_display(&self) -> Vec<String> {
        MENU_ITEMS.iter().map(|item| item.display(self)).collect()
    }

    pub fn toggle_menu(&mut self) {
        self.close_help();
        self.scene = match self.scene {
            Scene::Menu => Scene::Play,
            _ => {
                self.open_menu();
                Scene::Menu
            }
        };
    }

    // --- Menu operations ---
    pub fn open_menu(&mut self) {
        self.close_help();
        self.menu_index = 0;
        self.cfg_variant = self.game.variant();
        self.cfg_subject = self.config.questions.subject.clone();
        self.cfg_difficulty = self.config.questions.difficulty;
        self.scene = Scene::Menu;
    }

    /// Start a new game with the edited selections.
    pub fn apply_menu(&mut self) {
        self.config.questions.subject = self.cfg_subject.clone();
        self.config.questions.difficulty = self.cfg_difficulty;
        self.game = Game::new(self.cfg_variant, &self.config);
        tracing::info!(variant = ?self.cfg_variant, subject = %self.cfg_subject, "new game");
        self.restart();
        self.scene = Scene::Play;
    }

    pub fn cancel_menu(&mut self) {
        self.scene = Scene::Play;
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }
    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }
    pub fn menu_inc(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.step(self, true);
    }
    pub fn menu_dec(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.step(self, false);
    }
}
