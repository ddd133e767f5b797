use crossterm::event::KeyCode;
use quiz_arcade::engine::{Game, GameEngine};
use quiz_arcade::tui::app::{AppState, InputAction, Scene};
use quiz_arcade::tui::controller::handle_key;
use quiz_arcade::variants::{RunState, TurnState, Variant};

fn setup_play_app() -> AppState {
    let mut app = AppState::default();
    app.apply_menu();
    app
}

fn correct_key(app: &AppState) -> char {
    let key = app.game.question().map(|q| q.correct_key().to_string()).unwrap();
    key.chars().next().unwrap()
}

fn wrong_key(app: &AppState) -> char {
    let q = app.game.question().unwrap();
    let key = q.options().iter().find(|o| o.key != q.correct_key()).map(|o| o.key.clone()).unwrap();
    key.chars().next().unwrap()
}

#[test]
fn menu_navigation_and_apply() {
    let mut app = AppState::default();
    assert!(matches!(app.scene, Scene::Menu));
    let start = app.menu_index;
    let _ = app.handle_input(InputAction::MenuNext);
    assert_ne!(app.menu_index, start);
    let _ = app.handle_input(InputAction::MenuPrev);
    assert_eq!(app.menu_index, start);
    let _ = app.handle_input(InputAction::MenuApply);
    assert!(matches!(app.scene, Scene::Play));
    assert_eq!(app.game.variant(), Variant::RowMatch);
}

#[test]
fn menu_switches_game_and_subject() {
    let mut app = AppState::default();
    let _ = app.handle_input(InputAction::MenuInc);
    let _ = app.handle_input(InputAction::MenuInc);
    assert_eq!(app.cfg_variant, Variant::Runner);
    let _ = app.handle_input(InputAction::MenuNext);
    let _ = app.handle_input(InputAction::MenuInc);
    assert_eq!(app.cfg_subject, "Science");
    let _ = app.handle_input(InputAction::MenuApply);
    assert_eq!(app.game.variant(), Variant::Runner);
    assert_eq!(app.config.questions.subject, "Science");
}

#[test]
fn place_opens_question_and_answer_records_progress() {
    let mut app = setup_play_app();
    assert!(app.handle_input(InputAction::Place));
    assert!(app.question_open());

    // Board input is ignored while the question is up.
    assert!(!app.handle_input(InputAction::CursorRight));
    assert!(!app.handle_input(InputAction::Place));

    let wrong = wrong_key(&app);
    assert!(app.handle_input(InputAction::Answer(wrong)));
    assert!(app.question_open());
    assert_eq!(app.current_progress().questions_answered, 1);

    let right = correct_key(&app);
    assert!(app.handle_input(InputAction::Answer(right)));
    assert!(!app.question_open());
    let p = app.current_progress();
    assert_eq!(p.questions_answered, 2);
    assert_eq!(p.correct_answers, 1);
    let Game::RowMatch(g) = &app.game else { panic!("expected row match") };
    assert_eq!(g.board().occupied(), 2);
    assert_eq!(g.state(), TurnState::PlayerTurn);
}

#[test]
fn cursor_wraps_on_the_grid() {
    let mut app = setup_play_app();
    let _ = app.handle_input(InputAction::CursorLeft);
    assert_eq!(app.cursor, 2);
    let _ = app.handle_input(InputAction::CursorUp);
    assert_eq!(app.cursor, 8);
    let _ = app.handle_input(InputAction::CursorDown);
    assert_eq!(app.cursor, 2);
}

#[test]
fn runner_ticks_only_while_playing() {
    let mut app = AppState::default();
    let _ = app.handle_input(InputAction::MenuDec);
    assert_eq!(app.cfg_variant, Variant::Runner);
    app.apply_menu();

    app.on_tick();
    let Game::Runner(g) = &app.game else { panic!("expected runner") };
    assert_eq!(g.state(), RunState::Start);

    assert!(app.handle_input(InputAction::Jump));
    app.on_tick();
    app.on_tick();
    let Game::Runner(g) = &app.game else { panic!("expected runner") };
    assert_eq!(g.score(), 2);

    assert!(app.handle_input(InputAction::TogglePause));
    app.on_tick();
    let Game::Runner(g) = &app.game else { panic!("expected runner") };
    assert_eq!(g.state(), RunState::Paused);
    assert_eq!(g.score(), 2);
}

#[test]
fn keys_map_to_actions() {
    let mut app = AppState::default();
    assert!(!handle_key(&mut app, KeyCode::Down));
    assert_eq!(app.menu_index, 1);
    assert!(!handle_key(&mut app, KeyCode::Enter));
    assert!(matches!(app.scene, Scene::Play));
    assert!(!handle_key(&mut app, KeyCode::Char('?')));
    assert!(app.help_open());
    assert!(!handle_key(&mut app, KeyCode::Esc));
    assert!(!app.help_open());
    assert!(handle_key(&mut app, KeyCode::Char('q')));
}

#[test]
fn stray_letters_do_not_answer_an_open_question() {
    let mut app = setup_play_app();
    assert!(app.handle_input(InputAction::Place));
    assert!(app.question_open());

    for c in ['x', 'r', 'm', 'z'] {
        assert!(!app.is_option_key(c));
        assert!(!handle_key(&mut app, KeyCode::Char(c)));
    }
    assert!(matches!(app.scene, Scene::Play));
    assert!(app.question_open());
    assert_eq!(app.current_progress().questions_answered, 0);
    let Game::RowMatch(g) = &app.game else { panic!("expected row match") };
    assert_eq!(g.state(), TurnState::AwaitingQuestion);
    assert_eq!(g.board().occupied(), 1);

    assert!(!app.handle_input(InputAction::Answer('x')));
    assert_eq!(app.current_progress().questions_answered, 0);

    let right = correct_key(&app).to_ascii_lowercase();
    assert!(!handle_key(&mut app, KeyCode::Char(right)));
    assert!(!app.question_open());
    assert_eq!(app.current_progress().correct_answers, 1);
}

#[test]
fn quit_works_while_a_runner_question_is_open() {
    let mut app = AppState::default();
    let _ = app.handle_input(InputAction::MenuDec);
    app.apply_menu();
    assert!(app.handle_input(InputAction::Jump));

    for _ in 0..10_000 {
        if app.question_open() {
            break;
        }
        app.on_tick();
    }
    assert!(app.question_open());

    assert!(handle_key(&mut app, KeyCode::Char('q')));
    let Game::Runner(g) = &app.game else { panic!("expected runner") };
    assert_eq!(g.state(), RunState::AwaitingQuestion);
    assert_eq!(app.current_progress().questions_answered, 0);
}
