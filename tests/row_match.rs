use quiz_arcade::agents::OpponentPolicy;
use quiz_arcade::board::{Board, Cell, Pos};
use quiz_arcade::detector::Outcome;
use quiz_arcade::engine::{GameEngine, GameError, MoveError};
use quiz_arcade::gate::Verdict;
use quiz_arcade::progress::{Finish, ProgressReport};
use quiz_arcade::questions::{Question, QuestionParams, SourceError};
use quiz_arcade::variants::{BoardGame, Placement, RowMatch, RowMatchGame, TurnState, Variant};

/// Always answers with the first legal move.
struct FirstLegal;

impl OpponentPolicy for FirstLegal {
    fn select<M: Copy>(&mut self, _board: &Board, legal: &[M]) -> M {
        legal[0]
    }
}

fn question_b() -> Question {
    Question::try_new(
        "What is 5 + 3?",
        vec![
            ("A", "7".to_string()),
            ("B", "8".to_string()),
            ("C", "9".to_string()),
            ("D", "10".to_string()),
        ],
        "B",
    )
    .unwrap()
}

fn mk_game() -> RowMatchGame {
    RowMatchGame::seeded(QuestionParams::default(), 42)
}

fn play_gated<P: OpponentPolicy>(game: &mut BoardGame<RowMatch, P>, idx: usize) {
    let Placement::Gated(request) = game.play(idx).unwrap() else {
        panic!("move {idx} was not gated");
    };
    game.deliver_question(&request, Ok(question_b())).unwrap();
}

#[test]
fn correct_answer_lets_opponent_reply() {
    let mut game = mk_game();
    play_gated(&mut game, 0);
    assert_eq!(game.state(), TurnState::AwaitingQuestion);
    assert_eq!(game.question(), Some(&question_b()));

    assert_eq!(game.answer("B"), Ok(Verdict::Correct));

    assert_eq!(game.board().occupied(), 2);
    assert_eq!(game.board().get(Pos::new(0, 0)), Some(Cell::Player));
    assert_eq!(game.state(), TurnState::PlayerTurn);
    assert!(game.question().is_none());
    assert!(game.last_opponent_move().is_some());
}

#[test]
fn wrong_answer_rolls_back_and_retries_same_question() {
    let mut game = mk_game();
    play_gated(&mut game, 0);
    let shown = game.question().cloned();

    assert_eq!(game.answer("A"), Ok(Verdict::Incorrect));

    assert_eq!(game.board().get(Pos::new(0, 0)), Some(Cell::Empty));
    assert_eq!(game.board().occupied(), 0);
    assert_eq!(game.state(), TurnState::AwaitingRetry);
    assert_eq!(game.question().cloned(), shown);
    assert!(game.legal_moves().contains(&0));
    assert!(game.pending_request().is_none());

    assert_eq!(game.answer("C"), Ok(Verdict::Incorrect));
    assert_eq!(game.question().cloned(), shown);
    assert_eq!(game.gate().attempts(), 2);

    assert_eq!(game.answer("B"), Ok(Verdict::Correct));
    assert_eq!(game.board().get(Pos::new(0, 0)), Some(Cell::Player));
    assert_eq!(game.board().occupied(), 2);
    assert_eq!(game.state(), TurnState::PlayerTurn);
}

#[test]
fn answers_are_exact_match() {
    let mut game = mk_game();
    play_gated(&mut game, 4);
    assert_eq!(game.answer("b"), Ok(Verdict::Incorrect));
    assert_eq!(game.answer(" B"), Ok(Verdict::Incorrect));
    assert_eq!(game.answer("B"), Ok(Verdict::Correct));
}

#[test]
fn moves_are_rejected_while_a_question_is_pending() {
    let mut game = mk_game();
    let Placement::Gated(request) = game.play(0).unwrap() else { panic!("not gated") };

    // Still loading.
    assert_eq!(game.play(1), Err(GameError::InvalidMove(MoveError::NotPlayerTurn)));
    assert_eq!(game.answer("B"), Err(GameError::PrecedenceViolation));
    assert_eq!(game.state(), TurnState::AwaitingQuestion);

    game.deliver_question(&request, Ok(question_b())).unwrap();
    assert_eq!(game.play(1), Err(GameError::InvalidMove(MoveError::NotPlayerTurn)));
    game.answer("A").unwrap();
    assert_eq!(game.play(0), Err(GameError::InvalidMove(MoveError::NotPlayerTurn)));
}

#[test]
fn illegal_placements_change_nothing() {
    let mut game = mk_game();
    play_gated(&mut game, 0);
    game.answer("B").unwrap();
    let before = game.board().clone();

    assert_eq!(game.play(0), Err(GameError::InvalidMove(MoveError::Occupied)));
    assert_eq!(game.play(9), Err(GameError::InvalidMove(MoveError::OutOfBounds)));
    assert_eq!(game.board(), &before);
    assert_eq!(game.state(), TurnState::PlayerTurn);
}

#[test]
fn unavailable_question_reverts_the_move() {
    let mut game = mk_game();
    let Placement::Gated(request) = game.play(2).unwrap() else { panic!("not gated") };

    let err = game
        .deliver_question(&request, Err(SourceError::Unavailable("offline".into())))
        .unwrap_err();
    assert!(matches!(err, GameError::QuestionUnavailable(_)));
    assert_eq!(game.board().get(RowMatch::pos_of(2)), Some(Cell::Empty));
    assert_eq!(game.state(), TurnState::PlayerTurn);

    // The player may simply try again.
    play_gated(&mut game, 2);
    assert_eq!(game.answer("B"), Ok(Verdict::Correct));
}

#[test]
fn malformed_question_counts_as_unavailable() {
    let mut game = mk_game();
    let Placement::Gated(request) = game.play(1).unwrap() else { panic!("not gated") };
    let fetched =
        Question::from_json(r#"{"question":"Q","options":{"A":"1"},"correctAnswer":"A"}"#);
    assert!(matches!(
        game.deliver_question(&request, fetched),
        Err(GameError::QuestionUnavailable(_))
    ));
    assert_eq!(game.board().occupied(), 0);
}

#[test]
fn response_after_restart_is_stale() {
    let mut game = mk_game();
    let Placement::Gated(request) = game.play(0).unwrap() else { panic!("not gated") };
    game.restart();

    assert_eq!(game.deliver_question(&request, Ok(question_b())), Err(GameError::StaleResponse));
    assert!(game.question().is_none());
    assert_eq!(game.board().occupied(), 0);
    assert_eq!(game.state(), TurnState::PlayerTurn);
}

#[test]
fn winning_move_ends_before_any_question() {
    let mut game = BoardGame::<RowMatch, _>::new(QuestionParams::default(), FirstLegal);
    play_gated(&mut game, 3);
    game.answer("B").unwrap(); // opponent takes 0
    play_gated(&mut game, 4);
    game.answer("B").unwrap(); // opponent takes 1

    assert_eq!(game.play(5), Ok(Placement::Finished(Outcome::PlayerWin)));
    assert_eq!(game.state(), TurnState::Terminal);
    assert!(game.is_terminal());
    assert!(game.pending_request().is_none());
    assert!(game.question().is_none());
    let line = game.winning_line().unwrap();
    assert!(line.contains(Pos::new(1, 0)) && line.contains(Pos::new(1, 2)));

    assert_eq!(game.play(6), Err(GameError::InvalidMove(MoveError::NotPlayerTurn)));

    let reports = game.take_reports();
    assert_eq!(reports.len(), 3);
    assert_eq!(
        reports[2],
        ProgressReport::finished(Variant::RowMatch, Finish::Board(Outcome::PlayerWin))
    );
    assert!(game.take_reports().is_empty());
}

#[test]
fn opponent_can_win() {
    // Opponent fills 0, 1, 2 while the player plays 3, 4, 6.
    let mut game = BoardGame::<RowMatch, _>::new(QuestionParams::default(), FirstLegal);
    for idx in [3, 4, 6] {
        play_gated(&mut game, idx);
        game.answer("B").unwrap();
    }
    assert_eq!(game.outcome(), Outcome::OpponentWin);
    assert_eq!(game.state(), TurnState::Terminal);
}

#[test]
fn restart_resets_board_and_turn() {
    let mut game = mk_game();
    play_gated(&mut game, 0);
    game.answer("B").unwrap();
    game.restart();
    assert_eq!(game.board().occupied(), 0);
    assert_eq!(game.state(), TurnState::PlayerTurn);
    assert_eq!(game.legal_moves().len(), 9);
}
