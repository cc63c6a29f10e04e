//! End-to-end games on hand-built boards.

use forest_core::{Action, Coord, Direction, Faction, ViolationKind};
use forest_engine::{
    Board, Game, GameConfig, GameResult, Phase, Player, RuleContext, RuleSet, RulesValidator,
};

fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y)
}

fn humans_first() -> Vec<Player> {
    vec![
        Player::human("alice", Faction::Humans),
        Player::automated("bot", Faction::Animals),
    ]
}

fn animals_first() -> Vec<Player> {
    vec![
        Player::automated("bot", Faction::Animals),
        Player::human("alice", Faction::Humans),
    ]
}

fn game(players: Vec<Player>, rows: [&str; 7], escape_rounds: u32) -> Game {
    let board = Board::from_layout(&rows.join("/")).unwrap();
    let config = GameConfig {
        escape_rounds,
        ..GameConfig::default()
    };
    Game::from_board(players, board, config).unwrap()
}

#[test]
fn reveal_flips_only_the_target() {
    let mut game = Game::with_seed(humans_first(), GameConfig::default(), 2024).unwrap();
    let board = game.board();
    assert_eq!(board.size(), 7);
    assert_eq!(board.live_count(), 48);
    assert!(board.get(c(3, 3)).is_none());
    board.verify(48).unwrap();

    let before = game.board().to_layout();
    game.apply("alice", Action::Flip { target: c(0, 0) }).unwrap();
    let after = game.board().to_layout();

    assert_eq!(game.board().hidden_count(), 47);
    assert!(game.board().get(c(0, 0)).unwrap().is_revealed());
    let changed: Vec<usize> = before
        .chars()
        .zip(after.chars())
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(changed, vec![0]);
}

#[test]
fn one_step_piece_cannot_jump() {
    let mut game = game(
        animals_first(),
        [
            ".......",
            ".......",
            "..B....",
            ".......",
            ".......",
            ".......",
            "......t",
        ],
        5,
    );
    let err = game
        .apply("bot", Action::Move { from: c(2, 2), to: c(2, 4) })
        .unwrap_err();
    assert_eq!(err.kind, ViolationKind::IllegalMovementPattern);
    assert_eq!(game.turn(), 0);
    assert!(game.apply("bot", Action::Move { from: c(2, 2), to: c(2, 3) }).is_ok());
}

#[test]
fn line_piece_is_blocked() {
    let mut game = game(
        animals_first(),
        [
            ".......",
            ".......",
            ".......",
            "F......",
            ".......",
            "t......",
            ".......",
        ],
        5,
    );
    let blocked = Action::Move { from: c(0, 3), to: c(0, 6) };
    let err = game.apply("bot", blocked).unwrap_err();
    assert_eq!(err.kind, ViolationKind::PathBlocked);

    let before = game.board().clone();
    assert_eq!(game.apply("bot", blocked).unwrap_err(), err);
    assert_eq!(game.board(), &before);
}

#[test]
fn neutral_tile_rests_for_one_turn() {
    let mut game = game(
        humans_first(),
        [
            "D.....t",
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
            "......b",
        ],
        5,
    );

    // Turn 0: the humans move the duck.
    game.apply("alice", Action::Move { from: c(0, 0), to: c(0, 2) }).unwrap();

    // Turn 1: the animals may not touch it.
    let take_duck = Action::Move { from: c(0, 2), to: c(5, 2) };
    let err = game.apply("bot", take_duck).unwrap_err();
    assert_eq!(err.kind, ViolationKind::RepetitionRestricted);
    assert!(!game.legal_actions().contains(&take_duck));

    // From turn 2 on the restriction is lifted.
    let ctx = RuleContext::new(game.board(), game.phase(), game.turn() + 1);
    assert!(RulesValidator.is_legal(&ctx, Faction::Animals, &take_duck));

    game.apply("bot", Action::Flip { target: c(6, 6) }).unwrap();
    game.apply("alice", Action::Flip { target: c(6, 0) }).unwrap();
    assert_eq!(game.phase(), Phase::Escape);
    assert_eq!(game.apply("bot", take_duck), Ok(0));
    assert_eq!(game.board().get(c(5, 2)).unwrap().last_moved_by(), Some(Faction::Animals));
}

#[test]
fn highest_score_wins_when_rounds_run_out() {
    let mut game = game(
        humans_first(),
        [
            "F......",
            ".......",
            ".......",
            "B......",
            ".......",
            ".......",
            "N.....L",
        ],
        2,
    );
    assert_eq!(game.phase(), Phase::Escape);
    assert_eq!(game.rounds_remaining(), Some(2));

    assert_eq!(
        game.apply("alice", Action::Shoot { from: c(0, 6), direction: Direction::North }),
        Ok(10)
    );
    game.apply("bot", Action::Move { from: c(0, 0), to: c(5, 0) }).unwrap();
    assert_eq!(game.rounds_remaining(), Some(1));
    assert_eq!(game.phase(), Phase::Escape);

    game.apply("alice", Action::Move { from: c(6, 6), to: c(6, 5) }).unwrap();
    game.apply("bot", Action::Move { from: c(5, 0), to: c(5, 1) }).unwrap();

    assert_eq!(game.rounds_remaining(), Some(0));
    assert_eq!(game.phase(), Phase::Finished);
    assert_eq!(game.result(), Some(&GameResult::Winner("alice".to_string())));
    assert_eq!(game.winner().map(|p| p.score()), Some(10));

    let snap = game.snapshot();
    assert!(snap.is_game_over);
    assert_eq!(snap.winner.as_deref(), Some("alice"));
}

#[test]
fn pieces_leave_through_exit_points() {
    let mut game = game(
        animals_first(),
        [
            ".......",
            ".......",
            ".......",
            ".F.....",
            ".......",
            ".......",
            "T......",
        ],
        5,
    );
    let out = Action::Move { from: c(1, 3), to: c(-1, 3) };
    assert_eq!(game.apply("bot", out), Ok(5));
    assert_eq!(game.board().escaped_count(), 1);
    assert_eq!(game.board().live_count(), 1);
    game.board().verify(2).unwrap();
}

#[test]
fn lumberjack_clears_and_scores() {
    let mut game = game(
        humans_first(),
        [
            ".T.....",
            "TLT....",
            ".T.....",
            ".......",
            ".......",
            ".......",
            "......b",
        ],
        5,
    );
    assert_eq!(game.apply("alice", Action::Clear { from: c(1, 1) }), Ok(8));
    assert_eq!(game.board().captured_count(), 4);
    assert_eq!(game.player("alice").map(|p| p.score()), Some(8));
}
