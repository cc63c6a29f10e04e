//! Turn sequencing and the phase state machine.
//!
//! The [`Game`] struct owns the board and the players. It is the only place
//! board mutators are called from, and only after the active
//! [`RuleSet`] has approved the action:
//! - Turn order is strictly round-robin over the players
//! - Phases advance `Reveal -> Escape -> Finished`, never backwards
//! - Every applied action is recorded in the history

use crate::board::{Board, BoardError};
use crate::config::{ConfigError, GameConfig};
use crate::rules::{GameResult, Phase, RuleContext, RuleSet, RulesValidator};
use crate::snapshot::Snapshot;
use forest_core::{Action, ActionRequest, Faction, RuleViolation};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who is behind a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    Human,
    /// Moves are chosen by a program outside this crate.
    Automated,
}

/// A seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    faction: Faction,
    kind: PlayerKind,
    score: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, faction: Faction, kind: PlayerKind) -> Self {
        Player {
            name: name.into(),
            faction,
            kind,
            score: 0,
        }
    }

    pub fn human(name: impl Into<String>, faction: Faction) -> Self {
        Self::new(name, faction, PlayerKind::Human)
    }

    pub fn automated(name: impl Into<String>, faction: Faction) -> Self {
        Self::new(name, faction, PlayerKind::Automated)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn faction(&self) -> Faction {
        self.faction
    }

    #[inline]
    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }
}

/// A recorded action in game history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Turn index the action was played on.
    pub turn: u32,
    pub player: String,
    pub action: Action,
    /// Points the action scored.
    pub points: u32,
    /// Phase the action was played in.
    pub phase: Phase,
}

/// Errors that prevent a game from being created.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid players: {0}")]
    InvalidPlayers(String),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A complete game.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    players: Vec<Player>,
    /// Index into `players` of whoever acts next.
    current: usize,
    /// Number of actions applied so far.
    turn: u32,
    phase: Phase,
    /// Set when the escape phase starts.
    rounds_remaining: Option<u32>,
    /// Actions applied since the escape phase started.
    escape_actions: u32,
    result: Option<GameResult>,
    history: Vec<TurnRecord>,
    config: GameConfig,
    rules: RulesValidator,
    seed: Option<u64>,
}

impl Game {
    /// Creates a game with a freshly shuffled board.
    pub fn new(players: Vec<Player>, config: GameConfig) -> Result<Self, GameError> {
        Self::with_seed(players, config, rand::random())
    }

    /// Creates a game whose board shuffle is determined by `seed`.
    pub fn with_seed(players: Vec<Player>, config: GameConfig, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        validate_players(&players)?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let board = Board::shuffled(config.board_size, config.tiles.kinds()?, &mut rng)?;
        board.verify(config.cell_count()?)?;

        let mut game = Self::assemble(players, board, config);
        game.seed = Some(seed);
        tracing::info!(seed, players = game.players.len(), "game created");
        Ok(game)
    }

    /// Creates a game from a prepared board, e.g. one built with
    /// [`Board::from_layout`].
    ///
    /// The board may hold any number of tiles. If every tile is already face
    /// up the game starts in the escape phase.
    pub fn from_board(players: Vec<Player>, board: Board, config: GameConfig) -> Result<Self, GameError> {
        validate_players(&players)?;
        board.verify(board.total_tiles())?;

        let mut game = Self::assemble(players, board, config);
        game.check_phase_transition(Phase::Reveal);
        Ok(game)
    }

    fn assemble(players: Vec<Player>, board: Board, config: GameConfig) -> Self {
        Game {
            board,
            players,
            current: 0,
            turn: 0,
            phase: Phase::Reveal,
            rounds_remaining: None,
            escape_actions: 0,
            result: None,
            history: Vec::new(),
            config,
            rules: RulesValidator,
            seed: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Looks up a player by name.
    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of actions applied so far.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Rounds left in the escape phase; `None` before it starts.
    pub fn rounds_remaining(&self) -> Option<u32> {
        self.rounds_remaining
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    /// The winning player, if the game ended with a single winner.
    pub fn winner(&self) -> Option<&Player> {
        match &self.result {
            Some(GameResult::Winner(name)) => self.player(name),
            _ => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The shuffle seed, for games created with a random board.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn context(&self) -> RuleContext<'_> {
        RuleContext::new(&self.board, self.phase, self.turn)
    }

    /// Every action the current player may take.
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.is_game_over() {
            return Vec::new();
        }
        self.rules
            .legal_actions(&self.context(), self.current_player().faction)
    }

    /// Captures the public state of the game.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Applies a loosely typed action request.
    pub fn apply_request(&mut self, player: &str, request: ActionRequest) -> Result<u32, RuleViolation> {
        let action = Action::try_from(request)?;
        self.apply(player, action)
    }

    /// Applies `action` for `player`, returning the points it scored.
    ///
    /// A rejected action leaves the game untouched.
    pub fn apply(&mut self, player: &str, action: Action) -> Result<u32, RuleViolation> {
        if let Err(violation) = self.check_turn(player, &action) {
            tracing::debug!(player, %action, kind = %violation.kind, reason = %violation.reason, "action rejected");
            return Err(violation);
        }

        let faction = self.players[self.current].faction;
        let points = self.dispatch(faction, action)?;
        let acted_in = self.phase;

        let actor = &mut self.players[self.current];
        actor.score += points;
        tracing::debug!(player, %action, points, score = actor.score, turn = self.turn, "action applied");

        self.history.push(TurnRecord {
            turn: self.turn,
            player: player.to_string(),
            action,
            points,
            phase: acted_in,
        });
        self.current = (self.current + 1) % self.players.len();
        self.turn += 1;
        self.check_phase_transition(acted_in);
        Ok(points)
    }

    fn check_turn(&self, player: &str, action: &Action) -> Result<(), RuleViolation> {
        if self.is_game_over() {
            return Err(RuleViolation::wrong_phase("The game is over"));
        }
        let index = self
            .players
            .iter()
            .position(|p| p.name == player)
            .ok_or_else(|| RuleViolation::not_owner(format!("Player '{}' is not in this game", player)))?;
        if index != self.current {
            return Err(RuleViolation::not_owner(format!(
                "Not your turn. Current player: {}",
                self.current_player().name
            )));
        }
        self.rules
            .validate(&self.context(), self.players[index].faction, action)
    }

    fn dispatch(&mut self, faction: Faction, action: Action) -> Result<u32, RuleViolation> {
        let turn = self.turn;
        let board = &mut self.board;
        let outcome = match action {
            Action::Flip { target } => board.reveal(target, faction, turn).map(|_| 0),
            Action::Move { from, to } if board.exit_at_point(to).is_some() => {
                board.exit_via(from, to, faction, turn).map(|(points, _)| points)
            }
            Action::Move { from, to } => {
                board.relocate(from, to, faction, turn).map(|(points, _)| points)
            }
            Action::Shoot { from, direction } => {
                board.ranged_capture(from, direction).map(|(points, _)| points)
            }
            Action::Clear { from } => board.adjacent_removal(from).map(|(points, _)| points),
            Action::Escape { from } => {
                board.evaluate_exit(from, faction, turn).map(|(points, _)| points)
            }
            Action::Pass => Ok(0),
        };
        outcome.map_err(|err| {
            tracing::error!(turn, %action, error = %err, "board refused a validated action");
            RuleViolation::from(err)
        })
    }

    fn check_phase_transition(&mut self, acted_in: Phase) {
        match self.phase {
            Phase::Reveal => {
                if self.board.all_revealed() {
                    self.enter_escape();
                }
            }
            Phase::Escape if acted_in == Phase::Escape => {
                self.escape_actions += 1;
                if self.escape_actions % self.players.len() as u32 == 0 {
                    let remaining = self.rounds_remaining.unwrap_or(0).saturating_sub(1);
                    self.rounds_remaining = Some(remaining);
                    tracing::info!(remaining, "escape round complete");
                    if remaining == 0 {
                        self.finish();
                    }
                }
            }
            Phase::Escape | Phase::Finished => {}
        }
    }

    fn enter_escape(&mut self) {
        self.phase = Phase::Escape;
        self.rounds_remaining = Some(self.config.escape_rounds);
        self.escape_actions = 0;
        tracing::info!(turn = self.turn, rounds = self.config.escape_rounds, "all tiles revealed, escape phase begins");
        if self.config.escape_rounds == 0 {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.phase = Phase::Finished;
        let best = self.players.iter().map(|p| p.score).max().unwrap_or(0);
        let mut leaders = self.players.iter().filter(|p| p.score == best);
        let result = match (leaders.next(), leaders.next()) {
            (Some(winner), None) => GameResult::Winner(winner.name.clone()),
            _ => GameResult::Draw,
        };
        tracing::info!(?result, score = best, turn = self.turn, "game over");
        self.result = Some(result);
    }
}

fn validate_players(players: &[Player]) -> Result<(), GameError> {
    if players.len() < 2 {
        return Err(GameError::InvalidPlayers(format!(
            "need at least two players, got {}",
            players.len()
        )));
    }
    for (i, player) in players.iter().enumerate() {
        if player.name.trim().is_empty() {
            return Err(GameError::InvalidPlayers("player names cannot be empty".into()));
        }
        if !player.faction.is_playable() {
            return Err(GameError::InvalidPlayers(format!(
                "{} cannot play as {}",
                player.name, player.faction
            )));
        }
        if players[..i].iter().any(|p| p.name == player.name) {
            return Err(GameError::InvalidPlayers(format!(
                "duplicate player name '{}'",
                player.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use forest_core::{Coord, Direction, ViolationKind};

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn players() -> Vec<Player> {
        vec![
            Player::human("alice", Faction::Humans),
            Player::automated("bot", Faction::Animals),
        ]
    }

    fn from_layout(layout: &str, escape_rounds: u32) -> Game {
        let config = GameConfig {
            escape_rounds,
            ..GameConfig::default()
        };
        Game::from_board(players(), Board::from_layout(layout).unwrap(), config).unwrap()
    }

    #[test]
    fn new_game() {
        let game = Game::with_seed(players(), GameConfig::default(), 42).unwrap();
        assert_eq!(game.phase(), Phase::Reveal);
        assert_eq!(game.current_player().name(), "alice");
        assert_eq!(game.board().live_count(), 48);
        assert_eq!(game.board().hidden_count(), 48);
        assert_eq!(game.rounds_remaining(), None);
        assert_eq!(game.seed(), Some(42));
        assert_eq!(game.legal_actions().len(), 48);
    }

    #[test]
    fn same_seed_same_board() {
        let a = Game::with_seed(players(), GameConfig::default(), 9).unwrap();
        let b = Game::with_seed(players(), GameConfig::default(), 9).unwrap();
        assert_eq!(a.board().to_layout(), b.board().to_layout());
    }

    #[test]
    fn invalid_players() {
        let one = vec![Player::human("alice", Faction::Humans)];
        assert!(matches!(
            Game::new(one, GameConfig::default()),
            Err(GameError::InvalidPlayers(_))
        ));
        let dup = vec![
            Player::human("alice", Faction::Humans),
            Player::human("alice", Faction::Animals),
        ];
        assert!(matches!(
            Game::new(dup, GameConfig::default()),
            Err(GameError::InvalidPlayers(_))
        ));
        let neutral = vec![
            Player::human("alice", Faction::Humans),
            Player::human("nobody", Faction::Neutral),
        ];
        assert!(matches!(
            Game::new(neutral, GameConfig::default()),
            Err(GameError::InvalidPlayers(_))
        ));
    }

    #[test]
    fn invalid_config() {
        let config = GameConfig {
            board_size: 5,
            ..GameConfig::default()
        };
        assert!(matches!(
            Game::new(players(), config),
            Err(GameError::Config(ConfigError::TileCount { .. }))
        ));
    }

    #[test]
    fn flip_advances_turn() {
        let mut game = Game::with_seed(players(), GameConfig::default(), 1).unwrap();
        assert_eq!(game.apply("alice", Action::Flip { target: c(0, 0) }), Ok(0));
        assert_eq!(game.current_player().name(), "bot");
        assert_eq!(game.turn(), 1);
        assert_eq!(game.history().len(), 1);
        assert!(game.board().get(c(0, 0)).unwrap().is_revealed());
    }

    #[test]
    fn not_your_turn() {
        let mut game = Game::with_seed(players(), GameConfig::default(), 1).unwrap();
        let err = game.apply("bot", Action::Flip { target: c(0, 0) }).unwrap_err();
        assert_eq!(err.kind, ViolationKind::NotOwner);
        assert_eq!(err.reason, "Not your turn. Current player: alice");
        let err = game.apply("mallory", Action::Flip { target: c(0, 0) }).unwrap_err();
        assert_eq!(err.kind, ViolationKind::NotOwner);
        assert_eq!(game.turn(), 0);
    }

    #[test]
    fn rejected_action_changes_nothing() {
        let mut game = from_layout("F..../...../D..../...../b....", 5);
        game.apply("alice", Action::Flip { target: c(0, 4) }).unwrap();
        let before = game.board().clone();
        let blocked = Action::Move { from: c(0, 0), to: c(0, 3) };
        let first = game.apply("bot", blocked).unwrap_err();
        let second = game.apply("bot", blocked).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(first.kind, ViolationKind::PathBlocked);
        assert_eq!(game.board(), &before);
        assert_eq!(game.current_player().name(), "bot");
    }

    #[test]
    fn capture_scores_points() {
        let mut game = from_layout("F...D/...../...../...../....t", 5);
        game.apply("alice", Action::Flip { target: c(4, 4) }).unwrap();
        let points = game
            .apply("bot", Action::Move { from: c(0, 0), to: c(4, 0) })
            .unwrap();
        assert_eq!(points, 2);
        assert_eq!(game.player("bot").unwrap().score(), 2);
        assert_eq!(game.board().captured_count(), 1);
    }

    #[test]
    fn shooting_scores_points() {
        let mut game = from_layout("..F../...../...../...../..N.d", 5);
        let points = game
            .apply("alice", Action::Shoot { from: c(2, 4), direction: Direction::North })
            .unwrap();
        assert_eq!(points, 5);
        assert_eq!(game.player("alice").unwrap().score(), 5);
    }

    #[test]
    fn missed_shot_scores_nothing_and_passes_the_turn() {
        let mut game = from_layout("...../...../...../...../..N.b", 5);
        let before = game.board().to_layout();
        let shot = Action::Shoot { from: c(2, 4), direction: Direction::North };
        assert!(game.legal_actions().contains(&shot));
        assert_eq!(game.apply("alice", shot), Ok(0));
        assert_eq!(game.player("alice").unwrap().score(), 0);
        assert_eq!(game.turn(), 1);
        assert_eq!(game.current_player().name(), "bot");
        assert_eq!(game.board().to_layout(), before);
        assert_eq!(game.history().last().map(|r| r.points), Some(0));
    }

    #[test]
    fn last_flip_enters_escape() {
        let mut game = from_layout("B..../...../...../...../....d", 3);
        assert_eq!(game.phase(), Phase::Reveal);
        game.apply("alice", Action::Flip { target: c(4, 4) }).unwrap();
        assert_eq!(game.phase(), Phase::Escape);
        assert_eq!(game.rounds_remaining(), Some(3));
    }

    #[test]
    fn fully_revealed_board_starts_in_escape() {
        let game = from_layout("B..../...../...../...../....D", 3);
        assert_eq!(game.phase(), Phase::Escape);
        assert_eq!(game.rounds_remaining(), Some(3));
    }

    #[test]
    fn zero_rounds_finishes_immediately() {
        let game = from_layout("B..../...../...../...../....D", 0);
        assert!(game.is_game_over());
        assert_eq!(game.result(), Some(&GameResult::Draw));
    }

    #[test]
    fn escape_scores_and_rounds_count_down() {
        let mut game = from_layout("..B../...../...../...../L....", 2);
        game.apply("alice", Action::Move { from: c(0, 4), to: c(0, 3) }).unwrap();
        assert_eq!(game.rounds_remaining(), Some(2));
        assert_eq!(game.apply("bot", Action::Escape { from: c(2, 0) }), Ok(10));
        assert_eq!(game.rounds_remaining(), Some(1));
        assert_eq!(game.board().escaped_count(), 1);

        // The animals have nothing left, so they may pass.
        game.apply("alice", Action::Move { from: c(0, 3), to: c(0, 2) }).unwrap();
        assert_eq!(game.legal_actions(), vec![Action::Pass]);
        game.apply("bot", Action::Pass).unwrap();
        assert!(game.is_game_over());
        assert_eq!(game.winner().map(Player::name), Some("bot"));
        assert_eq!(game.legal_actions(), Vec::new());
    }

    #[test]
    fn finished_game_rejects_actions() {
        let mut game = from_layout("..B../...../...../...../L....", 1);
        game.apply("alice", Action::Move { from: c(0, 4), to: c(0, 3) }).unwrap();
        game.apply("bot", Action::Move { from: c(2, 0), to: c(2, 1) }).unwrap();
        assert!(game.is_game_over());
        let err = game.apply("alice", Action::Move { from: c(0, 3), to: c(0, 2) }).unwrap_err();
        assert_eq!(err.kind, ViolationKind::WrongPhase);
    }

    #[test]
    fn tie_is_a_draw() {
        let mut game = from_layout("..B../...../...../...../L....", 1);
        game.apply("alice", Action::Move { from: c(0, 4), to: c(0, 3) }).unwrap();
        game.apply("bot", Action::Move { from: c(2, 0), to: c(2, 1) }).unwrap();
        assert_eq!(game.result(), Some(&GameResult::Draw));
        assert!(game.winner().is_none());
    }

    #[test]
    fn apply_request() {
        let mut game = Game::with_seed(players(), GameConfig::default(), 5).unwrap();
        let req = ActionRequest {
            kind: "reveal".into(),
            target: Some(c(6, 6)),
            ..ActionRequest::default()
        };
        assert_eq!(game.apply_request("alice", req), Ok(0));
        let bad = ActionRequest {
            kind: "dance".into(),
            ..ActionRequest::default()
        };
        assert_eq!(
            game.apply_request("bot", bad).unwrap_err().kind,
            ViolationKind::UnknownActionKind
        );
    }
}
