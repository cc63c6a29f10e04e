//! Rule set abstraction.
//!
//! This module provides the [`RuleSet`] trait, which decides whether an
//! action is allowed in a given state. The [`Game`](crate::Game) only
//! sequences turns and phases; every legality question goes through the
//! active rule set before the board is touched.

mod candidates;
mod validator;

pub use candidates::candidate_actions;
pub use validator::RulesValidator;

use crate::board::{Board, BoardError};
use forest_core::{Action, Faction, RuleViolation, ViolationKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Face-down tiles remain; flipping is allowed alongside other actions.
    Reveal,
    /// Every tile is face up; exits are open and rounds count down.
    Escape,
    /// No further actions are accepted.
    Finished,
}

impl Phase {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::Finished)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Reveal => "reveal",
            Phase::Escape => "escape",
            Phase::Finished => "finished",
        };
        write!(f, "{}", name)
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    /// A single player has the highest score.
    Winner(String),
    /// Two or more players share the highest score.
    Draw,
}

/// The state an action is judged against.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub board: &'a Board,
    pub phase: Phase,
    /// Index of the turn being played, starting at zero.
    pub turn: u32,
}

impl<'a> RuleContext<'a> {
    pub fn new(board: &'a Board, phase: Phase, turn: u32) -> Self {
        RuleContext { board, phase, turn }
    }
}

/// Trait for deciding action legality.
///
/// Implementations must be pure: validation never mutates the board.
///
/// # Example
///
/// ```
/// use forest_engine::{Board, Phase, RuleContext, RuleSet, RulesValidator};
/// use forest_core::{Action, Coord, Faction};
///
/// let board = Board::from_layout("b..../...../...../...../.....").unwrap();
/// let ctx = RuleContext::new(&board, Phase::Reveal, 0);
/// let flip = Action::Flip { target: Coord::new(0, 0) };
/// assert!(RulesValidator.is_legal(&ctx, Faction::Humans, &flip));
/// ```
pub trait RuleSet {
    /// Checks whether `faction` may perform `action`.
    ///
    /// Returns the first violated rule.
    fn validate(
        &self,
        ctx: &RuleContext<'_>,
        faction: Faction,
        action: &Action,
    ) -> Result<(), RuleViolation>;

    /// Returns true if the action passes validation.
    fn is_legal(&self, ctx: &RuleContext<'_>, faction: Faction, action: &Action) -> bool {
        self.validate(ctx, faction, action).is_ok()
    }

    /// All legal actions for `faction`, with [`Action::Pass`] offered only
    /// when nothing else is legal in the escape phase.
    fn legal_actions(&self, ctx: &RuleContext<'_>, faction: Faction) -> Vec<Action> {
        let mut actions: Vec<Action> = candidate_actions(ctx.board, ctx.phase, faction)
            .into_iter()
            .filter(|a| self.is_legal(ctx, faction, a))
            .collect();
        if actions.is_empty() && self.is_legal(ctx, faction, &Action::Pass) {
            actions.push(Action::Pass);
        }
        actions
    }
}

impl From<BoardError> for RuleViolation {
    fn from(err: BoardError) -> Self {
        let kind = match err {
            BoardError::OutOfBounds(_) => ViolationKind::OutOfBounds,
            BoardError::EmptyCell(_) => ViolationKind::EmptyCell,
            BoardError::AlreadyRevealed(_) => ViolationKind::AlreadyRevealed,
            BoardError::Stationary(_) | BoardError::NotAnExit(_) => {
                ViolationKind::IllegalMovementPattern
            }
            BoardError::Occupied(_)
            | BoardError::CenterOccupied(_)
            | BoardError::InvalidSize(_)
            | BoardError::InvalidLayout(_)
            | BoardError::InvariantBreach(_) => ViolationKind::Internal,
        };
        RuleViolation::new(kind, err.to_string())
    }
}
