//! Rejected actions.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Category of a rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A coordinate lies outside the board.
    OutOfBounds,
    /// The referenced cell holds no live tile.
    EmptyCell,
    /// The flip target is already face up.
    AlreadyRevealed,
    /// The acting tile is still face down.
    TileHidden,
    /// The tile belongs to the other faction, or it is not this player's turn.
    NotOwner,
    /// The target may not be captured by the acting piece.
    IllegalCapture,
    /// The piece cannot move or act that way.
    IllegalMovementPattern,
    /// A tile stands between source and destination.
    PathBlocked,
    /// The anti-repetition rule forbids this move right now.
    RepetitionRestricted,
    /// The action is not available in the current phase.
    WrongPhase,
    /// The action kind is not recognised.
    UnknownActionKind,
    /// A required action parameter was not supplied.
    MissingParameter,
    /// The board refused an action that had passed validation. The game
    /// state can no longer be trusted.
    Internal,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationKind::OutOfBounds => "out of bounds",
            ViolationKind::EmptyCell => "empty cell",
            ViolationKind::AlreadyRevealed => "already revealed",
            ViolationKind::TileHidden => "tile hidden",
            ViolationKind::NotOwner => "not owner",
            ViolationKind::IllegalCapture => "illegal capture",
            ViolationKind::IllegalMovementPattern => "illegal movement pattern",
            ViolationKind::PathBlocked => "path blocked",
            ViolationKind::RepetitionRestricted => "repetition restricted",
            ViolationKind::WrongPhase => "wrong phase",
            ViolationKind::UnknownActionKind => "unknown action kind",
            ViolationKind::MissingParameter => "missing parameter",
            ViolationKind::Internal => "internal error",
        };
        write!(f, "{}", name)
    }
}

/// An action was rejected. Carries the category and a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {reason}")]
pub struct RuleViolation {
    pub kind: ViolationKind,
    pub reason: String,
}

impl RuleViolation {
    pub fn new(kind: ViolationKind, reason: impl Into<String>) -> Self {
        RuleViolation {
            kind,
            reason: reason.into(),
        }
    }

    pub fn out_of_bounds(reason: impl Into<String>) -> Self {
        Self::new(ViolationKind::OutOfBounds, reason)
    }

    pub fn empty_cell(reason: impl Into<String>) -> Self {
        Self::new(ViolationKind::EmptyCell, reason)
    }

    pub fn not_owner(reason: impl Into<String>) -> Self {
        Self::new(ViolationKind::NotOwner, reason)
    }

    pub fn illegal_capture(reason: impl Into<String>) -> Self {
        Self::new(ViolationKind::IllegalCapture, reason)
    }

    pub fn illegal_pattern(reason: impl Into<String>) -> Self {
        Self::new(ViolationKind::IllegalMovementPattern, reason)
    }

    pub fn wrong_phase(reason: impl Into<String>) -> Self {
        Self::new(ViolationKind::WrongPhase, reason)
    }
}
