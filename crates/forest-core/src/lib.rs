//! Core types for the forest game.
//!
//! This crate provides the fundamental types shared by the board, the rules
//! validator, and the turn engine:
//! - [`Coord`] and [`Direction`] for board coordinates
//! - [`Faction`] for piece and player ownership
//! - [`Species`] and [`PieceKind`] for piece behavior
//! - [`Tile`] for the mutable per-cell entity
//! - [`Action`] and [`ActionRequest`] for player actions
//! - [`RuleViolation`] for rejected actions

mod action;
mod coord;
mod faction;
mod piece;
mod tile;
mod violation;

pub use action::{Action, ActionKind, ActionRequest};
pub use coord::{Coord, Direction};
pub use faction::Faction;
pub use piece::{Movement, PieceKind, Species};
pub use tile::{Tile, TileId, TileStatus, Touch};
pub use violation::{RuleViolation, ViolationKind};
