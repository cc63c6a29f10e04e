//! Rules engine for the forest tile game "De Beer is Los!".
//!
//! This crate provides:
//! - [`Board`] - 7x7 grid of face-down tiles with the capture and escape mechanics
//! - [`RuleSet`] - Trait for deciding action legality, implemented by [`RulesValidator`]
//! - [`Game`] - Turn order, scoring and the `Reveal -> Escape -> Finished` phases
//! - [`GameConfig`] - Board size, escape rounds and tile set, loadable from TOML
//! - [`Snapshot`] - Serializable public view of a game
//!
//! # Example
//!
//! ```
//! use forest_core::{Action, Coord, Faction};
//! use forest_engine::{Game, GameConfig, Phase, Player};
//!
//! let players = vec![
//!     Player::human("alice", Faction::Humans),
//!     Player::automated("bot", Faction::Animals),
//! ];
//! let mut game = Game::with_seed(players, GameConfig::default(), 7).unwrap();
//! game.apply("alice", Action::Flip { target: Coord::new(0, 0) }).unwrap();
//!
//! assert_eq!(game.phase(), Phase::Reveal);
//! assert_eq!(game.current_player().name(), "bot");
//! ```

mod board;
mod config;
mod game;
pub mod rules;
mod snapshot;
mod tileset;

pub use board::{Board, BoardError, Exit};
pub use config::{ConfigError, GameConfig};
pub use game::{Game, GameError, Player, PlayerKind, TurnRecord};
pub use rules::{GameResult, Phase, RuleContext, RuleSet, RulesValidator};
pub use snapshot::{CellView, ScoreLine, Snapshot};
pub use tileset::{TileGroup, TileSet};
