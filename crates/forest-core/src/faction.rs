//! Ownership groups for pieces and players.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The group a piece or player belongs to.
///
/// Players always belong to [`Faction::Humans`] or [`Faction::Animals`];
/// [`Faction::Neutral`] pieces may be moved by either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    /// Hunters and lumberjacks.
    Humans,
    /// Bears and foxes.
    Animals,
    /// Ducks, pheasants, and trees.
    Neutral,
}

impl Faction {
    /// The two factions a player can play.
    pub const PLAYABLE: [Faction; 2] = [Faction::Humans, Faction::Animals];

    /// Returns true if a player may play this faction.
    #[inline]
    pub const fn is_playable(self) -> bool {
        matches!(self, Faction::Humans | Faction::Animals)
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Humans => write!(f, "Humans"),
            Faction::Animals => write!(f, "Animals"),
            Faction::Neutral => write!(f, "Neutral"),
        }
    }
}
