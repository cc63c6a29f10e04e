//! The mutable per-cell entity.

use crate::{Coord, Faction, PieceKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a tile within one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u16);

impl TileId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a tile is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileStatus {
    /// On the board.
    Live,
    /// Removed by a capture, shot, or clearing.
    Captured,
    /// Left the forest through an exit during the escape phase.
    Escaped,
}

/// A faction touching a tile on a given turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Touch {
    pub by: Faction,
    pub turn: u32,
}

/// A single game tile.
///
/// Identity (`id`, `kind`, `faction`, `points`) never changes. The remaining
/// fields are bookkeeping maintained by the board; a tile that is not
/// [`TileStatus::Live`] never has a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    id: TileId,
    kind: PieceKind,
    faction: Faction,
    points: u32,
    revealed: bool,
    status: TileStatus,
    position: Option<Coord>,
    previous_position: Option<Coord>,
    last_moved: Option<Touch>,
    last_revealed: Option<Touch>,
}

impl Tile {
    /// Creates a face-down live tile at `position`.
    pub fn new(id: TileId, kind: PieceKind, position: Coord) -> Self {
        Tile {
            id,
            kind,
            faction: kind.faction(),
            points: kind.points(),
            revealed: false,
            status: TileStatus::Live,
            position: Some(position),
            previous_position: None,
            last_moved: None,
            last_revealed: None,
        }
    }

    #[inline]
    pub fn id(&self) -> TileId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub fn faction(&self) -> Faction {
        self.faction
    }

    #[inline]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[inline]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[inline]
    pub fn status(&self) -> TileStatus {
        self.status
    }

    /// Returns true while the tile is on the board.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.status == TileStatus::Live
    }

    #[inline]
    pub fn position(&self) -> Option<Coord> {
        self.position
    }

    #[inline]
    pub fn previous_position(&self) -> Option<Coord> {
        self.previous_position
    }

    #[inline]
    pub fn last_moved(&self) -> Option<Touch> {
        self.last_moved
    }

    #[inline]
    pub fn last_revealed(&self) -> Option<Touch> {
        self.last_revealed
    }

    pub fn last_moved_by(&self) -> Option<Faction> {
        self.last_moved.map(|t| t.by)
    }

    pub fn last_revealed_by(&self) -> Option<Faction> {
        self.last_revealed.map(|t| t.by)
    }

    /// Returns true if `faction` may act on this tile at all.
    ///
    /// Neutral tiles belong to everyone; the anti-repetition rule is
    /// checked separately.
    pub fn is_controlled_by(&self, faction: Faction) -> bool {
        self.faction == Faction::Neutral || self.faction == faction
    }

    /// Returns true if a faction other than `faction` moved or revealed this
    /// tile on `turn`.
    pub fn touched_by_other_on(&self, faction: Faction, turn: u32) -> bool {
        [self.last_moved, self.last_revealed]
            .into_iter()
            .flatten()
            .any(|t| t.turn == turn && t.by != faction)
    }

    /// Turns the tile face up.
    pub fn reveal(&mut self, by: Faction, turn: u32) {
        self.revealed = true;
        self.last_revealed = Some(Touch { by, turn });
    }

    /// Records a move to `to`.
    pub fn move_to(&mut self, to: Coord, by: Faction, turn: u32) {
        self.previous_position = self.position;
        self.position = Some(to);
        self.last_moved = Some(Touch { by, turn });
    }

    /// Marks the tile captured and clears its position.
    pub fn capture(&mut self) {
        self.status = TileStatus::Captured;
        self.position = None;
    }

    /// Marks the tile escaped and clears its position.
    pub fn escape(&mut self, by: Faction, turn: u32) {
        self.status = TileStatus::Escaped;
        self.previous_position = self.position;
        self.position = None;
        self.last_moved = Some(Touch { by, turn });
    }

    /// Sets the revealed flag without recording a revealer.
    ///
    /// Used when building boards from layouts.
    pub fn set_revealed(&mut self, revealed: bool) {
        self.revealed = revealed;
    }
}
