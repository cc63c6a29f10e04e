//! Tile composition of a game.

use crate::board::Board;
use crate::config::ConfigError;
use forest_core::{Direction, PieceKind, Species};
use serde::{Deserialize, Serialize};

/// A number of identical tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGroup {
    pub kind: Species,
    /// Required for hunters, forbidden for everything else.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<Direction>,
    pub count: usize,
}

impl TileGroup {
    pub fn new(kind: Species, count: usize) -> Self {
        TileGroup {
            kind,
            facing: None,
            count,
        }
    }

    pub fn facing(kind: Species, facing: Direction, count: usize) -> Self {
        TileGroup {
            kind,
            facing: Some(facing),
            count,
        }
    }

    /// The concrete piece kind of this group.
    pub fn piece_kind(&self) -> Result<PieceKind, ConfigError> {
        match (self.kind.with_facing(self.facing), self.facing) {
            (Some(kind), _) => Ok(kind),
            (None, None) => Err(ConfigError::MissingFacing(self.kind)),
            (None, Some(_)) => Err(ConfigError::UnexpectedFacing(self.kind)),
        }
    }
}

/// The full list of tiles dealt onto the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileSet {
    groups: Vec<TileGroup>,
}

impl TileSet {
    /// Most tiles any supported board can hold.
    pub const MAX_TILES: usize = (Board::MAX_SIZE * Board::MAX_SIZE - 1) as usize;

    pub fn new(groups: Vec<TileGroup>) -> Self {
        TileSet { groups }
    }

    /// The standard 48-tile set for a 7x7 board.
    ///
    /// 2 bears, 6 foxes, 8 hunters (two per facing), 2 lumberjacks,
    /// 8 ducks, 8 pheasants and 14 trees.
    pub fn standard() -> Self {
        let mut groups = vec![TileGroup::new(Species::Bear, 2), TileGroup::new(Species::Fox, 6)];
        groups.extend(
            Direction::ALL
                .into_iter()
                .map(|d| TileGroup::facing(Species::Hunter, d, 2)),
        );
        groups.extend([
            TileGroup::new(Species::Lumberjack, 2),
            TileGroup::new(Species::Duck, 8),
            TileGroup::new(Species::Pheasant, 8),
            TileGroup::new(Species::Tree, 14),
        ]);
        TileSet { groups }
    }

    pub fn groups(&self) -> &[TileGroup] {
        &self.groups
    }

    /// Total number of tiles, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    /// Total number of tiles, or `None` if the counts overflow.
    pub fn checked_len(&self) -> Option<usize> {
        self.groups
            .iter()
            .try_fold(0usize, |total, g| total.checked_add(g.count))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of tiles of `species`, across all facings.
    pub fn count_of(&self, species: Species) -> usize {
        self.groups
            .iter()
            .filter(|g| g.kind == species)
            .fold(0usize, |total, g| total.saturating_add(g.count))
    }

    /// Expands the set into one piece kind per tile.
    ///
    /// Fails with [`ConfigError::TooManyTiles`] before allocating anything
    /// if the set is larger than any board.
    pub fn kinds(&self) -> Result<Vec<PieceKind>, ConfigError> {
        let total = self
            .checked_len()
            .filter(|&n| n <= Self::MAX_TILES)
            .ok_or(ConfigError::TooManyTiles { max: Self::MAX_TILES })?;
        let mut kinds = Vec::with_capacity(total);
        for group in &self.groups {
            let kind = group.piece_kind()?;
            kinds.extend(std::iter::repeat(kind).take(group.count));
        }
        Ok(kinds)
    }
}

impl Default for TileSet {
    fn default() -> Self {
        Self::standard()
    }
}
