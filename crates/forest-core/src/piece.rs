//! Piece kinds and their fixed attributes.

use crate::{Direction, Faction};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How far a piece may travel in one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    /// Exactly one orthogonal step.
    OneStep,
    /// Any number of empty cells along a row or column.
    Line,
    /// Never moves; can only be removed.
    Rooted,
}

/// The seven kinds of tile, without per-piece data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Species {
    Bear = 0,
    Fox = 1,
    Hunter = 2,
    Lumberjack = 3,
    Duck = 4,
    Pheasant = 5,
    Tree = 6,
}

impl Species {
    /// All species in order.
    pub const ALL: [Species; 7] = [
        Species::Bear,
        Species::Fox,
        Species::Hunter,
        Species::Lumberjack,
        Species::Duck,
        Species::Pheasant,
        Species::Tree,
    ];

    /// Returns the index of this species (0-6).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The faction every piece of this species belongs to.
    pub const fn faction(self) -> Faction {
        match self {
            Species::Bear | Species::Fox => Faction::Animals,
            Species::Hunter | Species::Lumberjack => Faction::Humans,
            Species::Duck | Species::Pheasant | Species::Tree => Faction::Neutral,
        }
    }

    /// Points scored for capturing or saving a piece of this species.
    pub const fn points(self) -> u32 {
        match self {
            Species::Bear => 10,
            Species::Fox | Species::Hunter | Species::Lumberjack => 5,
            Species::Pheasant => 3,
            Species::Duck | Species::Tree => 2,
        }
    }

    /// Movement range archetype.
    pub const fn movement(self) -> Movement {
        match self {
            Species::Bear | Species::Lumberjack => Movement::OneStep,
            Species::Fox | Species::Hunter | Species::Duck | Species::Pheasant => Movement::Line,
            Species::Tree => Movement::Rooted,
        }
    }

    /// Returns true if this species captures `target` by moving onto it.
    pub const fn captures(self, target: Species) -> bool {
        match self {
            Species::Bear => matches!(target, Species::Hunter | Species::Lumberjack),
            Species::Fox => matches!(target, Species::Pheasant | Species::Duck),
            Species::Lumberjack => matches!(target, Species::Tree),
            Species::Hunter | Species::Duck | Species::Pheasant | Species::Tree => false,
        }
    }

    /// Returns true if this species can hit `target` with a ranged shot.
    pub const fn shoots(self, target: Species) -> bool {
        match self {
            Species::Hunter => matches!(
                target,
                Species::Bear | Species::Fox | Species::Pheasant | Species::Duck
            ),
            _ => false,
        }
    }

    /// Returns true if this species carries a fixed shooting direction.
    #[inline]
    pub const fn is_shooter(self) -> bool {
        matches!(self, Species::Hunter)
    }

    /// The species this one removes from adjacent cells, if any.
    pub const fn clears(self) -> Option<Species> {
        match self {
            Species::Lumberjack => Some(Species::Tree),
            _ => None,
        }
    }

    /// Returns true if pieces of this species can ever be moved.
    #[inline]
    pub const fn is_movable(self) -> bool {
        !matches!(self.movement(), Movement::Rooted)
    }

    /// Builds the piece kind for this species.
    ///
    /// Shooters require a facing; every other species rejects one.
    pub const fn with_facing(self, facing: Option<Direction>) -> Option<PieceKind> {
        match (self, facing) {
            (Species::Hunter, Some(facing)) => Some(PieceKind::Hunter { facing }),
            (Species::Hunter, None) => None,
            (_, Some(_)) => None,
            (Species::Bear, None) => Some(PieceKind::Bear),
            (Species::Fox, None) => Some(PieceKind::Fox),
            (Species::Lumberjack, None) => Some(PieceKind::Lumberjack),
            (Species::Duck, None) => Some(PieceKind::Duck),
            (Species::Pheasant, None) => Some(PieceKind::Pheasant),
            (Species::Tree, None) => Some(PieceKind::Tree),
        }
    }

    /// Single-letter layout code (uppercase).
    pub const fn letter(self) -> char {
        match self {
            Species::Bear => 'B',
            Species::Fox => 'F',
            Species::Hunter => 'H',
            Species::Lumberjack => 'L',
            Species::Duck => 'D',
            Species::Pheasant => 'P',
            Species::Tree => 'T',
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Species::Bear => "Bear",
            Species::Fox => "Fox",
            Species::Hunter => "Hunter",
            Species::Lumberjack => "Lumberjack",
            Species::Duck => "Duck",
            Species::Pheasant => "Pheasant",
            Species::Tree => "Tree",
        };
        write!(f, "{}", name)
    }
}

/// A piece kind together with its per-piece data.
///
/// Hunters carry the direction their gun points in; it is fixed when the
/// tile is created. All other attributes are delegated to [`Species`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Bear,
    Fox,
    Hunter { facing: Direction },
    Lumberjack,
    Duck,
    Pheasant,
    Tree,
}

impl PieceKind {
    /// Returns the species of this kind.
    pub const fn species(self) -> Species {
        match self {
            PieceKind::Bear => Species::Bear,
            PieceKind::Fox => Species::Fox,
            PieceKind::Hunter { .. } => Species::Hunter,
            PieceKind::Lumberjack => Species::Lumberjack,
            PieceKind::Duck => Species::Duck,
            PieceKind::Pheasant => Species::Pheasant,
            PieceKind::Tree => Species::Tree,
        }
    }

    /// The fixed shooting direction, for shooters.
    #[inline]
    pub const fn facing(self) -> Option<Direction> {
        match self {
            PieceKind::Hunter { facing } => Some(facing),
            _ => None,
        }
    }

    #[inline]
    pub const fn faction(self) -> Faction {
        self.species().faction()
    }

    #[inline]
    pub const fn points(self) -> u32 {
        self.species().points()
    }

    #[inline]
    pub const fn movement(self) -> Movement {
        self.species().movement()
    }

    /// Returns true if this kind captures `target` by moving onto it.
    #[inline]
    pub const fn captures(self, target: PieceKind) -> bool {
        self.species().captures(target.species())
    }

    /// Returns true if this kind can shoot `target`.
    #[inline]
    pub const fn shoots(self, target: PieceKind) -> bool {
        self.species().shoots(target.species())
    }

    #[inline]
    pub const fn is_movable(self) -> bool {
        self.species().is_movable()
    }

    /// Layout code: the species letter, or the facing initial for hunters.
    pub const fn layout_char(self) -> char {
        match self {
            PieceKind::Hunter { facing } => match facing {
                Direction::North => 'N',
                Direction::East => 'E',
                Direction::South => 'S',
                Direction::West => 'W',
            },
            other => other.species().letter(),
        }
    }

    /// Parses a layout code, ignoring case.
    pub const fn from_layout_char(c: char) -> Option<PieceKind> {
        let kind = match c.to_ascii_uppercase() {
            'B' => PieceKind::Bear,
            'F' => PieceKind::Fox,
            'L' => PieceKind::Lumberjack,
            'D' => PieceKind::Duck,
            'P' => PieceKind::Pheasant,
            'T' => PieceKind::Tree,
            'N' => PieceKind::Hunter {
                facing: Direction::North,
            },
            'E' => PieceKind::Hunter {
                facing: Direction::East,
            },
            'S' => PieceKind::Hunter {
                facing: Direction::South,
            },
            'W' => PieceKind::Hunter {
                facing: Direction::West,
            },
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Hunter { facing } => write!(f, "Hunter ({})", facing),
            other => write!(f, "{}", other.species()),
        }
    }
}
