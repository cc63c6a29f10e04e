//! Grid state and tile mechanics.
//!
//! The [`Board`] owns every tile of a game and exposes the primitive
//! mutations (reveal, relocate, capture, escape) plus the composite actions
//! built from them. It enforces mechanical consistency only; whether a player
//! is *allowed* to perform an action is decided by the
//! [`rules`](crate::rules) module before any of these methods is called.

use forest_core::{Coord, Direction, Faction, PieceKind, Tile, TileId, TileStatus};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use thiserror::Error;

/// Errors raised by board primitives.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("position {0} is out of bounds")]
    OutOfBounds(Coord),

    #[error("no tile at {0}")]
    EmptyCell(Coord),

    #[error("tile at {0} is already revealed")]
    AlreadyRevealed(Coord),

    #[error("cell {0} is already occupied")]
    Occupied(Coord),

    #[error("the center cell {0} must stay empty")]
    CenterOccupied(Coord),

    #[error("{0} is not a forest exit")]
    NotAnExit(Coord),

    #[error("a tile cannot move onto its own cell {0}")]
    Stationary(Coord),

    #[error("board size {0} must be odd and between 3 and {max}", max = Board::MAX_SIZE)]
    InvalidSize(i32),

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("board invariant violated: {0}")]
    InvariantBreach(String),
}

/// One of the four ways out of the forest.
///
/// The `gate` is the edge-midpoint cell on the board; the `point` is the
/// off-board coordinate directly beyond it that a moving piece targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Exit {
    pub side: Direction,
    pub gate: Coord,
    pub point: Coord,
}

/// The game board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: i32,
    /// Row-major cell contents; only live tiles are referenced.
    cells: Vec<Option<TileId>>,
    /// Every tile ever placed, indexed by [`TileId`].
    tiles: Vec<Tile>,
}

impl Board {
    /// Standard board edge length.
    pub const STANDARD_SIZE: i32 = 7;

    /// Largest supported edge length. Every tile of a full board still
    /// gets its own [`TileId`].
    pub const MAX_SIZE: i32 = 255;

    /// Creates an empty board.
    pub fn empty(size: i32) -> Result<Self, BoardError> {
        if !(3..=Self::MAX_SIZE).contains(&size) || size % 2 == 0 {
            return Err(BoardError::InvalidSize(size));
        }
        Ok(Board {
            size,
            cells: vec![None; (size * size) as usize],
            tiles: Vec::new(),
        })
    }

    /// Creates a board with `kinds` shuffled face down over every cell
    /// except the center.
    ///
    /// Fails with [`BoardError::InvariantBreach`] unless there is exactly one
    /// kind per non-center cell.
    pub fn shuffled<R: Rng + ?Sized>(
        size: i32,
        mut kinds: Vec<PieceKind>,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        let mut board = Board::empty(size)?;
        let needed = board.playable_cells();
        if kinds.len() != needed {
            return Err(BoardError::InvariantBreach(format!(
                "expected {} tiles for a {}x{} board, got {}",
                needed,
                size,
                size,
                kinds.len()
            )));
        }
        kinds.shuffle(rng);

        let center = board.center();
        let cells: Vec<Coord> = board.coords().filter(|&c| c != center).collect();
        for (pos, kind) in cells.into_iter().zip(kinds) {
            board.place(pos, kind, false)?;
        }
        tracing::trace!(size, tiles = board.tiles.len(), "board set up");
        Ok(board)
    }

    /// Builds a board from a text layout.
    ///
    /// Rows are separated by `/` or newlines, northmost row first. `.` is an
    /// empty cell; `B F L D P T` are bear, fox, lumberjack, duck, pheasant
    /// and tree; `N E S W` are hunters facing that way. Uppercase tiles are
    /// face up, lowercase tiles face down.
    ///
    /// ```
    /// use forest_engine::Board;
    ///
    /// let board = Board::from_layout("B.N/.../t.f").unwrap();
    /// assert_eq!(board.live_count(), 4);
    /// assert_eq!(board.hidden_count(), 2);
    /// ```
    pub fn from_layout(layout: &str) -> Result<Self, BoardError> {
        let rows: Vec<&str> = layout
            .split(['/', '\n'])
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();
        let size = i32::try_from(rows.len()).unwrap_or(i32::MAX);
        let mut board = Board::empty(size)
            .map_err(|_| BoardError::InvalidLayout(format!("{} rows is not a valid board", size)))?;

        for (y, row) in rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != rows.len() {
                return Err(BoardError::InvalidLayout(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    chars.len(),
                    rows.len()
                )));
            }
            for (x, c) in chars.into_iter().enumerate() {
                if c == '.' {
                    continue;
                }
                let kind = PieceKind::from_layout_char(c).ok_or_else(|| {
                    BoardError::InvalidLayout(format!("unknown tile '{}' in row {}", c, y))
                })?;
                board.place(Coord::new(x as i32, y as i32), kind, c.is_ascii_uppercase())?;
            }
        }
        Ok(board)
    }

    /// Renders the board in the format accepted by [`Board::from_layout`].
    pub fn to_layout(&self) -> String {
        let rows: Vec<String> = (0..self.size)
            .map(|y| {
                (0..self.size)
                    .map(|x| match self.get(Coord::new(x, y)) {
                        Some(tile) if tile.is_revealed() => tile.kind().layout_char(),
                        Some(tile) => tile.kind().layout_char().to_ascii_lowercase(),
                        None => '.',
                    })
                    .collect()
            })
            .collect();
        rows.join("/")
    }

    /// Places a new live tile. Used for setup and layouts.
    pub fn place(&mut self, pos: Coord, kind: PieceKind, revealed: bool) -> Result<TileId, BoardError> {
        let index = self.index(pos).ok_or(BoardError::OutOfBounds(pos))?;
        if pos == self.center() {
            return Err(BoardError::CenterOccupied(pos));
        }
        if self.cells[index].is_some() {
            return Err(BoardError::Occupied(pos));
        }
        let id = u16::try_from(self.tiles.len())
            .map(TileId)
            .map_err(|_| BoardError::InvariantBreach(format!("no tile id left for {}", pos)))?;
        let mut tile = Tile::new(id, kind, pos);
        tile.set_revealed(revealed);
        self.tiles.push(tile);
        self.cells[index] = Some(id);
        Ok(id)
    }

    /// Board edge length.
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// The permanently empty center cell.
    #[inline]
    pub fn center(&self) -> Coord {
        Coord::new(self.size / 2, self.size / 2)
    }

    /// Number of cells that can hold a tile.
    #[inline]
    pub fn playable_cells(&self) -> usize {
        (self.size * self.size - 1) as usize
    }

    #[inline]
    pub fn is_within_bounds(&self, pos: Coord) -> bool {
        (0..self.size).contains(&pos.x) && (0..self.size).contains(&pos.y)
    }

    fn index(&self, pos: Coord) -> Option<usize> {
        self.is_within_bounds(pos)
            .then(|| (pos.y * self.size + pos.x) as usize)
    }

    /// All in-bounds coordinates, row by row.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.size).flat_map(move |y| (0..self.size).map(move |x| Coord::new(x, y)))
    }

    /// The live tile at `pos`, if any.
    pub fn get(&self, pos: Coord) -> Option<&Tile> {
        let id = self.index(pos).and_then(|i| self.cells[i])?;
        self.tiles.get(id.index())
    }

    #[inline]
    pub fn is_occupied(&self, pos: Coord) -> bool {
        self.get(pos).is_some()
    }

    /// Looks up any tile, live or not.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// Every tile placed on this board, including removed ones.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn live_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_alive())
    }

    fn count_status(&self, status: TileStatus) -> usize {
        self.tiles.iter().filter(|t| t.status() == status).count()
    }

    pub fn live_count(&self) -> usize {
        self.count_status(TileStatus::Live)
    }

    pub fn captured_count(&self) -> usize {
        self.count_status(TileStatus::Captured)
    }

    pub fn escaped_count(&self) -> usize {
        self.count_status(TileStatus::Escaped)
    }

    /// Number of tiles the board started with.
    #[inline]
    pub fn total_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Number of live tiles still face down.
    pub fn hidden_count(&self) -> usize {
        self.live_tiles().filter(|t| !t.is_revealed()).count()
    }

    #[inline]
    pub fn has_hidden_tiles(&self) -> bool {
        self.hidden_count() > 0
    }

    #[inline]
    pub fn all_revealed(&self) -> bool {
        !self.has_hidden_tiles()
    }

    /// The four exits, clockwise from North.
    pub fn exits(&self) -> [Exit; 4] {
        let mid = self.size / 2;
        let last = self.size - 1;
        Direction::ALL.map(|side| {
            let gate = match side {
                Direction::North => Coord::new(mid, 0),
                Direction::East => Coord::new(last, mid),
                Direction::South => Coord::new(mid, last),
                Direction::West => Coord::new(0, mid),
            };
            Exit {
                side,
                gate,
                point: gate.step(side),
            }
        })
    }

    /// The exit whose gate cell is `pos`.
    pub fn exit_at_gate(&self, pos: Coord) -> Option<Exit> {
        self.exits().into_iter().find(|e| e.gate == pos)
    }

    /// The exit whose off-board point is `pos`.
    pub fn exit_at_point(&self, pos: Coord) -> Option<Exit> {
        self.exits().into_iter().find(|e| e.point == pos)
    }

    /// The first occupied cell strictly beyond `from` in `direction`.
    pub fn line_of_sight(&self, from: Coord, direction: Direction) -> Option<Coord> {
        let mut pos = from.step(direction);
        while self.is_within_bounds(pos) {
            if self.is_occupied(pos) {
                return Some(pos);
            }
            pos = pos.step(direction);
        }
        None
    }

    /// The first occupied cell strictly between `from` and `to`.
    pub fn first_blocker(&self, from: Coord, to: Coord) -> Option<Coord> {
        from.cells_between(to)
            .into_iter()
            .find(|&c| self.is_occupied(c))
    }

    /// Returns true if every cell strictly between `from` and `to` is empty.
    #[inline]
    pub fn is_path_clear(&self, from: Coord, to: Coord) -> bool {
        self.first_blocker(from, to).is_none()
    }

    fn live_id(&self, pos: Coord) -> Result<TileId, BoardError> {
        let index = self.index(pos).ok_or(BoardError::OutOfBounds(pos))?;
        self.cells[index].ok_or(BoardError::EmptyCell(pos))
    }

    fn tile_mut(&mut self, id: TileId) -> &mut Tile {
        &mut self.tiles[id.index()]
    }

    /// Turns the tile at `pos` face up.
    pub fn reveal(&mut self, pos: Coord, by: Faction, turn: u32) -> Result<&Tile, BoardError> {
        let id = self.live_id(pos)?;
        if self.tiles[id.index()].is_revealed() {
            return Err(BoardError::AlreadyRevealed(pos));
        }
        let tile = self.tile_mut(id);
        tile.reveal(by, turn);
        tracing::trace!(%pos, kind = %tile.kind(), "tile revealed");
        Ok(&*tile)
    }

    /// Removes the live tile at `pos` from play, returning its id and points.
    fn capture_at(&mut self, pos: Coord) -> Result<(u32, TileId), BoardError> {
        let id = self.live_id(pos)?;
        let index = self.index(pos).ok_or(BoardError::OutOfBounds(pos))?;
        self.cells[index] = None;
        let tile = self.tile_mut(id);
        tile.capture();
        tracing::trace!(%pos, kind = %tile.kind(), "tile captured");
        Ok((tile.points(), id))
    }

    /// Moves the tile at `from` to `to`, capturing whatever stands on `to`.
    ///
    /// Returns the captured tile's points (zero for an empty destination)
    /// and its id.
    pub fn relocate(
        &mut self,
        from: Coord,
        to: Coord,
        mover: Faction,
        turn: u32,
    ) -> Result<(u32, Option<TileId>), BoardError> {
        let to_index = self.index(to).ok_or(BoardError::OutOfBounds(to))?;
        let id = self.live_id(from)?;
        if from == to {
            return Err(BoardError::Stationary(from));
        }

        let captured = match self.cells[to_index] {
            Some(_) => Some(self.capture_at(to)?),
            None => None,
        };

        let from_index = self.index(from).ok_or(BoardError::OutOfBounds(from))?;
        self.cells[from_index] = None;
        self.cells[to_index] = Some(id);
        self.tile_mut(id).move_to(to, mover, turn);

        Ok(match captured {
            Some((points, captured_id)) => (points, Some(captured_id)),
            None => (0, None),
        })
    }

    /// Fires from `shooter` along `direction`.
    ///
    /// The shot stops at the first tile in line. If that tile is face up and
    /// a target for the shooter's kind it is captured and its points
    /// returned; otherwise the shot scores zero and nothing changes.
    pub fn ranged_capture(
        &mut self,
        shooter: Coord,
        direction: Direction,
    ) -> Result<(u32, Option<TileId>), BoardError> {
        let id = self.live_id(shooter)?;
        let shooter_kind = self.tiles[id.index()].kind();

        let Some(target_pos) = self.line_of_sight(shooter, direction) else {
            return Ok((0, None));
        };
        let hit = self
            .get(target_pos)
            .is_some_and(|t| t.is_revealed() && shooter_kind.shoots(t.kind()));
        if !hit {
            return Ok((0, None));
        }
        let (points, captured) = self.capture_at(target_pos)?;
        Ok((points, Some(captured)))
    }

    /// Removes every face-up neighbour of `actor` that the actor clears.
    ///
    /// Returns the total points and the removed tiles.
    pub fn adjacent_removal(&mut self, actor: Coord) -> Result<(u32, Vec<TileId>), BoardError> {
        let id = self.live_id(actor)?;
        let Some(cleared) = self.tiles[id.index()].kind().species().clears() else {
            return Ok((0, Vec::new()));
        };

        let mut total = 0;
        let mut removed = Vec::new();
        for pos in actor.neighbors() {
            let matches = self
                .get(pos)
                .is_some_and(|t| t.is_revealed() && t.kind().species() == cleared);
            if matches {
                let (points, captured) = self.capture_at(pos)?;
                total += points;
                removed.push(captured);
            }
        }
        Ok((total, removed))
    }

    /// Takes the tile on exit gate `pos` out of the forest.
    pub fn evaluate_exit(
        &mut self,
        pos: Coord,
        mover: Faction,
        turn: u32,
    ) -> Result<(u32, TileId), BoardError> {
        let exit = self.exit_at_gate(pos).ok_or(BoardError::NotAnExit(pos))?;
        self.exit_via(pos, exit.point, mover, turn)
    }

    /// Takes the tile at `from` out of the forest through exit `point`.
    pub fn exit_via(
        &mut self,
        from: Coord,
        point: Coord,
        mover: Faction,
        turn: u32,
    ) -> Result<(u32, TileId), BoardError> {
        if self.exit_at_point(point).is_none() {
            return Err(BoardError::NotAnExit(point));
        }
        let id = self.live_id(from)?;
        let index = self.index(from).ok_or(BoardError::OutOfBounds(from))?;
        self.cells[index] = None;
        let tile = self.tile_mut(id);
        tile.escape(mover, turn);
        tracing::trace!(%from, %point, kind = %tile.kind(), "tile escaped");
        Ok((tile.points(), id))
    }

    /// Checks the structural invariants of the board.
    ///
    /// `expected_tiles` is the number of tiles the game started with.
    pub fn verify(&self, expected_tiles: usize) -> Result<(), BoardError> {
        let accounted = self.live_count() + self.captured_count() + self.escaped_count();
        if accounted != expected_tiles || self.tiles.len() != expected_tiles {
            return Err(BoardError::InvariantBreach(format!(
                "expected {} tiles, found {}",
                expected_tiles, accounted
            )));
        }
        if self.is_occupied(self.center()) {
            return Err(BoardError::InvariantBreach("center cell is occupied".into()));
        }

        let mut referenced = 0;
        for pos in self.coords() {
            let Some(index) = self.index(pos) else { continue };
            let Some(id) = self.cells[index] else { continue };
            referenced += 1;
            let tile = self.tile(id).ok_or_else(|| {
                BoardError::InvariantBreach(format!("cell {} references unknown tile {}", pos, id))
            })?;
            if !tile.is_alive() || tile.position() != Some(pos) {
                return Err(BoardError::InvariantBreach(format!(
                    "cell {} references tile {} placed at {:?}",
                    pos,
                    id,
                    tile.position()
                )));
            }
        }
        if referenced != self.live_count() {
            return Err(BoardError::InvariantBreach(format!(
                "{} live tiles but {} occupied cells",
                self.live_count(),
                referenced
            )));
        }
        if let Some(t) = self.tiles.iter().find(|t| !t.is_alive() && t.position().is_some()) {
            return Err(BoardError::InvariantBreach(format!(
                "removed tile {} still has a position",
                t.id()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_layout().split('/') {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
