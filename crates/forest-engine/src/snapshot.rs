//! Serializable view of a game for callers outside the engine.

use crate::game::Game;
use crate::rules::{GameResult, Phase};
use forest_core::{Coord, Direction, Faction, Species};
use serde::{Deserialize, Serialize};

/// One player's standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub name: String,
    pub faction: Faction,
    pub score: u32,
}

/// One board cell as a player sees it.
///
/// Face-down tiles only reveal that the cell is occupied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub pos: Coord,
    pub occupied: bool,
    pub revealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<Species>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faction: Option<Faction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facing: Option<Direction>,
}

/// Public state of a game at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub current_player: String,
    pub turn: u32,
    pub scores: Vec<ScoreLine>,
    pub rounds_remaining: Option<u32>,
    pub winner: Option<String>,
    pub is_draw: bool,
    pub is_game_over: bool,
    pub hidden_tiles: usize,
    pub board_size: i32,
    /// Row-major, northmost row first.
    pub cells: Vec<CellView>,
}

impl Snapshot {
    pub fn capture(game: &Game) -> Self {
        let board = game.board();
        let cells = board
            .coords()
            .map(|pos| match board.get(pos) {
                Some(tile) if tile.is_revealed() => CellView {
                    pos,
                    occupied: true,
                    revealed: true,
                    kind: Some(tile.kind().species()),
                    faction: Some(tile.faction()),
                    facing: tile.kind().facing(),
                },
                other => CellView {
                    pos,
                    occupied: other.is_some(),
                    revealed: false,
                    kind: None,
                    faction: None,
                    facing: None,
                },
            })
            .collect();

        Snapshot {
            phase: game.phase(),
            current_player: game.current_player().name().to_string(),
            turn: game.turn(),
            scores: game
                .players()
                .iter()
                .map(|p| ScoreLine {
                    name: p.name().to_string(),
                    faction: p.faction(),
                    score: p.score(),
                })
                .collect(),
            rounds_remaining: game.rounds_remaining(),
            winner: game.winner().map(|p| p.name().to_string()),
            is_draw: game.result() == Some(&GameResult::Draw),
            is_game_over: game.is_game_over(),
            hidden_tiles: board.hidden_count(),
            board_size: board.size(),
            cells,
        }
    }
}
