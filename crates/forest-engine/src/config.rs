//! Game configuration loaded from TOML.
//!
//! Every field has a default, so an empty file describes the standard game:
//! a 7x7 board, five escape rounds and the standard tile set.

use crate::board::Board;
use crate::tileset::TileSet;
use forest_core::Species;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Board size {0} must be odd and between 3 and {max}", max = Board::MAX_SIZE)]
    BoardSize(i32),
    /// The tile set does not fill every non-center cell exactly once.
    #[error("Tile set holds {found} tiles but a {size}x{size} board needs {expected}")]
    TileCount {
        size: i32,
        expected: usize,
        found: usize,
    },
    #[error("Tile set holds more than {max} tiles")]
    TooManyTiles { max: usize },
    #[error("{0} tiles need a facing")]
    MissingFacing(Species),
    #[error("{0} tiles cannot have a facing")]
    UnexpectedFacing(Species),
}

/// Settings for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board edge length. Defaults to 7.
    #[serde(default = "default_board_size")]
    pub board_size: i32,
    /// Rounds played after every tile is revealed. Defaults to 5.
    #[serde(default = "default_escape_rounds")]
    pub escape_rounds: u32,
    /// Tiles dealt onto the board. Defaults to [`TileSet::standard`].
    #[serde(default)]
    pub tiles: TileSet,
}

fn default_board_size() -> i32 {
    Board::STANDARD_SIZE
}

fn default_escape_rounds() -> u32 {
    5
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_size: default_board_size(),
            escape_rounds: default_escape_rounds(),
            tiles: TileSet::standard(),
        }
    }
}

impl GameConfig {
    /// Parses and validates a configuration.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML, or one of the
    /// validation errors described on [`Self::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Number of tiles a board of this size holds.
    ///
    /// Fails with [`ConfigError::BoardSize`] for sizes outside the
    /// supported range.
    pub fn cell_count(&self) -> Result<usize, ConfigError> {
        let size = self.board_size;
        if !(3..=Board::MAX_SIZE).contains(&size) || size % 2 == 0 {
            return Err(ConfigError::BoardSize(size));
        }
        size.checked_mul(size)
            .and_then(|cells| cells.checked_sub(1))
            .and_then(|cells| usize::try_from(cells).ok())
            .ok_or(ConfigError::BoardSize(size))
    }

    /// Checks that the settings describe a playable game.
    ///
    /// The board must be odd-sized so it has a center, the tile set must
    /// fill every other cell, and only hunters may carry a facing. Counts
    /// are compared before the tile set is expanded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let expected = self.cell_count()?;
        let found = self
            .tiles
            .checked_len()
            .ok_or(ConfigError::TooManyTiles { max: expected })?;
        if found != expected {
            return Err(ConfigError::TileCount {
                size: self.board_size,
                expected,
                found,
            });
        }
        self.tiles.kinds()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tileset::TileGroup;
    use forest_core::Direction;

    #[test]
    fn default_is_standard_game() {
        let config = GameConfig::default();
        assert_eq!(config.board_size, 7);
        assert_eq!(config.escape_rounds, 5);
        assert_eq!(config.cell_count().unwrap(), 48);
        config.validate().unwrap();
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = GameConfig::from_toml_str("").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn parse_small_board() {
        let content = r#"
board_size = 3
escape_rounds = 2

[[tiles]]
kind = "bear"
count = 2

[[tiles]]
kind = "hunter"
facing = "west"
count = 2

[[tiles]]
kind = "tree"
count = 4
"#;
        let config = GameConfig::from_toml_str(content).unwrap();
        assert_eq!(config.board_size, 3);
        assert_eq!(config.escape_rounds, 2);
        assert_eq!(config.tiles.len(), 8);
        assert_eq!(
            config.tiles.groups()[1],
            TileGroup::facing(Species::Hunter, Direction::West, 2)
        );
    }

    #[test]
    fn rejects_even_board() {
        let err = GameConfig::from_toml_str("board_size = 6").unwrap_err();
        assert!(matches!(err, ConfigError::BoardSize(6)));
    }

    #[test]
    fn rejects_oversized_board() {
        let err = GameConfig::from_toml_str("board_size = 65537").unwrap_err();
        assert!(matches!(err, ConfigError::BoardSize(65537)));
        let err = GameConfig::from_toml_str("board_size = 257").unwrap_err();
        assert!(matches!(err, ConfigError::BoardSize(257)));
        let err = GameConfig::from_toml_str("board_size = -7").unwrap_err();
        assert!(matches!(err, ConfigError::BoardSize(-7)));
    }

    #[test]
    fn largest_board_size_is_accepted() {
        let config = GameConfig {
            board_size: 255,
            escape_rounds: 1,
            tiles: TileSet::new(vec![TileGroup::new(Species::Tree, 255 * 255 - 1)]),
        };
        assert_eq!(config.cell_count().unwrap(), 65024);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_overflowing_tile_counts() {
        let content = r#"
[[tiles]]
kind = "tree"
count = 9000000000000000000

[[tiles]]
kind = "duck"
count = 9000000000000000000

[[tiles]]
kind = "pheasant"
count = 9000000000000000000
"#;
        let err = GameConfig::from_toml_str(content).unwrap_err();
        assert!(matches!(err, ConfigError::TooManyTiles { .. }));
    }

    #[test]
    fn rejects_huge_tile_group_without_expanding_it() {
        let content = r#"
[[tiles]]
kind = "tree"
count = 9000000000000000000
"#;
        let err = GameConfig::from_toml_str(content).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TileCount {
                size: 7,
                expected: 48,
                found: 9_000_000_000_000_000_000
            }
        ));
    }

    #[test]
    fn rejects_tile_count_mismatch() {
        let err = GameConfig::from_toml_str("board_size = 5").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TileCount {
                size: 5,
                expected: 24,
                found: 48
            }
        ));
    }

    #[test]
    fn rejects_invalid_toml() {
        let err = GameConfig::from_toml_str("board_size = [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_missing_file() {
        let err = GameConfig::load("/nonexistent/forest.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn serializes_back_to_toml() {
        let config = GameConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(GameConfig::from_toml_str(&text).unwrap(), config);
    }
}
