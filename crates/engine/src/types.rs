//! Basic types and constants shared by every part of the engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Index into the players list: 0..num_players-1
pub type PlayerIdx = u8;

/// Pattern line / wall row index (0..=4)
pub type Row = u8;

/// Wall column index (0..=4)
pub type Col = u8;

/// Factory identifier, 0..num_factories-1
pub type FactoryId = u8;

pub const BOARD_SIZE: usize = 5;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;
pub const FACTORY_CAPACITY: usize = 4;
pub const TILE_COLORS: usize = 5;
pub const TILES_PER_COLOR: usize = 20;
pub const TOTAL_TILES: usize = TILE_COLORS * TILES_PER_COLOR;

/// Floor penalties (fixed table). Tiles past the last slot cost nothing extra.
pub const FLOOR_PENALTY: [i16; 7] = [-1, -1, -2, -2, -2, -3, -3];

/// Number of floor positions that carry a penalty
pub const FLOOR_CAPACITY: usize = FLOOR_PENALTY.len();

/// Tile colors (order fixed for serialization)
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue = 0,
    Yellow = 1,
    Red = 2,
    Black = 3,
    White = 4,
}

impl Color {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Red => "red",
            Color::Black => "black",
            Color::White => "white",
        }
    }

    /// Single-letter code; black is `k` so it does not clash with blue.
    pub fn letter(self) -> char {
        match self {
            Color::Blue => 'B',
            Color::Yellow => 'Y',
            Color::Red => 'R',
            Color::Black => 'K',
            Color::White => 'W',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let color = match lowered.as_str() {
            "blue" | "b" => Color::Blue,
            "yellow" | "y" => Color::Yellow,
            "red" | "r" => Color::Red,
            "black" | "k" => Color::Black,
            "white" | "w" => Color::White,
            _ => return Err(GameError::UnknownColor(s.to_string())),
        };
        Ok(color)
    }
}

pub const ALL_COLORS: [Color; TILE_COLORS] = [
    Color::Blue,
    Color::Yellow,
    Color::Red,
    Color::Black,
    Color::White,
];

/// Wall pattern: WALL_PATTERN[row][col] = Color at that position.
/// Each row is the color sequence shifted one step to the right.
pub const WALL_PATTERN: [[Color; BOARD_SIZE]; BOARD_SIZE] = [
    [Color::Blue, Color::Yellow, Color::Red, Color::Black, Color::White],
    [Color::White, Color::Blue, Color::Yellow, Color::Red, Color::Black],
    [Color::Black, Color::White, Color::Blue, Color::Yellow, Color::Red],
    [Color::Red, Color::Black, Color::White, Color::Blue, Color::Yellow],
    [Color::Yellow, Color::Red, Color::Black, Color::White, Color::Blue],
];

/// Destination column lookup: WALL_DEST_COL[row][color_index] => col
pub const WALL_DEST_COL: [[Col; TILE_COLORS]; BOARD_SIZE] = [
    // row 0: Blue=0, Yellow=1, Red=2, Black=3, White=4
    [0, 1, 2, 3, 4],
    [1, 2, 3, 4, 0],
    [2, 3, 4, 0, 1],
    [3, 4, 0, 1, 2],
    [4, 0, 1, 2, 3],
];

/// Column a color occupies on the given wall row.
#[inline]
pub fn wall_column(row: usize, color: Color) -> usize {
    WALL_DEST_COL[row][color.index()] as usize
}

/// A single tile. `selected` is only true while the tile sits in a
/// pending selection.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub color: Color,
    pub selected: bool,
}

impl Tile {
    pub fn new(color: Color) -> Self {
        Tile {
            color,
            selected: false,
        }
    }

    pub fn selected(self) -> Self {
        Tile {
            selected: true,
            ..self
        }
    }

    pub fn released(self) -> Self {
        Tile {
            selected: false,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_dest_col_matches_pattern() {
        for row in 0..BOARD_SIZE {
            for color in ALL_COLORS {
                let col = wall_column(row, color);
                assert_eq!(WALL_PATTERN[row][col], color);
            }
        }
    }

    #[test]
    fn test_each_row_is_a_shift_of_the_first() {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let source_col = (col + BOARD_SIZE - row) % BOARD_SIZE;
                assert_eq!(WALL_PATTERN[row][col], WALL_PATTERN[0][source_col]);
            }
        }
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("Blue".parse::<Color>().unwrap(), Color::Blue);
        assert_eq!("k".parse::<Color>().unwrap(), Color::Black);
        assert_eq!(" white ".parse::<Color>().unwrap(), Color::White);
        assert!(matches!(
            "teal".parse::<Color>(),
            Err(GameError::UnknownColor(_))
        ));
    }

    #[test]
    fn test_color_serializes_lowercase() {
        let json = serde_json::to_string(&Tile::new(Color::Yellow)).unwrap();
        assert_eq!(json, r#"{"color":"yellow","selected":false}"#);
    }
}
