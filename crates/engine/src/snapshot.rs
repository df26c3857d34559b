//! Serializable view of the whole table, in the JSON shape a move-suggestion
//! service expects: `{players, factories, center, currentPlayerIndex, round}`.

use serde::{Deserialize, Serialize};

use crate::board::{line_capacity, PlayerBoard};
use crate::game::Game;
use crate::pool::Factory;
use crate::types::{PlayerIdx, Tile};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub players: Vec<PlayerSnapshot>,
    pub factories: Vec<Factory>,
    pub center: Vec<Tile>,
    pub current_player_index: PlayerIdx,
    pub round: u16,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: PlayerIdx,
    pub name: String,
    pub score: u32,
    pub board: BoardSnapshot,
}

/// Board as nested lists. Wall rows have 5 cells; pattern line `i` has `i + 1`
/// cells, filled from the left.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub wall: Vec<Vec<Option<Tile>>>,
    pub pattern_lines: Vec<Vec<Option<Tile>>>,
    pub floor_line: Vec<Tile>,
}

impl From<&PlayerBoard> for BoardSnapshot {
    fn from(board: &PlayerBoard) -> Self {
        let wall = board
            .wall
            .iter()
            .map(|row| row.iter().map(|cell| cell.map(Tile::new)).collect())
            .collect();

        let pattern_lines = board
            .pattern_lines
            .iter()
            .enumerate()
            .map(|(row, line)| {
                (0..line_capacity(row))
                    .map(|slot| match line.color {
                        Some(color) if slot < line.count => Some(Tile::new(color)),
                        _ => None,
                    })
                    .collect()
            })
            .collect();

        BoardSnapshot {
            wall,
            pattern_lines,
            floor_line: board.floor_line.clone(),
        }
    }
}

impl Game {
    /// Capture the table for a suggestion request or an external view.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            players: self
                .players()
                .iter()
                .map(|p| PlayerSnapshot {
                    id: p.id,
                    name: p.name.clone(),
                    score: p.score,
                    board: BoardSnapshot::from(&p.board),
                })
                .collect(),
            factories: self.factories().to_vec(),
            center: self.center().to_vec(),
            current_player_index: self.current_player_index(),
            round: self.round(),
        }
    }
}
