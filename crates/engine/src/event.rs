//! Change notifications. The controller queues one event per observable state
//! change; a UI drains the queue after each call and redraws what changed.

use serde::Serialize;

use crate::pool::DraftSource;
use crate::types::{Col, Color, PlayerIdx, Row};

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    TilesSelected {
        player: PlayerIdx,
        source: DraftSource,
        color: Color,
        count: usize,
    },
    SelectionCancelled {
        player: PlayerIdx,
        source: DraftSource,
        color: Color,
    },
    TilesPlaced {
        player: PlayerIdx,
        row: Row,
        color: Color,
        placed: usize,
        overflowed: usize,
    },
    TilesFloored {
        player: PlayerIdx,
        count: usize,
    },
    /// `player` is now the active player
    TurnPassed {
        player: PlayerIdx,
    },
    /// The pool is empty; `next_round` will score it
    RoundEnded {
        round: u16,
    },
    WallTilePlaced {
        player: PlayerIdx,
        row: Row,
        col: Col,
        color: Color,
        points: u32,
    },
    WallContention {
        player: PlayerIdx,
        row: Row,
    },
    FloorPenalty {
        player: PlayerIdx,
        tiles: usize,
        points: i16,
    },
    RoundStarted {
        round: u16,
    },
    GameOver {
        winner: PlayerIdx,
        score: u32,
    },
}
