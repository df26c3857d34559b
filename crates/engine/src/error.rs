use thiserror::Error;

use crate::game::Phase;
use crate::pool::DraftSource;
use crate::types::{Color, FactoryId, PlayerIdx, Row};

/// A placement the rules do not allow. Returned from the placement pre-check;
/// the board is left untouched.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum RuleViolation {
    #[error("{color} is already on wall row {row}")]
    ColorOnWall { color: Color, row: Row },
    #[error("pattern line {row} already holds {existing}, cannot add {color}")]
    MixedColors {
        row: Row,
        existing: Color,
        color: Color,
    },
    #[error("pattern line {row} is full")]
    LineFull { row: Row },
}

/// Every way a requested action can be rejected. None of these are fatal; the
/// game state is unchanged whenever one is returned.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum GameError {
    #[error(transparent)]
    Rule(#[from] RuleViolation),
    #[error("factory {0} not found")]
    FactoryNotFound(FactoryId),
    #[error("player {0} not found")]
    PlayerNotFound(PlayerIdx),
    #[error("row {0} is out of range")]
    RowOutOfRange(i16),
    #[error("no {color} tiles available at {from}")]
    ColorNotAvailable { color: Color, from: DraftSource },
    #[error("action requires phase {expected:?}, game is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },
    #[error("round still has tiles to draft")]
    RoundInProgress,
    #[error("no tiles to place")]
    NothingToPlace,
    #[error("a game needs 2 to 4 players, got {0}")]
    InvalidPlayerCount(usize),
    #[error("unknown color {0:?}")]
    UnknownColor(String),
}
