//! Mosaic game engine
//!
//! Rules engine for the tile-drafting board game Azul. A single [`Game`] owns
//! the bag, the factories and center, and every player board; the UI calls
//! its methods and drains [`GameEvent`]s to learn what changed.
//!
//! A round runs select -> place (or floor) per turn until the factories and
//! center are empty, then [`Game::next_round`] tiles the walls, applies floor
//! penalties and either refills for the next round or ends the game.

pub mod bag;
pub mod board;
pub mod config;
pub mod error;
pub mod event;
pub mod game;
pub mod pool;
pub mod snapshot;
pub mod suggest;
pub mod types;

pub use bag::TileBag;
pub use board::{
    apply_delta, end_game_bonus, floor_penalty, line_capacity, score_placement, PatternLine,
    Placement, Player, PlayerBoard, TilingReport, Wall, WallPlacement,
};
pub use config::{GameConfig, RuleOptions};
pub use error::{GameError, RuleViolation};
pub use event::GameEvent;
pub use game::{
    Destination, Game, GameOutcome, Move, Phase, PlayerRoundSummary, RoundSummary, TileCensus,
};
pub use pool::{factory_count_for, DraftPool, DraftSource, Factory, Selection};
pub use snapshot::{BoardSnapshot, GameSnapshot, PlayerSnapshot};
pub use suggest::{MoveSuggester, MoveSuggestion, RandomSuggester, SuggestionOutcome, FLOOR_LINE};
pub use types::*;
