//! Automated move selection.
//!
//! A suggester looks at the table and proposes one move in the wire shape of
//! the suggestion service (`{factoryId, color, patternLine}`). The game applies
//! it through the same select/place calls a human would use.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GameError, RuleViolation};
use crate::game::{Destination, Game, Move};
use crate::pool::DraftSource;
use crate::types::{Color, FactoryId, Row, BOARD_SIZE};

/// `patternLine` value meaning the floor line
pub const FLOOR_LINE: i8 = -1;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSuggestion {
    /// `None` drafts from the center
    pub factory_id: Option<FactoryId>,
    pub color: Color,
    /// 0..=4, or `FLOOR_LINE`
    pub pattern_line: i8,
}

impl MoveSuggestion {
    pub fn to_move(&self) -> Result<Move, GameError> {
        let dest = match self.pattern_line {
            FLOOR_LINE => Destination::Floor,
            row if (0..BOARD_SIZE as i8).contains(&row) => Destination::PatternLine(row as Row),
            row => return Err(GameError::RowOutOfRange(row as i16)),
        };
        Ok(Move {
            source: DraftSource::from_factory_id(self.factory_id),
            color: self.color,
            dest,
        })
    }
}

impl From<Move> for MoveSuggestion {
    fn from(mv: Move) -> Self {
        MoveSuggestion {
            factory_id: mv.source.factory_id(),
            color: mv.color,
            pattern_line: match mv.dest {
                Destination::PatternLine(row) => row as i8,
                Destination::Floor => FLOOR_LINE,
            },
        }
    }
}

/// How a suggestion ended up being applied
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SuggestionOutcome {
    Placed { row: Row, placed: usize, overflowed: usize },
    /// The suggestion asked for the floor line
    Floored { count: usize },
    /// The suggested row broke a placement rule; tiles went to the floor
    FlooredAfterRejection { count: usize, reason: RuleViolation },
}

impl Game {
    /// Play a suggested move for the current player.
    ///
    /// A suggestion whose row breaks a placement rule is not an error: the
    /// drafted tiles go to the floor line instead. Any other problem (bad
    /// factory, absent color, wrong phase) is returned and nothing changes.
    pub fn apply_suggestion(
        &mut self,
        suggestion: &MoveSuggestion,
    ) -> Result<SuggestionOutcome, GameError> {
        let mv = suggestion.to_move()?;
        self.select_tiles(mv.color, mv.source.factory_id())?;

        let row = match mv.dest {
            Destination::Floor => {
                let count = self.discard_selection()?;
                return Ok(SuggestionOutcome::Floored { count });
            }
            Destination::PatternLine(row) => row,
        };

        match self.place_selection(row) {
            Ok(report) => Ok(SuggestionOutcome::Placed {
                row,
                placed: report.placed,
                overflowed: report.overflowed,
            }),
            Err(GameError::Rule(reason)) => {
                warn!(%reason, row, "suggested placement rejected; flooring tiles");
                let count = self.discard_selection()?;
                Ok(SuggestionOutcome::FlooredAfterRejection { count, reason })
            }
            Err(e) => {
                self.cancel_selection()?;
                Err(e)
            }
        }
    }
}

/// Source of automated moves
pub trait MoveSuggester {
    fn name(&self) -> &str;

    /// Propose a move for the current player, or `None` if there is nothing
    /// to draft.
    fn suggest(&mut self, game: &Game) -> Option<MoveSuggestion>;
}

/// Picks uniformly among the legal moves
pub struct RandomSuggester {
    rng: StdRng,
}

impl RandomSuggester {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl MoveSuggester for RandomSuggester {
    fn name(&self) -> &str {
        "random"
    }

    fn suggest(&mut self, game: &Game) -> Option<MoveSuggestion> {
        let moves = game.legal_moves();
        if moves.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..moves.len());
        Some(moves[idx].into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::TileBag;
    use crate::config::RuleOptions;
    use crate::game::Phase;
    use crate::types::wall_column;

    fn game() -> Game {
        let bag = TileBag::from_order(
            [Color::Blue, Color::Blue, Color::Black, Color::Yellow]
                .into_iter()
                .cycle()
                .take(100)
                .collect(),
        );
        Game::with_bag(["a", "b"], RuleOptions::default(), bag, StdRng::seed_from_u64(9)).unwrap()
    }

    #[test]
    fn test_suggestion_wire_shape() {
        let parsed: MoveSuggestion =
            serde_json::from_str(r#"{"factoryId": null, "color": "red", "patternLine": -1}"#)
                .unwrap();
        assert_eq!(
            parsed.to_move().unwrap(),
            Move {
                source: DraftSource::Center,
                color: Color::Red,
                dest: Destination::Floor,
            }
        );

        let json = serde_json::to_string(&MoveSuggestion {
            factory_id: Some(3),
            color: Color::Blue,
            pattern_line: 2,
        })
        .unwrap();
        assert_eq!(json, r#"{"factoryId":3,"color":"blue","patternLine":2}"#);
    }

    #[test]
    fn test_out_of_range_row_is_rejected() {
        let suggestion = MoveSuggestion {
            factory_id: Some(0),
            color: Color::Blue,
            pattern_line: 5,
        };
        assert_eq!(suggestion.to_move(), Err(GameError::RowOutOfRange(5)));

        let mut game = game();
        assert_eq!(game.apply_suggestion(&suggestion), Err(GameError::RowOutOfRange(5)));
        assert_eq!(game.phase(), Phase::Drafting);
        assert_eq!(game.factories()[0].tiles.len(), 4);
    }

    #[test]
    fn test_apply_suggestion_places() {
        let mut game = game();
        let outcome = game
            .apply_suggestion(&MoveSuggestion {
                factory_id: Some(0),
                color: Color::Blue,
                pattern_line: 1,
            })
            .unwrap();

        assert_eq!(
            outcome,
            SuggestionOutcome::Placed {
                row: 1,
                placed: 2,
                overflowed: 0
            }
        );
        assert_eq!(game.players()[0].board.pattern_lines[1].count, 2);
        assert_eq!(game.current_player_index(), 1);
    }

    #[test]
    fn test_floor_line_suggestion() {
        let mut game = game();
        let outcome = game
            .apply_suggestion(&MoveSuggestion {
                factory_id: Some(2),
                color: Color::Blue,
                pattern_line: FLOOR_LINE,
            })
            .unwrap();

        assert_eq!(outcome, SuggestionOutcome::Floored { count: 2 });
        assert_eq!(game.players()[0].board.floor_line.len(), 2);
    }

    #[test]
    fn test_rejected_row_falls_back_to_floor() {
        let mut game = game();
        game.select_tiles(Color::Black, Some(0)).unwrap();
        game.place_selection(0).unwrap();
        // Player 0's top line now holds black; blue cannot join it.
        game.select_tiles(Color::Yellow, Some(1)).unwrap();
        game.place_selection(0).unwrap();

        let outcome = game
            .apply_suggestion(&MoveSuggestion {
                factory_id: Some(2),
                color: Color::Blue,
                pattern_line: 0,
            })
            .unwrap();

        assert!(matches!(
            outcome,
            SuggestionOutcome::FlooredAfterRejection {
                count: 2,
                reason: RuleViolation::MixedColors {
                    row: 0,
                    existing: Color::Black,
                    color: Color::Blue
                }
            }
        ));
        assert_eq!(game.players()[0].board.floor_line.len(), 2);
        assert_eq!(game.current_player_index(), 1);
    }

    #[test]
    fn test_bad_source_changes_nothing() {
        let mut game = game();
        let before = game.snapshot();

        let result = game.apply_suggestion(&MoveSuggestion {
            factory_id: Some(0),
            color: Color::Red,
            pattern_line: 3,
        });

        assert!(matches!(result, Err(GameError::ColorNotAvailable { .. })));
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_random_suggester_only_suggests_legal_moves() {
        let mut game = game();
        game.players_mut()[0].board.wall[2][wall_column(2, Color::Blue)] =
            Some(Color::Blue);
        let mut suggester = RandomSuggester::new(17);

        for _ in 0..50 {
            let suggestion = suggester.suggest(&game).unwrap();
            let mv = suggestion.to_move().unwrap();
            assert!(game.legal_moves().contains(&mv));
            assert_ne!(
                (mv.color, mv.dest),
                (Color::Blue, Destination::PatternLine(2))
            );
        }
    }

    #[test]
    fn test_random_suggester_plays_a_full_game() {
        let mut game =
            Game::with_rng(["a", "b"], RuleOptions::default(), StdRng::seed_from_u64(21)).unwrap();
        let mut suggester = RandomSuggester::new(5);

        for _ in 0..10_000 {
            match game.phase() {
                Phase::GameOver => break,
                Phase::RoundEnd => {
                    game.next_round().unwrap();
                }
                _ => {
                    let suggestion = suggester.suggest(&game).unwrap();
                    assert!(!matches!(
                        game.apply_suggestion(&suggestion).unwrap(),
                        SuggestionOutcome::FlooredAfterRejection { .. }
                    ));
                }
            }
        }

        assert_eq!(game.phase(), Phase::GameOver);
        assert!(suggester.suggest(&game).is_none());
    }
}
