use std::fmt::Write as _;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use mosaic_engine::{
    line_capacity, Color, DraftSource, Game, GameError, MoveSuggestion, Phase, RuleOptions,
    SuggestionOutcome, BOARD_SIZE, WALL_PATTERN,
};

fn color_slug(color: Color) -> &'static str {
    match color {
        Color::Blue => "blue",
        Color::Yellow => "amber",
        Color::Red => "rose",
        Color::Black => "zinc",
        Color::White => "slate",
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Drafting => "drafting",
        Phase::Placing => "placing",
        Phase::RoundEnd => "round_end",
        Phase::GameOver => "game_over",
    }
}

fn js_error(e: GameError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn render_game_text(game: &Game) -> String {
    let mut out = String::new();
    let _ = writeln!(
        &mut out,
        "Round {} | Current Player: {}",
        game.round(),
        game.current_player().name
    );
    let _ = writeln!(&mut out);

    let _ = writeln!(&mut out, "Factories:");
    for factory in game.factories() {
        let _ = write!(&mut out, "  F{}: ", factory.id);
        if factory.is_empty() {
            let _ = writeln!(&mut out, "(empty)");
        } else {
            for tile in &factory.tiles {
                let _ = write!(&mut out, "{} ", tile.color.letter());
            }
            let _ = writeln!(&mut out);
        }
    }

    let _ = write!(&mut out, "\nCenter: ");
    if game.center().is_empty() {
        let _ = writeln!(&mut out, "(empty)");
    } else {
        for tile in game.center() {
            let _ = write!(&mut out, "{} ", tile.color.letter());
        }
        let _ = writeln!(&mut out);
    }
    let _ = writeln!(&mut out);

    for player in game.players() {
        let marker = if player.id == game.current_player_index() { ">" } else { " " };
        let _ = writeln!(&mut out, "{} {} (Score: {})", marker, player.name, player.score);
        let _ = writeln!(&mut out, "  Pattern Lines          Wall");

        let board = &player.board;
        for (row, (line, (wall_row, pattern_row))) in board
            .pattern_lines
            .iter()
            .zip(board.wall.iter().zip(WALL_PATTERN.iter()))
            .enumerate()
        {
            let cap = row + 1;
            let _ = write!(&mut out, "  ");
            for _ in 0..(BOARD_SIZE - cap) {
                let _ = write!(&mut out, "  ");
            }
            for _ in 0..(cap - line.count as usize) {
                let _ = write!(&mut out, ". ");
            }
            if let Some(color) = line.color {
                for _ in 0..line.count {
                    let _ = write!(&mut out, "{} ", color.letter());
                }
            }

            let _ = write!(&mut out, " -> ");

            // Empty cells show the expected color in lowercase
            for (cell, &expected) in wall_row.iter().zip(pattern_row.iter()) {
                match cell {
                    Some(color) => {
                        let _ = write!(&mut out, "{} ", color.letter());
                    }
                    None => {
                        let _ = write!(&mut out, "{} ", expected.letter().to_ascii_lowercase());
                    }
                }
            }
            let _ = writeln!(&mut out);
        }

        let _ = write!(&mut out, "  Floor: ");
        if board.floor_line.is_empty() {
            let _ = writeln!(&mut out, "(empty)");
        } else {
            for tile in &board.floor_line {
                let _ = write!(&mut out, "{} ", tile.color.letter());
            }
            let _ = writeln!(&mut out);
        }
        let _ = writeln!(&mut out);
    }

    out
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ApplyResultView {
    Placed { row: u8, placed: usize, overflowed: usize },
    Floored { count: usize },
    FlooredAfterRejection { count: usize, reason: String },
}

impl From<SuggestionOutcome> for ApplyResultView {
    fn from(outcome: SuggestionOutcome) -> Self {
        match outcome {
            SuggestionOutcome::Placed { row, placed, overflowed } => ApplyResultView::Placed {
                row,
                placed,
                overflowed,
            },
            SuggestionOutcome::Floored { count } => ApplyResultView::Floored { count },
            SuggestionOutcome::FlooredAfterRejection { count, reason } => {
                ApplyResultView::FlooredAfterRejection {
                    count,
                    reason: reason.to_string(),
                }
            }
        }
    }
}

#[derive(Serialize)]
struct TileView {
    color: String,
    selected: bool,
}

#[derive(Serialize)]
struct PatternLineView {
    color: Option<String>,
    count: u8,
    capacity: u8,
}

#[derive(Serialize)]
struct PlayerView {
    name: String,
    pattern_lines: Vec<PatternLineView>,
    wall: Vec<Vec<Option<String>>>,
    floor: Vec<String>,
    score: u32,
}

#[derive(Serialize)]
struct SelectionView {
    source: DraftSource,
    color: String,
    count: usize,
}

#[derive(Serialize)]
struct GameStateView {
    phase: &'static str,
    current_player: u8,
    round: u16,
    revision: u64,
    factories: Vec<Vec<TileView>>,
    center: Vec<TileView>,
    selection: Option<SelectionView>,
    players: Vec<PlayerView>,
    winner: Option<u8>,
}

fn tile_views<'a>(tiles: impl IntoIterator<Item = &'a mosaic_engine::Tile>) -> Vec<TileView> {
    tiles
        .into_iter()
        .map(|t| TileView {
            color: color_slug(t.color).to_string(),
            selected: t.selected,
        })
        .collect()
}

fn build_view(game: &Game) -> GameStateView {
    let players = game
        .players()
        .iter()
        .map(|player| {
            let board = &player.board;
            let pattern_lines = board
                .pattern_lines
                .iter()
                .enumerate()
                .map(|(r, line)| PatternLineView {
                    color: line.color.map(|c| color_slug(c).to_string()),
                    count: line.count,
                    capacity: line_capacity(r),
                })
                .collect();

            let wall = board
                .wall
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| cell.map(|c| color_slug(c).to_string()))
                        .collect()
                })
                .collect();

            PlayerView {
                name: player.name.clone(),
                pattern_lines,
                wall,
                floor: board
                    .floor_line
                    .iter()
                    .map(|t| color_slug(t.color).to_string())
                    .collect(),
                score: player.score,
            }
        })
        .collect();

    GameStateView {
        phase: phase_name(game.phase()),
        current_player: game.current_player_index(),
        round: game.round(),
        revision: game.revision(),
        factories: game.factories().iter().map(|f| tile_views(&f.tiles)).collect(),
        center: tile_views(game.center()),
        selection: game.selection().map(|s| SelectionView {
            source: s.source,
            color: color_slug(s.color).to_string(),
            count: s.len(),
        }),
        players,
        winner: game.outcome().map(|o| o.winner),
    }
}

#[wasm_bindgen]
pub struct GameHandle {
    game: Game,
}

#[wasm_bindgen]
impl GameHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(player_names: Vec<String>, seed: u64) -> Result<GameHandle, JsValue> {
        let rng = StdRng::seed_from_u64(seed);
        let game = Game::with_rng(player_names, RuleOptions::default(), rng).map_err(js_error)?;
        Ok(GameHandle { game })
    }

    #[wasm_bindgen]
    pub fn clone_handle(&self) -> GameHandle {
        GameHandle {
            game: self.game.clone(),
        }
    }

    #[wasm_bindgen]
    pub fn current_player(&self) -> u8 {
        self.game.current_player_index()
    }

    #[wasm_bindgen]
    pub fn is_game_over(&self) -> bool {
        self.game.phase() == Phase::GameOver
    }

    #[wasm_bindgen]
    pub fn round(&self) -> u16 {
        self.game.round()
    }

    #[wasm_bindgen]
    pub fn revision(&self) -> u64 {
        self.game.revision()
    }

    #[wasm_bindgen]
    pub fn scores(&self) -> Vec<u32> {
        self.game.players().iter().map(|p| p.score).collect()
    }

    /// `factory_id` of `undefined` drafts from the center. Returns the number of
    /// tiles selected.
    #[wasm_bindgen]
    pub fn select_tiles(&mut self, color: &str, factory_id: Option<u8>) -> Result<usize, JsValue> {
        let color: Color = color.parse().map_err(js_error)?;
        self.game
            .select_tiles(color, factory_id)
            .map(|tiles| tiles.len())
            .map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn cancel_selection(&mut self) -> Result<(), JsValue> {
        self.game.cancel_selection().map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn place_selection(&mut self, row: u8) -> Result<JsValue, JsValue> {
        let report = self.game.place_selection(row).map_err(js_error)?;
        serde_wasm_bindgen::to_value(&report)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize placement: {e}")))
    }

    #[wasm_bindgen]
    pub fn discard_selection(&mut self) -> Result<usize, JsValue> {
        self.game.discard_selection().map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn next_round(&mut self) -> Result<JsValue, JsValue> {
        let summary = self.game.next_round().map_err(js_error)?;
        serde_wasm_bindgen::to_value(&summary)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize round summary: {e}")))
    }

    #[wasm_bindgen]
    pub fn render_text(&self) -> String {
        render_game_text(&self.game)
    }

    #[wasm_bindgen]
    pub fn state_view(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&build_view(&self.game))
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize state: {e}")))
    }

    /// JSON body for the move-suggestion service
    #[wasm_bindgen]
    pub fn suggestion_request(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.snapshot())
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize request: {e}")))
    }

    /// Apply a `{factoryId, color, patternLine}` response from the service.
    #[wasm_bindgen]
    pub fn apply_suggestion(&mut self, response: &str) -> Result<JsValue, JsValue> {
        let suggestion: MoveSuggestion = serde_json::from_str(response)
            .map_err(|e| JsValue::from_str(&format!("Malformed suggestion: {e}")))?;
        let outcome = self.game.apply_suggestion(&suggestion).map_err(js_error)?;

        serde_wasm_bindgen::to_value(&ApplyResultView::from(outcome))
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize outcome: {e}")))
    }

    #[wasm_bindgen]
    pub fn drain_events(&mut self) -> Result<JsValue, JsValue> {
        let events = self.game.drain_events();
        serde_wasm_bindgen::to_value(&events)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize events: {e}")))
    }

    #[wasm_bindgen]
    pub fn legal_moves(&self) -> Result<JsValue, JsValue> {
        let moves: Vec<MoveSuggestion> = self
            .game
            .legal_moves()
            .into_iter()
            .map(MoveSuggestion::from)
            .collect();
        serde_wasm_bindgen::to_value(&moves)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize moves: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        Game::with_rng(["Ada", "Grace"], RuleOptions::default(), StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn test_view_tracks_selection() {
        let mut game = game();
        let color = game.factories()[0].tiles[0].color;
        game.select_tiles(color, Some(0)).unwrap();

        let view = serde_json::to_value(build_view(&game)).unwrap();

        assert_eq!(view["phase"], "placing");
        assert_eq!(view["selection"]["color"], color_slug(color));
        assert_eq!(view["factories"][0].as_array().unwrap().len(), 0);
        assert_eq!(view["players"][1]["name"], "Grace");
        assert_eq!(view["players"][0]["pattern_lines"][4]["capacity"], 5);
        assert!(view["winner"].is_null());
    }

    #[test]
    fn test_render_text_lists_every_factory() {
        let text = render_game_text(&game());

        assert!(text.starts_with("Round 1 | Current Player: Ada"));
        for id in 0..5 {
            assert!(text.contains(&format!("F{id}: ")));
        }
        assert!(text.contains("> Ada (Score: 0)"));
        assert!(text.contains("Center: (empty)"));
    }

    #[test]
    fn test_apply_result_view_shape() {
        let view = ApplyResultView::from(SuggestionOutcome::Floored { count: 3 });
        let json = serde_json::to_value(view).unwrap();
        assert_eq!(json["kind"], "floored");
        assert_eq!(json["count"], 3);
    }
}
