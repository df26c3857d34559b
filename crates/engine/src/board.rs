//! Player boards: wall, pattern lines, floor line, and the scoring rules that
//! act on them.

use serde::{Deserialize, Serialize};

use crate::error::RuleViolation;
use crate::types::{
    wall_column, Color, PlayerIdx, Row, Tile, ALL_COLORS, BOARD_SIZE, FLOOR_PENALTY,
};

/// Wall: 5x5 grid, each cell either empty (None) or occupied by a color
pub type Wall = [[Option<Color>; BOARD_SIZE]; BOARD_SIZE];

/// A single pattern line (one of 5 rows, capacities 1-5)
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PatternLine {
    pub color: Option<Color>, // None => empty; Some(c) => all tiles are c
    pub count: u8,            // 0..=capacity(row)
}

/// Capacity of the pattern line on `row`
#[inline]
pub fn line_capacity(row: usize) -> u8 {
    (row + 1) as u8
}

impl PatternLine {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self, row: usize) -> bool {
        self.count >= line_capacity(row)
    }

    fn clear(&mut self) {
        *self = PatternLine::default();
    }
}

/// Result of `PlayerBoard::place_tiles`
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Tiles that landed in the pattern line
    pub placed: usize,
    /// Tiles that overflowed to the floor line
    pub overflowed: usize,
}

/// A tile moved from a completed pattern line onto the wall
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WallPlacement {
    pub row: Row,
    pub col: u8,
    pub color: Color,
    pub points: u32,
}

/// What end-of-round tiling did to one board
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TilingReport {
    pub placements: Vec<WallPlacement>,
    /// Rows whose wall cell was already taken; their tiles went to the floor
    pub contended_rows: Vec<Row>,
    /// Tiles that leave play (spares of completed lines, cleared lines)
    #[serde(skip)]
    pub spent: Vec<Color>,
}

impl TilingReport {
    pub fn points(&self) -> u32 {
        self.placements.iter().map(|p| p.points).sum()
    }
}

/// Complete board state for one player
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PlayerBoard {
    pub wall: Wall,
    pub pattern_lines: [PatternLine; BOARD_SIZE],
    pub floor_line: Vec<Tile>,
}

impl PlayerBoard {
    /// Check whether `color` may go onto pattern line `row`.
    pub fn check_placement(&self, row: usize, color: Color) -> Result<(), RuleViolation> {
        let r = row as Row;

        // Wall constraint: can't place if color already in wall row
        if self.wall[row][wall_column(row, color)].is_some() {
            return Err(RuleViolation::ColorOnWall { color, row: r });
        }

        let line = &self.pattern_lines[row];
        // Pattern line homogeneity
        if let Some(existing) = line.color {
            if existing != color {
                return Err(RuleViolation::MixedColors {
                    row: r,
                    existing,
                    color,
                });
            }
        }

        // Line not already full
        if line.is_full(row) {
            return Err(RuleViolation::LineFull { row: r });
        }

        Ok(())
    }

    /// Fill empty slots of pattern line `row` with `tiles`, in order. Tiles the
    /// line cannot take go to the floor line: once the line is full, when it
    /// holds another color, or when the slice carries a second color.
    pub fn place_tiles(&mut self, row: usize, tiles: Vec<Tile>) -> Placement {
        let cap = line_capacity(row);
        let line = &mut self.pattern_lines[row];
        let mut report = Placement::default();

        for tile in tiles {
            let tile = tile.released();
            let fits = line.count < cap && line.color.map_or(true, |c| c == tile.color);
            if fits {
                line.color = Some(tile.color);
                line.count += 1;
                report.placed += 1;
            } else {
                self.floor_line.push(tile);
                report.overflowed += 1;
            }
        }

        report
    }

    /// Append tiles to the floor line unconditionally.
    pub fn add_to_floor_line(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.floor_line
            .extend(tiles.into_iter().map(Tile::released));
    }

    /// Move each completed pattern line onto the wall, scoring every placement.
    /// A line whose wall cell is already filled goes to the floor line whole.
    /// With `keep_partial_lines` false every pattern line is cleared; with it
    /// true unfinished lines stay for the next round.
    pub fn tile_wall(&mut self, keep_partial_lines: bool) -> TilingReport {
        let mut report = TilingReport::default();

        for row in 0..BOARD_SIZE {
            let line = self.pattern_lines[row];
            let Some(color) = line.color else {
                continue;
            };

            if !line.is_full(row) {
                if !keep_partial_lines {
                    report
                        .spent
                        .extend(std::iter::repeat(color).take(line.count as usize));
                    self.pattern_lines[row].clear();
                }
                continue;
            }

            let col = wall_column(row, color);
            if self.wall[row][col].is_some() {
                tracing::debug!(row, %color, "wall cell taken; line goes to floor");
                self.floor_line
                    .extend(std::iter::repeat(Tile::new(color)).take(line.count as usize));
                report.contended_rows.push(row as Row);
            } else {
                self.wall[row][col] = Some(color);
                let points = score_placement(&self.wall, row, col);
                report.placements.push(WallPlacement {
                    row: row as Row,
                    col: col as u8,
                    color,
                    points,
                });
                report
                    .spent
                    .extend(std::iter::repeat(color).take(line.count as usize - 1));
            }
            self.pattern_lines[row].clear();
        }

        report
    }

    /// Empty the floor line, returning its tiles.
    pub fn clear_floor_line(&mut self) -> Vec<Tile> {
        std::mem::take(&mut self.floor_line)
    }

    /// Any wall row completely filled
    pub fn has_complete_row(&self) -> bool {
        self.wall.iter().any(|row| row.iter().all(Option::is_some))
    }

    pub fn wall_tile_count(&self) -> usize {
        self.wall.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Tiles sitting in pattern lines and on the floor line
    pub fn staged_tile_count(&self) -> usize {
        self.pattern_lines.iter().map(|l| l.count as usize).sum::<usize>() + self.floor_line.len()
    }
}

/// Points for the tile just placed at (row, col): 1 for the tile, plus the
/// length of each contiguous run of occupied cells leading away from it to the
/// left, right, up and down.
pub fn score_placement(wall: &Wall, row: usize, col: usize) -> u32 {
    let mut points = 1;

    // Left
    let mut c = col;
    while c > 0 && wall[row][c - 1].is_some() {
        c -= 1;
        points += 1;
    }
    // Right
    c = col;
    while c + 1 < BOARD_SIZE && wall[row][c + 1].is_some() {
        c += 1;
        points += 1;
    }
    // Up
    let mut r = row;
    while r > 0 && wall[r - 1][col].is_some() {
        r -= 1;
        points += 1;
    }
    // Down
    r = row;
    while r + 1 < BOARD_SIZE && wall[r + 1][col].is_some() {
        r += 1;
        points += 1;
    }

    points
}

/// Sum of the penalty table over the first `tiles` floor positions (<= 0).
pub fn floor_penalty(tiles: usize) -> i16 {
    FLOOR_PENALTY.iter().take(tiles).sum()
}

/// Add `delta` to `score`, never going below zero.
pub fn apply_delta(score: u32, delta: i32) -> u32 {
    (score as i64 + delta as i64).max(0) as u32
}

/// End-of-game bonus: +2 per complete row, +7 per complete column, +10 per
/// color with all five tiles placed.
pub fn end_game_bonus(wall: &Wall) -> u32 {
    let mut bonus = 0;

    for row in wall.iter() {
        if row.iter().all(Option::is_some) {
            bonus += 2;
        }
    }

    for col in 0..BOARD_SIZE {
        if (0..BOARD_SIZE).all(|row| wall[row][col].is_some()) {
            bonus += 7;
        }
    }

    for color in ALL_COLORS {
        if (0..BOARD_SIZE).all(|row| wall[row][wall_column(row, color)] == Some(color)) {
            bonus += 10;
        }
    }

    bonus
}

/// Identity, name, score and board of one seat
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Player {
    pub id: PlayerIdx,
    pub name: String,
    pub score: u32,
    pub board: PlayerBoard,
}

impl Player {
    pub fn new(id: PlayerIdx, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            score: 0,
            board: PlayerBoard::default(),
        }
    }
}

/// Wall from a `#`/`.` mask, filled cells taking their pattern color
#[cfg(test)]
pub(crate) fn wall_from_mask(mask: [&str; BOARD_SIZE]) -> Wall {
    use crate::types::WALL_PATTERN;

    let mut wall: Wall = [[None; BOARD_SIZE]; BOARD_SIZE];
    for (row, line) in mask.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            if ch == '#' {
                wall[row][col] = Some(WALL_PATTERN[row][col]);
            }
        }
    }
    wall
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(color: Color, n: usize) -> Vec<Tile> {
        vec![Tile::new(color).selected(); n]
    }

    // =========================================================================
    // Placement scoring
    // =========================================================================

    #[test]
    fn test_score_placement_isolated() {
        let wall = wall_from_mask([".....", ".....", "..#..", ".....", "....."]);
        assert_eq!(score_placement(&wall, 2, 2), 1);
    }

    #[test]
    fn test_score_placement_horizontal() {
        let wall = wall_from_mask([".....", ".....", ".###.", ".....", "....."]);
        assert_eq!(score_placement(&wall, 2, 2), 3);
    }

    #[test]
    fn test_score_placement_cross() {
        let wall = wall_from_mask([".....", "..#..", ".###.", "..#..", "....."]);
        // 1 for the tile, 1 left, 1 right, 1 up, 1 down
        assert_eq!(score_placement(&wall, 2, 2), 5);
    }

    #[test]
    fn test_score_placement_gap_stops_run() {
        // Row 2 holds columns 0, 1, 3 and 2 has just been placed: the row is
        // now 0..=3 contiguous, column 4 empty.
        let wall = wall_from_mask([".....", ".....", "####.", ".....", "....."]);
        // 1 + left run (cols 1, 0) + right run (col 3)
        assert_eq!(score_placement(&wall, 2, 2), 4);

        // With column 1 empty the left run is broken immediately.
        let wall = wall_from_mask([".....", ".....", "#.##.", ".....", "....."]);
        assert_eq!(score_placement(&wall, 2, 2), 2);
    }

    #[test]
    fn test_score_placement_edges() {
        let wall = wall_from_mask(["##...", "#....", "#....", ".....", "....."]);
        // Corner tile: 1 right, 2 down
        assert_eq!(score_placement(&wall, 0, 0), 4);

        let wall = wall_from_mask(["....#", "....#", "....#", "....#", "#####"]);
        // Bottom-right corner: 4 left, 4 up
        assert_eq!(score_placement(&wall, 4, 4), 9);
    }

    // =========================================================================
    // Floor penalties
    // =========================================================================

    #[test]
    fn test_floor_penalty_partial() {
        assert_eq!(floor_penalty(0), 0);
        assert_eq!(floor_penalty(3), -1 - 1 - 2);
    }

    #[test]
    fn test_floor_penalty_capped() {
        let full: i16 = FLOOR_PENALTY.iter().sum();
        assert_eq!(full, -14);
        assert_eq!(floor_penalty(7), full);
        assert_eq!(floor_penalty(9), full);
    }

    #[test]
    fn test_score_never_negative() {
        assert_eq!(apply_delta(3, floor_penalty(9) as i32), 0);
        assert_eq!(apply_delta(20, floor_penalty(9) as i32), 6);
        assert_eq!(apply_delta(0, 5), 5);
    }

    // =========================================================================
    // Placement checks
    // =========================================================================

    #[test]
    fn test_check_placement_rejects_color_on_wall_for_every_cell() {
        for row in 0..BOARD_SIZE {
            for color in ALL_COLORS {
                let mut board = PlayerBoard::default();
                board.wall[row][wall_column(row, color)] = Some(color);
                assert_eq!(
                    board.check_placement(row, color),
                    Err(RuleViolation::ColorOnWall {
                        color,
                        row: row as Row
                    })
                );
                for other in ALL_COLORS.into_iter().filter(|&c| c != color) {
                    assert!(board.check_placement(row, other).is_ok());
                }
            }
        }
    }

    #[test]
    fn test_check_placement_mixed_and_full() {
        let mut board = PlayerBoard::default();
        board.place_tiles(2, tiles(Color::Red, 1));

        assert!(board.check_placement(2, Color::Red).is_ok());
        assert_eq!(
            board.check_placement(2, Color::Blue),
            Err(RuleViolation::MixedColors {
                row: 2,
                existing: Color::Red,
                color: Color::Blue
            })
        );

        board.place_tiles(0, tiles(Color::Blue, 1));
        assert_eq!(
            board.check_placement(0, Color::Blue),
            Err(RuleViolation::LineFull { row: 0 })
        );
    }

    // =========================================================================
    // Placing tiles
    // =========================================================================

    #[test]
    fn test_place_tiles_overflow_to_floor() {
        let mut board = PlayerBoard::default();
        let report = board.place_tiles(1, tiles(Color::Yellow, 4));

        assert_eq!(report, Placement { placed: 2, overflowed: 2 });
        assert_eq!(
            board.pattern_lines[1],
            PatternLine {
                color: Some(Color::Yellow),
                count: 2
            }
        );
        assert_eq!(board.floor_line.len(), 2);
        assert!(board.floor_line.iter().all(|t| !t.selected));
    }

    #[test]
    fn test_place_tiles_never_mixes_colors() {
        let mut board = PlayerBoard::default();
        board.place_tiles(3, tiles(Color::Black, 1));
        let report = board.place_tiles(3, tiles(Color::White, 2));

        assert_eq!(report, Placement { placed: 0, overflowed: 2 });
        assert_eq!(board.pattern_lines[3].color, Some(Color::Black));
        assert_eq!(board.pattern_lines[3].count, 1);
    }

    #[test]
    fn test_add_to_floor_line_is_unbounded() {
        let mut board = PlayerBoard::default();
        board.add_to_floor_line(tiles(Color::Red, 10));
        assert_eq!(board.floor_line.len(), 10);
    }

    // =========================================================================
    // Wall tiling
    // =========================================================================

    #[test]
    fn test_tile_wall_moves_completed_lines() {
        let mut board = PlayerBoard::default();
        board.place_tiles(0, tiles(Color::Blue, 1));
        board.place_tiles(1, tiles(Color::Blue, 2));
        board.place_tiles(4, tiles(Color::Red, 3));

        let report = board.tile_wall(false);

        // Blue row 0 -> col 0; blue row 1 -> col 1. Not adjacent.
        assert_eq!(report.placements.len(), 2);
        assert_eq!(report.points(), 2);
        assert_eq!(board.wall[0][0], Some(Color::Blue));
        assert_eq!(board.wall[1][1], Some(Color::Blue));
        // One spare blue from row 1 plus the three reds of the partial row 4.
        assert_eq!(report.spent.len(), 4);
        assert!(board.pattern_lines.iter().all(PatternLine::is_empty));
    }

    #[test]
    fn test_tile_wall_keeps_partial_lines_when_asked() {
        let mut board = PlayerBoard::default();
        board.place_tiles(4, tiles(Color::Red, 3));

        let report = board.tile_wall(true);

        assert!(report.spent.is_empty());
        assert_eq!(board.pattern_lines[4].count, 3);
    }

    #[test]
    fn test_tile_wall_contention_sends_line_to_floor() {
        let mut board = PlayerBoard::default();
        board.wall[2][wall_column(2, Color::Yellow)] = Some(Color::Yellow);
        // Bypass the pre-check: place_tiles does not consult the wall.
        board.place_tiles(2, tiles(Color::Yellow, 3));

        let report = board.tile_wall(false);

        assert!(report.placements.is_empty());
        assert_eq!(report.contended_rows, vec![2]);
        assert_eq!(board.floor_line.len(), 3);
        assert_eq!(board.wall_tile_count(), 1);
    }

    #[test]
    fn test_has_complete_row_boundary() {
        let mut board = PlayerBoard::default();
        board.wall = wall_from_mask([".....", "####.", ".....", ".....", "....."]);
        assert!(!board.has_complete_row());

        board.wall = wall_from_mask([".....", "#####", ".....", ".....", "....."]);
        assert!(board.has_complete_row());
    }

    #[test]
    fn test_end_game_bonus() {
        let row = wall_from_mask(["#####", ".....", ".....", ".....", "....."]);
        assert_eq!(end_game_bonus(&row), 2);

        let col = wall_from_mask(["#....", "#....", "#....", "#....", "#...."]);
        assert_eq!(end_game_bonus(&col), 7);

        let full = wall_from_mask(["#####"; BOARD_SIZE]);
        // 5 rows * 2 + 5 cols * 7 + 5 colors * 10
        assert_eq!(end_game_bonus(&full), 95);
    }
}
