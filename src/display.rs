//! Shared display utilities for rendering a mosaic game in the terminal
//!
//! Provides colorized, human-readable output for boards, factories, moves and
//! round results.

use mosaic_engine::{
    Color, Destination, DraftSource, Game, Move, MoveSuggestion, Phase, RoundSummary, Tile,
    BOARD_SIZE, FLOOR_CAPACITY, FLOOR_PENALTY, WALL_PATTERN,
};

// ANSI color codes for tile display
pub const BLUE: &str = "\x1b[94m";
pub const YELLOW: &str = "\x1b[93m";
pub const RED: &str = "\x1b[91m";
pub const BLACK: &str = "\x1b[90m";
pub const WHITE: &str = "\x1b[97m";
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const REVERSE: &str = "\x1b[7m";

pub fn color_code(color: Color) -> &'static str {
    match color {
        Color::Blue => BLUE,
        Color::Yellow => YELLOW,
        Color::Red => RED,
        Color::Black => BLACK,
        Color::White => WHITE,
    }
}

pub fn display_color(color: Color) -> String {
    format!("{}{}{}", color_code(color), color.letter(), RESET)
}

/// Selected tiles are drawn in reverse video
pub fn display_tile(tile: &Tile) -> String {
    if tile.selected {
        format!("{REVERSE}{}{RESET}", display_color(tile.color))
    } else {
        display_color(tile.color)
    }
}

fn print_tiles(tiles: &[Tile]) {
    if tiles.is_empty() {
        print!("{DIM}(empty){RESET}");
    } else {
        for tile in tiles {
            print!("{} ", display_tile(tile));
        }
    }
}

pub fn format_source(source: DraftSource) -> String {
    match source {
        DraftSource::Factory(f) => format!("F{f}"),
        DraftSource::Center => "Center".to_string(),
    }
}

/// Format a move for display
pub fn format_move(mv: &Move) -> String {
    let dest = match mv.dest {
        Destination::PatternLine(r) => format!("Line {}", r + 1),
        Destination::Floor => "Floor".to_string(),
    };
    format!("{} {} -> {}", format_source(mv.source), display_color(mv.color), dest)
}

/// Same as `format_move`, written as the commands that would play it.
pub fn format_move_commands(mv: &Move) -> String {
    let source = match mv.source {
        DraftSource::Factory(f) => f.to_string(),
        DraftSource::Center => "c".to_string(),
    };
    let dest = match mv.dest {
        Destination::PatternLine(r) => (r + 1).to_string(),
        Destination::Floor => "floor".to_string(),
    };
    format!("take {} {source}, place {dest}", mv.color)
}

pub fn format_suggestion(suggestion: &MoveSuggestion) -> String {
    match suggestion.to_move() {
        Ok(mv) => format_move(&mv),
        Err(_) => format!(
            "{} from {:?} to line {} (invalid)",
            suggestion.color, suggestion.factory_id, suggestion.pattern_line
        ),
    }
}

/// Display the full table: factories, center, the pending selection and
/// every player board. The current player's board is emphasized.
pub fn display_board(game: &Game) {
    println!("\n{BOLD}══════════════════════════════════════════════════════════════{RESET}");
    println!(
        "{BOLD}  Round {}{RESET}   |   Current Player: {}",
        game.round(),
        game.current_player().name
    );
    println!("{BOLD}══════════════════════════════════════════════════════════════{RESET}\n");

    println!("{BOLD}FACTORIES:{RESET}");
    for factory in game.factories() {
        print!("  F{}: ", factory.id);
        print_tiles(&factory.tiles);
        println!();
    }

    print!("\n{BOLD}CENTER:{RESET} ");
    print_tiles(game.center());
    println!();

    if let Some(selection) = game.selection() {
        print!("{BOLD}HOLDING:{RESET} ");
        print_tiles(&selection.tiles);
        println!("{DIM}(from {}){RESET}", selection.source);
    }
    println!();

    for player in game.players() {
        let header = if player.id == game.current_player_index() {
            format!("{BOLD}{} (Score: {}){RESET}", player.name, player.score)
        } else {
            format!("{DIM}{} (Score: {}){RESET}", player.name, player.score)
        };
        println!("{}", header);
        println!("  Pattern Lines          Wall");

        let board = &player.board;
        for row in 0..BOARD_SIZE {
            // Pattern line (right-aligned)
            let line = &board.pattern_lines[row];
            let cap = row + 1;
            let empty = cap - line.count as usize;

            print!("  {} ", row + 1);
            for _ in 0..(BOARD_SIZE - cap) {
                print!("  ");
            }
            for _ in 0..empty {
                print!("{DIM}.{RESET} ");
            }
            if let Some(color) = line.color {
                for _ in 0..line.count {
                    print!("{} ", display_color(color));
                }
            }

            print!(" -> ");

            for col in 0..BOARD_SIZE {
                if let Some(color) = board.wall[row][col] {
                    print!("{} ", display_color(color));
                } else {
                    // Show expected color dimmed
                    let expected = WALL_PATTERN[row][col];
                    print!("{}{}{} ", DIM, expected.letter().to_ascii_lowercase(), RESET);
                }
            }
            println!();
        }

        print!("  Floor: ");
        print_tiles(&board.floor_line);
        if !board.floor_line.is_empty() {
            let owed: i16 = FLOOR_PENALTY.iter().take(board.floor_line.len()).sum();
            print!("{DIM}({owed}){RESET}");
        }
        println!("\n");
    }

    match game.phase() {
        Phase::RoundEnd => println!("{BOLD}Round over.{RESET} Type `next` to score it."),
        Phase::Placing => println!("Choose a line: `place <1-5>` or `place floor`."),
        _ => {}
    }
}

/// Display what scoring did at the end of a round
pub fn display_round_summary(summary: &RoundSummary, game: &Game) {
    println!("\n{BOLD}=== ROUND {} SCORING ==={RESET}", summary.round);
    for line in &summary.players {
        let name = game
            .player(line.player)
            .map(|p| p.name.as_str())
            .unwrap_or("?");
        println!("{BOLD}{name}{RESET}");
        for p in &line.placements {
            println!(
                "  {} -> row {}, col {}: +{}",
                display_color(p.color),
                p.row + 1,
                p.col + 1,
                p.points
            );
        }
        for row in &line.contended_rows {
            println!("  {DIM}line {} already on the wall; sent to floor{RESET}", row + 1);
        }
        if line.floor_tiles > 0 {
            let capped = line.floor_tiles.min(FLOOR_CAPACITY);
            println!("  floor: {} tiles ({} penalised), {}", line.floor_tiles, capped, line.penalty);
        }
        if line.bonus > 0 {
            println!("  end-game bonus: +{}", line.bonus);
        }
        println!("  score: {}", line.score);
    }
}

/// Display final standings
pub fn display_outcome(game: &Game) {
    let Some(outcome) = game.outcome() else {
        return;
    };

    println!("\n{BOLD}═══════════════════════════════════════{RESET}");
    println!("{BOLD}                GAME OVER{RESET}");
    println!("{BOLD}═══════════════════════════════════════{RESET}");
    for (player, score) in game.players().iter().zip(&outcome.final_scores) {
        println!("  {:<16} {}", player.name, score);
    }

    let winner = &game.players()[outcome.winner as usize];
    if outcome.is_tie() {
        let tied: Vec<&str> = outcome
            .leaders
            .iter()
            .map(|&i| game.players()[i as usize].name.as_str())
            .collect();
        println!("\n{BOLD}Tie between {}; {} takes it on seat order.{RESET}", tied.join(", "), winner.name);
    } else {
        println!("\n{BOLD}{} wins!{RESET}", winner.name);
    }
}
