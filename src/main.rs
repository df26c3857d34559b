//! Terminal table for mosaic
//!
//! Hot-seat play for 2-4 players; trailing seats can be handed to the random
//! suggester with `--auto`.
//!
//! Usage: mosaic --player Ada --player Grace [--seed N] [--auto 1] [--config rules.toml]

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info, Level};

use mosaic::command::{Command, HELP};
use mosaic::display::{
    display_board, display_outcome, display_round_summary, format_move, format_move_commands,
    format_suggestion, BOLD, DIM, RESET,
};
use mosaic::settings::LoadableConfig;
use mosaic::{
    Game, GameConfig, MoveSuggester, MoveSuggestion, Phase, RandomSuggester, SuggestionOutcome,
};

/// Play Azul at the terminal
#[derive(Parser, Debug)]
#[command(name = "mosaic")]
#[command(about = "Play the Azul tile-drafting game in the terminal", long_about = None)]
struct Args {
    /// Player name, once per seat (2-4). Defaults to the config file or two players.
    #[arg(long = "player", value_name = "NAME")]
    players: Vec<String>,

    /// Seed for the tile bag and the automated seats
    #[arg(long)]
    seed: Option<u64>,

    /// Number of trailing seats played automatically
    #[arg(long, default_value_t = 0)]
    auto: usize,

    /// TOML file with player_names, seed and [rules]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep unfinished pattern lines between rounds
    #[arg(long)]
    keep_partial_lines: bool,

    /// Score row, column and color bonuses at game end
    #[arg(long)]
    end_game_bonuses: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // stdout belongs to the board
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

fn build_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    if !args.players.is_empty() {
        config.player_names = args.players.clone();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.rules.keep_partial_lines |= args.keep_partial_lines;
    config.rules.end_game_bonuses |= args.end_game_bonuses;
    Ok(config)
}

/// Outcome of one prompt command
enum Flow {
    Continue,
    Quit,
}

struct Table {
    game: Game,
    suggester: RandomSuggester,
    auto_from: usize,
}

impl Table {
    fn is_auto_seat(&self) -> bool {
        self.game.current_player_index() as usize >= self.auto_from
    }

    fn everyone_automated(&self) -> bool {
        self.auto_from == 0
    }

    fn score_round(&mut self) -> Result<()> {
        let summary = self.game.next_round()?;
        display_round_summary(&summary, &self.game);
        Ok(())
    }

    fn play_suggestion(&mut self, suggestion: &MoveSuggestion) -> Result<()> {
        let who = self.game.current_player().name.clone();
        match self.game.apply_suggestion(suggestion)? {
            SuggestionOutcome::Placed { .. } | SuggestionOutcome::Floored { .. } => {
                println!("{who} plays: {}", format_suggestion(suggestion));
            }
            SuggestionOutcome::FlooredAfterRejection { count, reason } => {
                println!("{who}: {reason}; {count} tiles to the floor");
            }
        }
        Ok(())
    }

    fn play_auto_turn(&mut self) -> Result<()> {
        match self.game.phase() {
            Phase::Placing => {
                // Drop any pending draft first
                self.game.cancel_selection()?;
            }
            Phase::RoundEnd => return self.score_round(),
            _ => {}
        }
        let Some(suggestion) = self.suggester.suggest(&self.game) else {
            bail!("no legal move for {}", self.game.current_player().name);
        };
        self.play_suggestion(&suggestion)
    }

    fn run_command(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Take { color, source } => {
                let count = self.game.select_tiles(color, source.factory_id())?.len();
                println!("Holding {count} {color} from {source}.");
            }
            Command::Place(row) => {
                let report = self.game.place_selection(row)?;
                if report.overflowed > 0 {
                    println!("{} overflowed to the floor.", report.overflowed);
                }
            }
            Command::Floor => {
                let count = self.game.discard_selection()?;
                println!("{count} tiles to the floor.");
            }
            Command::Cancel => self.game.cancel_selection()?,
            Command::Hint => match self.suggester.suggest(&self.game) {
                Some(suggestion) => {
                    let mv = suggestion.to_move()?;
                    println!("Try {}   ({})", format_move(&mv), format_move_commands(&mv));
                }
                None => println!("Nothing to draft right now."),
            },
            Command::Auto => self.play_auto_turn()?,
            Command::Request => {
                println!("{}", serde_json::to_string_pretty(&self.game.snapshot())?);
            }
            Command::Suggest(json) => {
                let suggestion: MoveSuggestion =
                    serde_json::from_str(&json).context("Malformed suggestion")?;
                self.play_suggestion(&suggestion)?;
            }
            Command::Next => self.score_round()?,
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

fn prompt(game: &Game, input: &mut impl BufRead) -> Result<Option<String>> {
    let label = match game.phase() {
        Phase::Placing => "place",
        Phase::RoundEnd => "next",
        _ => "take",
    };
    print!("\n{BOLD}{} ({label})>{RESET} ", game.current_player().name);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = build_config(&args)?;
    let seats = config.player_names.len();
    if args.auto > seats {
        bail!("--auto {} is more than the {} seats", args.auto, seats);
    }

    let game = Game::from_config(&config)?;
    let suggester = match config.seed {
        Some(seed) => RandomSuggester::new(seed.wrapping_add(1)),
        None => RandomSuggester::from_os_rng(),
    };
    info!(
        seats,
        auto = args.auto,
        suggester = suggester.name(),
        seed = ?config.seed,
        rules = ?config.rules,
        "table ready"
    );

    let mut table = Table {
        game,
        suggester,
        auto_from: seats - args.auto,
    };

    println!("\n{BOLD}Welcome to mosaic!{RESET}");
    println!("{DIM}Type `help` for commands, `quit` to leave.{RESET}");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut shown_revision = None;

    while table.game.phase() != Phase::GameOver {
        if shown_revision != Some(table.game.revision()) {
            display_board(&table.game);
            shown_revision = Some(table.game.revision());
        }

        let automatic = match table.game.phase() {
            Phase::RoundEnd => table.everyone_automated(),
            _ => table.is_auto_seat(),
        };
        if automatic {
            table.play_auto_turn()?;
            continue;
        }

        let Some(line) = prompt(&table.game, &mut input)? else {
            println!("\nGoodbye!");
            return Ok(());
        };
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        match table.run_command(command) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => {
                println!("Goodbye!");
                return Ok(());
            }
            Err(e) => {
                debug!(error = %e, "command rejected");
                println!("{e}");
            }
        }
    }

    display_board(&table.game);
    display_outcome(&table.game);
    Ok(())
}
