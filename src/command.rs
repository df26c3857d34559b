//! Commands typed at the terminal table prompt.

use std::str::FromStr;

use thiserror::Error;

use mosaic_engine::{Color, DraftSource, GameError, Row, BOARD_SIZE};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// `take <color> <factory#|c>`
    Take { color: Color, source: DraftSource },
    /// `place <1-5>`; stored zero-based
    Place(Row),
    /// `place floor`
    Floor,
    Cancel,
    Hint,
    Auto,
    /// Print the suggestion request JSON
    Request,
    /// Apply a suggestion given as JSON
    Suggest(String),
    Next,
    Help,
    Quit,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Parse(#[from] GameError),
    #[error("`{0}` is not a factory number or `c`")]
    BadSource(String),
    #[error("`{0}` is not a line 1-5 or `floor`")]
    BadLine(String),
}

pub const HELP: &str = "\
commands:
  take <color> <factory#|c>   draft a color from a factory or the center
  place <1-5|floor>           put the held tiles on a pattern line or the floor
  cancel                      put the held tiles back
  hint                        show a suggested move
  auto                        play a suggested move
  request                     print the suggestion request JSON
  suggest <json>              apply {\"factoryId\":..,\"color\":..,\"patternLine\":..}
  next                        score the finished round
  help                        this text
  quit                        leave the table
colors: blue yellow red black white (or b y r k w)";

fn parse_source(s: &str) -> Result<DraftSource, CommandError> {
    match s.to_ascii_lowercase().as_str() {
        "c" | "center" => Ok(DraftSource::Center),
        other => other
            .strip_prefix('f')
            .unwrap_or(other)
            .parse::<u8>()
            .map(DraftSource::Factory)
            .map_err(|_| CommandError::BadSource(s.to_string())),
    }
}

fn parse_line(s: &str) -> Result<Command, CommandError> {
    if s.eq_ignore_ascii_case("floor") || s.eq_ignore_ascii_case("f") {
        return Ok(Command::Floor);
    }
    match s.parse::<usize>() {
        Ok(n) if (1..=BOARD_SIZE).contains(&n) => Ok(Command::Place((n - 1) as Row)),
        _ => Err(CommandError::BadLine(s.to_string())),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let (word, rest) = match input.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (input, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Err(CommandError::Empty),
            "take" | "t" => match args.as_slice() {
                [color, source] => Command::Take {
                    color: color.parse()?,
                    source: parse_source(source)?,
                },
                _ => return Err(CommandError::Usage("take <color> <factory#|c>")),
            },
            "place" | "p" => match args.as_slice() {
                [line] => parse_line(line)?,
                _ => return Err(CommandError::Usage("place <1-5|floor>")),
            },
            "floor" => Command::Floor,
            "cancel" | "undo" => Command::Cancel,
            "hint" => Command::Hint,
            "auto" | "a" => Command::Auto,
            "request" => Command::Request,
            "suggest" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("suggest <json>"));
                }
                Command::Suggest(rest.to_string())
            }
            "next" | "n" => Command::Next,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(word.to_string())),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_parsing() {
        assert_eq!(
            "take red 3".parse::<Command>(),
            Ok(Command::Take {
                color: Color::Red,
                source: DraftSource::Factory(3)
            })
        );
        assert_eq!(
            "t k c".parse::<Command>(),
            Ok(Command::Take {
                color: Color::Black,
                source: DraftSource::Center
            })
        );
        assert_eq!(
            "take Blue F0".parse::<Command>(),
            Ok(Command::Take {
                color: Color::Blue,
                source: DraftSource::Factory(0)
            })
        );
        assert!(matches!(
            "take teal 1".parse::<Command>(),
            Err(CommandError::Parse(GameError::UnknownColor(_)))
        ));
        assert_eq!(
            "take red".parse::<Command>(),
            Err(CommandError::Usage("take <color> <factory#|c>"))
        );
        assert_eq!(
            "take red x".parse::<Command>(),
            Err(CommandError::BadSource("x".to_string()))
        );
    }

    #[test]
    fn test_place_is_one_based() {
        assert_eq!("place 1".parse::<Command>(), Ok(Command::Place(0)));
        assert_eq!("p 5".parse::<Command>(), Ok(Command::Place(4)));
        assert_eq!("place floor".parse::<Command>(), Ok(Command::Floor));
        assert_eq!(
            "place 0".parse::<Command>(),
            Err(CommandError::BadLine("0".to_string()))
        );
        assert_eq!(
            "place 6".parse::<Command>(),
            Err(CommandError::BadLine("6".to_string()))
        );
    }

    #[test]
    fn test_suggest_keeps_json_intact() {
        let input = r#"suggest {"factoryId": null, "color": "red", "patternLine": -1}"#;
        assert_eq!(
            input.parse::<Command>(),
            Ok(Command::Suggest(
                r#"{"factoryId": null, "color": "red", "patternLine": -1}"#.to_string()
            ))
        );
    }

    #[test]
    fn test_simple_words() {
        assert_eq!("  next ".parse::<Command>(), Ok(Command::Next));
        assert_eq!("Q".parse::<Command>(), Ok(Command::Quit));
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "dance".parse::<Command>(),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }
}
