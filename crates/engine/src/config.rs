//! Game setup options. Everything has a default so a config file only needs
//! the fields it changes.

use serde::{Deserialize, Serialize};

/// Optional rule variants
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOptions {
    /// Keep unfinished pattern lines across rounds instead of clearing them
    pub keep_partial_lines: bool,
    /// Award row / column / color bonuses when the game ends
    pub end_game_bonuses: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player_names: Vec<String>,
    /// Seed for the tile bag shuffle; `None` seeds from the OS
    pub seed: Option<u64>,
    pub rules: RuleOptions,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            player_names: vec!["Player 1".to_string(), "Player 2".to_string()],
            seed: None,
            rules: RuleOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"seed": 7, "rules": {"end_game_bonuses": true}}"#).unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.player_names.len(), 2);
        assert!(config.rules.end_game_bonuses);
        assert!(!config.rules.keep_partial_lines);
    }
}
