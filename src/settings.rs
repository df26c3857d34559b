use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use mosaic_engine::GameConfig;

pub trait LoadableConfig: Sized + DeserializeOwned {
    /// Parse a TOML string into a config.
    fn from_string(string: &str) -> Result<Self> {
        toml::from_str::<Self>(string).context("Failed to parse config")
    }

    /// Read a TOML file into a config.
    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from path: {}", path.display()))?;
        Self::from_string(&contents)
    }
}

impl LoadableConfig for GameConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = GameConfig::from_string(
            r#"
            player_names = ["Ada", "Grace", "Edsger"]
            seed = 12

            [rules]
            keep_partial_lines = true
            end_game_bonuses = true
            "#,
        )
        .unwrap();

        assert_eq!(config.player_names, ["Ada", "Grace", "Edsger"]);
        assert_eq!(config.seed, Some(12));
        assert!(config.rules.keep_partial_lines);
        assert!(config.rules.end_game_bonuses);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(GameConfig::from_string("").unwrap(), GameConfig::default());
    }

    #[test]
    fn test_bad_config_reports_parse_failure() {
        let err = GameConfig::from_string("seed = \"soon\"").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = GameConfig::from_file(Path::new("/nonexistent/mosaic.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/mosaic.toml"));
    }
}
