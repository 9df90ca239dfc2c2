//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bst-floor/bst-floor.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `BSTFLOOR_*` prefix, `__` between sections
//! 5. Command line flags (applied by the CLI layer)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::GameParams;

/// Shape of generated games.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameSettings {
    /// Number of random inserts per tree
    pub tree_size: usize,
    /// Smallest value drawn, inclusive
    pub value_min: i32,
    /// Largest value drawn, inclusive
    pub value_max: i32,
    /// Candidates drawn before the deterministic fix-up kicks in
    pub max_attempts: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        let params = GameParams::default();
        Self {
            tree_size: params.tree_size,
            value_min: params.value_min,
            value_max: params.value_max,
            max_attempts: params.max_attempts,
        }
    }
}

/// Raw game settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawGameSettings {
    pub tree_size: Option<usize>,
    pub value_min: Option<i32>,
    pub value_max: Option<i32>,
    pub max_attempts: Option<u32>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub seed: Option<u64>,
    pub game: RawGameSettings,
}

/// Unified configuration for bst-floor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed for reproducible games (default: random per run)
    pub seed: Option<u64>,
    /// Game generation settings
    pub game: GameSettings,
}

/// Get the XDG config directory for bst-floor.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bst-floor").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bst-floor.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist when given
    pub fn load(config_file: Option<&Path>) -> ApplicationResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Overlay wins for every field it specifies.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            seed: overlay.seed.or(self.seed),
            game: GameSettings {
                tree_size: overlay.game.tree_size.unwrap_or(self.game.tree_size),
                value_min: overlay.game.value_min.unwrap_or(self.game.value_min),
                value_max: overlay.game.value_max.unwrap_or(self.game.value_max),
                max_attempts: overlay.game.max_attempts.unwrap_or(self.game.max_attempts),
            },
        }
    }

    /// Apply BSTFLOOR_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("BSTFLOOR")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_int(&config, "seed")? {
            settings.seed = Some(convert("seed", val)?);
        }
        if let Some(val) = env_int(&config, "game.tree_size")? {
            settings.game.tree_size = convert("game.tree_size", val)?;
        }
        if let Some(val) = env_int(&config, "game.value_min")? {
            settings.game.value_min = convert("game.value_min", val)?;
        }
        if let Some(val) = env_int(&config, "game.value_max")? {
            settings.game.value_max = convert("game.value_max", val)?;
        }
        if let Some(val) = env_int(&config, "game.max_attempts")? {
            settings.game.max_attempts = convert("game.max_attempts", val)?;
        }

        Ok(settings)
    }

    /// Command line overrides; `None` keeps the configured value.
    pub fn with_overrides(
        mut self,
        tree_size: Option<usize>,
        value_min: Option<i32>,
        value_max: Option<i32>,
        seed: Option<u64>,
    ) -> Self {
        if let Some(size) = tree_size {
            self.game.tree_size = size;
        }
        if let Some(min) = value_min {
            self.game.value_min = min;
        }
        if let Some(max) = value_max {
            self.game.value_max = max;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    pub fn game_params(&self) -> GameParams {
        GameParams {
            tree_size: self.game.tree_size,
            value_min: self.game.value_min,
            value_max: self.game.value_max,
            max_attempts: self.game.max_attempts,
        }
    }

    pub fn validate(&self) -> ApplicationResult<()> {
        self.game_params().validate()?;
        Ok(())
    }

    /// Render as TOML (for `bst-floor config`).
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

/// `None` when the variable is unset; a set but non-numeric value is an error.
fn env_int(config: &Config, key: &str) -> ApplicationResult<Option<i64>> {
    match config.get_int(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn convert<T: TryFrom<i64>>(key: &str, value: i64) -> ApplicationResult<T> {
    T::try_from(value).map_err(|_| ApplicationError::Config {
        message: format!("{} out of range: {}", key, value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_game_params() {
        let settings = Settings::default();
        assert_eq!(settings.game_params(), GameParams::default());
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_merge_with_keeps_unspecified_fields() {
        let raw: RawSettings = toml::from_str("[game]\ntree_size = 4\n").unwrap();
        let merged = Settings::default().merge_with(&raw);
        assert_eq!(merged.game.tree_size, 4);
        assert_eq!(merged.game.value_max, 99);
    }

    #[test]
    fn test_overrides_apply_only_given_values() {
        let settings = Settings::default().with_overrides(None, Some(-10), None, Some(3));
        assert_eq!(settings.game.value_min, -10);
        assert_eq!(settings.game.value_max, 99);
        assert_eq!(settings.seed, Some(3));
    }

    #[test]
    fn test_convert_rejects_out_of_range() {
        assert!(convert::<u32>("x", -1).is_err());
        assert_eq!(convert::<i32>("x", 42).unwrap(), 42);
    }
}
