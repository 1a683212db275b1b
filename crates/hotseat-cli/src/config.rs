//! Configuration file loading for the terminal front end.
//!
//! Settings come from `hotseat.toml` in the current directory unless another
//! path is given on the command line. Every field is optional.

use clap::ValueEnum;
use hotseat_core::{Color, Layout, LayoutError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

/// Errors that can occur when loading or interpreting configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The configured starting layout is not a valid board diagram.
    #[error("Invalid layout: {0}")]
    InvalidLayout(#[from] LayoutError),
    /// The configured log level is not one tracing understands.
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

/// Which rule set the game is played under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RulesMode {
    /// Every pattern move is allowed, including ones that expose the king.
    #[default]
    Pseudo,
    /// Moves that leave the mover's king attacked are refused.
    Strict,
}

/// Settings for a game session.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PlayConfig {
    /// Rule set. Defaults to pseudo-legal moves.
    #[serde(default)]
    pub rules: RulesMode,
    /// Name shown for the Light side.
    #[serde(default = "default_light_name")]
    pub light_name: String,
    /// Name shown for the Dark side.
    #[serde(default = "default_dark_name")]
    pub dark_name: String,
    /// Starting layout as a board diagram. Defaults to the standard setup.
    #[serde(default)]
    pub layout: Option<String>,
    /// Side to move first.
    #[serde(default)]
    pub to_move: Color,
    /// Whether to mark destinations and checking pieces on the board.
    #[serde(default = "default_show_hints")]
    pub show_hints: bool,
    /// Maximum log level when no `--verbose` flag is given.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_light_name() -> String {
    Color::Light.player_name().to_string()
}

fn default_dark_name() -> String {
    Color::Dark.player_name().to_string()
}

fn default_show_hints() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for PlayConfig {
    fn default() -> Self {
        PlayConfig {
            rules: RulesMode::default(),
            light_name: default_light_name(),
            dark_name: default_dark_name(),
            layout: None,
            to_move: Color::Light,
            show_hints: default_show_hints(),
            log_level: default_log_level(),
        }
    }
}

impl PlayConfig {
    /// Loads the configuration from `path`.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default configuration path, `hotseat.toml` in the
    /// current working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("hotseat.toml")
    }

    /// Parses the configured starting layout.
    pub fn layout(&self) -> Result<Layout, ConfigError> {
        match &self.layout {
            Some(diagram) => Ok(Layout::parse(diagram)?),
            None => Ok(Layout::standard()),
        }
    }

    /// Parses the configured log level.
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    pub fn player_name(&self, color: Color) -> &str {
        match color {
            Color::Light => &self.light_name,
            Color::Dark => &self.dark_name,
        }
    }
}
