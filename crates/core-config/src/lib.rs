//! Configuration loading and parsing.
//!
//! Parses `runeline.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [screen]
//! foreground = "black"
//! background = "white"
//!
//! [status]
//! column = 1
//! unknown_message = "UNKNOWN"
//! ```
//!
//! Every field is optional. A missing file yields defaults; a file that fails
//! to parse also yields defaults, with a warning logged under the `config`
//! target. Unknown fields are ignored.

use anyhow::Result;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "runeline.toml";

/// Named terminal colors accepted in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorName {
    Reset,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Grey,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ScreenConfig {
    #[serde(default = "ScreenConfig::default_foreground")]
    pub foreground: ColorName,
    #[serde(default = "ScreenConfig::default_background")]
    pub background: ColorName,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            foreground: Self::default_foreground(),
            background: Self::default_background(),
        }
    }
}

impl ScreenConfig {
    const fn default_foreground() -> ColorName {
        ColorName::Black
    }
    const fn default_background() -> ColorName {
        ColorName::White
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StatusConfig {
    /// Column both status rows start at.
    #[serde(default = "StatusConfig::default_column")]
    pub column: u16,
    /// Message shown after an unrecognized command.
    #[serde(default = "StatusConfig::default_unknown_message")]
    pub unknown_message: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            column: Self::default_column(),
            unknown_message: Self::default_unknown_message(),
        }
    }
}

impl StatusConfig {
    const fn default_column() -> u16 {
        1
    }
    fn default_unknown_message() -> String {
        "UNKNOWN".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub screen: ScreenConfig,
    #[serde(default)]
    pub status: StatusConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: ConfigFile, // parsed (or default) data
    pub source: Option<PathBuf>,
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    discover_from(Path::new("."), dirs::config_dir())
}

/// `<working_dir>/runeline.toml` when present, else
/// `<config_dir>/runeline/runeline.toml`.
fn discover_from(working_dir: &Path, config_dir: Option<PathBuf>) -> PathBuf {
    let local = working_dir.join(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    match config_dir {
        Some(dir) => dir.join("runeline").join(CONFIG_FILE_NAME),
        None => local,
    }
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                file,
                source: Some(path),
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}
