//! Parses config file
use std::{
    env,
    fs::OpenOptions,
    io::Read,
    path::{Path, PathBuf},
};

use pcx::RleMode;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Fail on truncated RLE streams instead of zero-filling the image.
    pub strict_rle: bool,
    /// Treat the color of the top left pixel as transparent in previews.
    pub transparent_key: bool,
    /// Extension of alternate color tables, without the dot.
    pub palette_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict_rle: false,
            transparent_key: true,
            palette_extension: "act".to_string(),
        }
    }
}

impl Config {
    pub fn rle_mode(&self) -> RleMode {
        if self.strict_rle {
            RleMode::Strict
        } else {
            RleMode::Lenient
        }
    }
}

pub static CONFIG_FILE_NAME: &str = "mugenchars.toml";

/// Parse `mugenchars.toml` in the same folder as the binary
pub fn parse_config() -> eyre::Result<Config> {
    let path = match env::current_exe() {
        Ok(path) => path
            .parent()
            .map(|parent| parent.join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
        Err(_) => PathBuf::from(CONFIG_FILE_NAME),
    };

    parse_config_from_file(path.as_path())
}

/// A missing file gives the default config.
pub fn parse_config_from_file(path: &Path) -> eyre::Result<Config> {
    if !path.exists() {
        log::debug!("No config at `{}`, using defaults", path.display());
        return Ok(Config::default());
    }

    let mut file = OpenOptions::new().read(true).open(path.as_os_str())?;
    let mut buffer = String::new();

    file.read_to_string(&mut buffer)?;

    parse_config_from_str(&buffer)
}

pub fn parse_config_from_str(s: &str) -> eyre::Result<Config> {
    let mut config: Config = toml::from_str(s)?;

    config.palette_extension = config.palette_extension.trim_start_matches('.').to_string();

    Ok(config)
}
