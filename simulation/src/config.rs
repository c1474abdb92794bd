//! Runtime configuration of the driver.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use bank_heist_core::DEFAULT_WIN_AFTER;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration file {}", .path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML for the configuration schema.
    #[error("failed to parse configuration file {}", .path.display())]
    Parse {
        /// File that was being parsed.
        path: PathBuf,
        /// Decoder failure.
        #[source]
        source: toml::de::Error,
    },
}

/// Settings that shape a run without touching gameplay constants.
///
/// Missing keys fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Directory holding `level1.txt`, `level2.txt` and so on.
    pub levels_dir: PathBuf,
    /// Where unlocks and high scores are persisted. `None` keeps them in memory.
    pub preferences_path: Option<PathBuf>,
    /// Seed of every session's random number generator.
    pub seed: u64,
    /// Frames simulated per second of real time.
    pub frame_rate: u32,
    /// Seconds the player must hold out to win a level.
    pub win_after_secs: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            levels_dir: PathBuf::from("levels"),
            preferences_path: Some(PathBuf::from("preferences.toml")),
            seed: 0x0B4E_C415,
            frame_rate: 60,
            win_after_secs: DEFAULT_WIN_AFTER.as_secs(),
        }
    }
}

impl SimulationConfig {
    /// Reads a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a configuration from TOML text.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Path of the level file for the one-based level number.
    #[must_use]
    pub fn level_path(&self, number: usize) -> PathBuf {
        self.levels_dir.join(format!("level{number}.txt"))
    }

    /// Real time covered by a single frame. A zero rate is treated as one frame per second.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }

    /// Elapsed time after which the level is won.
    #[must_use]
    pub fn win_after(&self) -> Duration {
        Duration::from_secs(self.win_after_secs)
    }
}
