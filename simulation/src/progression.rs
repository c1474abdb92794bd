//! Unlocks and high scores that survive between runs.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use bank_heist_core::{HIGH_SCORE_SENTINEL, LEVEL_COUNT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::hud;

/// Failures raised while persisting progression.
#[derive(Debug, Error)]
pub enum ProgressionError {
    /// The preferences file could not be read or written.
    #[error("failed to access preferences file {}", .path.display())]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The progression could not be encoded as TOML.
    #[error("failed to encode preferences")]
    Encode(#[from] toml::ser::Error),
}

/// Levels unlocked so far and the best gold left at the end of each level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    levels_unlocked: usize,
    high_scores: [f32; LEVEL_COUNT],
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            levels_unlocked: 1,
            high_scores: [HIGH_SCORE_SENTINEL; LEVEL_COUNT],
        }
    }
}

impl Progression {
    /// Reads the progression stored at `path`.
    ///
    /// A missing file is replaced by the defaults, which are written back.
    /// A file that cannot be decoded is ignored in favour of the defaults.
    pub fn load(path: &Path) -> Result<Self, ProgressionError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                let progression = Self::default();
                progression.save(path)?;
                info!(path = %path.display(), "created default preferences");
                return Ok(progression);
            }
            Err(source) => {
                return Err(ProgressionError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        match toml::from_str::<Self>(&text) {
            Ok(progression) => Ok(progression.sanitized()),
            Err(error) => {
                warn!(path = %path.display(), %error, "malformed preferences, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Writes the progression to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ProgressionError> {
        let text = toml::to_string(self)?;
        let io_error = |source: io::Error| ProgressionError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, text).map_err(io_error)
    }

    /// Highest level number the player may start.
    #[must_use]
    pub fn levels_unlocked(&self) -> usize {
        self.levels_unlocked
    }

    /// Reports whether the one-based level number may be started.
    #[must_use]
    pub fn is_unlocked(&self, level: usize) -> bool {
        level >= 1 && level <= self.levels_unlocked
    }

    /// Best score recorded for the one-based level. Unset scores hold the sentinel.
    #[must_use]
    pub fn high_score(&self, level: usize) -> Option<f32> {
        level
            .checked_sub(1)
            .and_then(|index| self.high_scores.get(index))
            .copied()
    }

    /// High score as shown on the menu.
    #[must_use]
    pub fn high_score_label(&self, level: usize) -> String {
        hud::score_label(self.high_score(level).unwrap_or(HIGH_SCORE_SENTINEL))
    }

    /// Records a won level: unlocks the next one and keeps the better score.
    ///
    /// Returns whether anything changed.
    pub fn record_win(&mut self, level: usize, gold: f32) -> bool {
        let before = self.clone();
        self.levels_unlocked = self.levels_unlocked.max(level.saturating_add(1));
        if let Some(score) = level
            .checked_sub(1)
            .and_then(|index| self.high_scores.get_mut(index))
        {
            *score = score.max(gold);
        }
        *self != before
    }

    fn sanitized(mut self) -> Self {
        self.levels_unlocked = self.levels_unlocked.max(1);
        for score in &mut self.high_scores {
            if score.is_nan() {
                *score = HIGH_SCORE_SENTINEL;
            }
        }
        self
    }
}
