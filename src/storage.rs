use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::types::HIGH_SCORE_KEY;

/// Where the best score lives between runs.
pub trait HighScoreStore {
    fn load(&self) -> Result<u32>;
    fn save(&mut self, score: u32) -> Result<()>;
}

/// Platform data directory for this game, e.g. `~/.local/share/flappy-term`.
pub fn data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "flappy-term")
        .context("could not determine a data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

/// A small JSON object of namespaced integers, one file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The default `scores.json` in the platform data directory.
    pub fn in_data_dir() -> Result<Self> {
        Ok(Self::new(data_dir()?.join("scores.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, u32>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", self.path.display()))
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<u32> {
        Ok(self.read_all()?.get(HIGH_SCORE_KEY).copied().unwrap_or(0))
    }

    fn save(&mut self, score: u32) -> Result<()> {
        // Keep any other keys; a corrupt file is simply replaced.
        let mut all = self.read_all().unwrap_or_default();
        all.insert(HIGH_SCORE_KEY.to_string(), score);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(&all)?;
        fs::write(&self.path, text).with_context(|| format!("writing {}", self.path.display()))
    }
}

/// Keeps the score for this process only (`--no-save`).
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub score: Option<u32>,
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u32> {
        Ok(self.score.unwrap_or(0))
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.score = Some(score);
        Ok(())
    }
}
