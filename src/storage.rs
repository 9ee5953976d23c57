//! High score persistence
//!
//! The simulation core only ever asks for two operations: load the high
//! score once at startup and save it when it rises. Where the value
//! actually lives is an adapter concern.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// External storage for the high score
pub trait HighScoreStore {
    /// Load the persisted high score; a store with no record yet
    /// returns zero
    fn load(&mut self) -> Result<u32>;

    /// Persist a new high score
    fn save(&mut self, high_score: u32) -> Result<()>;
}

/// In-memory store for tests and runs without a score file
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: u32,
}

impl MemoryStore {
    pub fn new(value: u32) -> Self {
        Self { value }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u32> {
        Ok(self.value)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        self.value = high_score;
        Ok(())
    }
}

/// On-disk JSON document holding the high score
#[derive(Debug, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u32,
}

/// Store backed by a small JSON file
///
/// A missing file reads as zero; parent directories are created on the
/// first save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read high score file: {:?}", self.path))?;
        let parsed: HighScoreFile = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed high score file: {:?}", self.path))?;
        Ok(parsed.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let raw = serde_json::to_string_pretty(&HighScoreFile { high_score })?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write high score file: {:?}", self.path))
    }
}
