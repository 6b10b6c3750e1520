//! Session persistence
//!
//! Remembers what was playing, where, and how loud, so that pressing play
//! on an empty player picks up where the last run left off. Best effort:
//! a missing or unreadable record just means "no previous session".

use crate::utils::error::{IntoPlayerError, PlayerError, Result};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default record location: `<data dir>/EZPlayer/lastplay.json`
static DEFAULT_SESSION_FILE: Lazy<Option<PathBuf>> =
    Lazy::new(|| dirs::data_dir().map(|dir| dir.join("EZPlayer").join("lastplay.json")));

/// What is persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Absolute path of the media that was current
    pub file_path: PathBuf,

    /// Playback position as a fraction
    pub position: f32,

    /// Volume (0 - 100)
    pub volume: f64,
}

impl SessionRecord {
    /// Build a record, resolving the path against the working directory
    pub fn new(file_path: &Path, position: f32, volume: f64) -> Self {
        let file_path = std::path::absolute(file_path).unwrap_or_else(|_| file_path.to_path_buf());
        Self {
            file_path,
            position,
            volume,
        }
    }
}

/// Storage for the last session
pub trait SessionStore {
    /// Persist the record, replacing any previous one
    fn save(&mut self, record: &SessionRecord) -> Result<()>;

    /// The last record, or `None` if there is none or it is unreadable
    fn load(&self) -> Option<SessionRecord>;
}

/// JSON file store at a fixed per-user location
#[derive(Debug, Clone)]
pub struct JsonSessionStore {
    path: PathBuf,
}

impl JsonSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the per-user default location
    pub fn default_location() -> Result<Self> {
        DEFAULT_SESSION_FILE
            .clone()
            .map(Self::new)
            .ok_or_else(|| PlayerError::Session("Cannot determine user data directory".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<SessionRecord> {
        let data = std::fs::read_to_string(&self.path)?;
        let record: SessionRecord = serde_json::from_str(&data)?;
        if !record.position.is_finite() || !record.volume.is_finite() {
            return Err(PlayerError::Session("Non-finite values in session record".to_string()));
        }
        Ok(record)
    }
}

impl SessionStore for JsonSessionStore {
    fn save(&mut self, record: &SessionRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).session_err("Creating session directory")?;
        }
        let data = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, data).session_err("Writing session record")?;
        info!("Saved session for {:?} at {:.3}", record.file_path, record.position);
        Ok(())
    }

    fn load(&self) -> Option<SessionRecord> {
        if !self.path.exists() {
            debug!("No previous session at {:?}", self.path);
            return None;
        }
        match self.read() {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Ignoring unreadable session record {:?}: {}", self.path, e);
                None
            }
        }
    }
}
