//! Drawing persistence
//!
//! [`JsonFileStore`] keeps every drawing in one JSON array:
//!
//! ```json
//! [{ "id": 1718000000000, "title": "Sunset", "commands": [...],
//!    "userId": 2, "createdAt": "2024-06-10T06:13:20Z" }]
//! ```
//!
//! Titles are not unique. Ids are creation timestamps in milliseconds, bumped
//! when needed so they stay unique within a file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::command::{self, Command};
use crate::errors::{DrawError, Result};

/// A stored drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDrawing {
    pub id: u64,
    pub title: String,
    /// Unknown kinds are dropped and malformed entries skipped on load
    #[serde(deserialize_with = "lenient_commands")]
    pub commands: Vec<Command>,
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
}

fn lenient_commands<'de, D>(deserializer: D) -> std::result::Result<Vec<Command>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(command::from_values(values))
}

pub trait DrawingStore: Send + Sync {
    /// Store a new drawing and return its id
    fn save(&self, title: &str, commands: &[Command], user_id: u64) -> Result<u64>;

    /// Drawings owned by `user_id`, or all drawings for `None`, oldest first
    fn list(&self, user_id: Option<u64>) -> Result<Vec<SavedDrawing>>;

    fn get(&self, id: u64) -> Result<SavedDrawing>;

    /// Remove a drawing; `false` if there was none with this id
    fn delete(&self, id: u64) -> Result<bool>;
}

/// Store backed by a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<SavedDrawing>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| DrawError::storage(&self.path, format!("Failed to read store: {e}")))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| DrawError::storage(&self.path, format!("Corrupt store: {e}")))
    }

    fn write_all(&self, drawings: &[SavedDrawing]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| {
                    DrawError::storage(parent, format!("Failed to create store dir: {e}"))
                })?;
        }

        let content = serde_json::to_string_pretty(drawings)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .map_err(|e| DrawError::storage(&tmp, format!("Failed to write store: {e}")))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| DrawError::storage(&self.path, format!("Failed to replace store: {e}")))?;
        Ok(())
    }

    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| DrawError::storage(&self.path, "store lock poisoned"))?;
        f()
    }
}

/// Millisecond timestamp id, moved past the largest existing id if needed
fn next_id(now: DateTime<Utc>, drawings: &[SavedDrawing]) -> u64 {
    let candidate = now.timestamp_millis().max(0) as u64;
    match drawings.iter().map(|d| d.id).max() {
        Some(max) if max >= candidate => max + 1,
        _ => candidate,
    }
}

impl DrawingStore for JsonFileStore {
    fn save(&self, title: &str, commands: &[Command], user_id: u64) -> Result<u64> {
        self.with_lock(|| {
            let mut drawings = self.read_all()?;
            let now = Utc::now();
            let id = next_id(now, &drawings);
            drawings.push(SavedDrawing {
                id,
                title: title.to_string(),
                commands: commands.to_vec(),
                user_id,
                created_at: now,
            });
            self.write_all(&drawings)?;
            info!(id, commands = commands.len(), "Saved drawing '{}'", title);
            Ok(id)
        })
    }

    fn list(&self, user_id: Option<u64>) -> Result<Vec<SavedDrawing>> {
        self.with_lock(|| {
            let drawings = self.read_all()?;
            Ok(drawings
                .into_iter()
                .filter(|d| user_id.map_or(true, |u| d.user_id == u))
                .collect())
        })
    }

    fn get(&self, id: u64) -> Result<SavedDrawing> {
        self.with_lock(|| {
            self.read_all()?
                .into_iter()
                .find(|d| d.id == id)
                .ok_or(DrawError::DrawingNotFound(id))
        })
    }

    fn delete(&self, id: u64) -> Result<bool> {
        self.with_lock(|| {
            let mut drawings = self.read_all()?;
            let before = drawings.len();
            drawings.retain(|d| d.id != id);
            if drawings.len() == before {
                debug!(id, "Nothing to delete");
                return Ok(false);
            }
            self.write_all(&drawings)?;
            info!(id, "Deleted drawing");
            Ok(true)
        })
    }
}
