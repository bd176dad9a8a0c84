//! Saved flight recordings
//!
//! All recordings live in one JSON object under a single storage key:
//! `{ "<name>": [ { "position": [x,y,z], "rotation": [x,y,z], "timestamp": ms }, ... ] }`.
//!
//! Entries are validated one at a time when loaded, so a corrupt recording
//! fails on its own without hiding the others.

pub mod validation;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::platform::{KeyValueStore, StorageError};

/// Storage key for the recordings map
pub const RECORDINGS_KEY: &str = "flightRecordings";

/// Persistence failures
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("recording archive is not valid JSON: {0}")]
    CorruptArchive(#[source] serde_json::Error),

    #[error("recording '{name}' is malformed: {reason}")]
    CorruptRecording { name: String, reason: String },

    #[error("no recording named '{0}'")]
    NotFound(String),

    #[error("recording name must not be empty")]
    EmptyName,
}

/// One frame as stored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredFrame {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub timestamp: f64,
}

/// Name-keyed recordings, entries kept as raw JSON until loaded
#[derive(Debug, Clone, Default)]
pub struct RecordingArchive {
    entries: BTreeMap<String, Value>,
}

impl RecordingArchive {
    /// Read the archive from storage; a missing key is an empty archive
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, PersistenceError> {
        let Some(json) = store.get_item(RECORDINGS_KEY)? else {
            return Ok(Self::default());
        };
        let entries: BTreeMap<String, Value> =
            serde_json::from_str(&json).map_err(PersistenceError::CorruptArchive)?;
        Ok(Self { entries })
    }

    /// Write the archive back to storage
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(&self.entries).map_err(PersistenceError::CorruptArchive)?;
        store.set_item(RECORDINGS_KEY, &json)?;
        Ok(())
    }

    /// Saved recording names (sorted)
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Store frames under `name`, replacing any previous recording
    pub fn insert(&mut self, name: &str, frames: &[StoredFrame]) -> Result<(), PersistenceError> {
        if name.trim().is_empty() {
            return Err(PersistenceError::EmptyName);
        }
        let value = serde_json::to_value(frames).map_err(PersistenceError::CorruptArchive)?;
        self.entries.insert(name.to_string(), value);
        Ok(())
    }

    /// Decode and validate the recording called `name`
    pub fn get(&self, name: &str) -> Result<Vec<StoredFrame>, PersistenceError> {
        let value = self
            .entries
            .get(name)
            .ok_or_else(|| PersistenceError::NotFound(name.to_string()))?;
        let frames: Vec<StoredFrame> =
            serde_json::from_value(value.clone()).map_err(|e| PersistenceError::CorruptRecording {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        validation::validate_frames(&frames).map_err(|reason| PersistenceError::CorruptRecording {
            name: name.to_string(),
            reason,
        })?;
        Ok(frames)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    fn frame(t: f64) -> StoredFrame {
        StoredFrame {
            position: [1.0, 2.0, 3.0],
            rotation: [0.1, 0.2, 0.3],
            timestamp: t,
        }
    }

    #[test]
    fn test_missing_key_is_empty_archive() {
        let store = MemoryStore::new();
        let archive = RecordingArchive::load(&store).unwrap();
        assert!(archive.names().is_empty());
    }

    #[test]
    fn test_stored_layout() {
        let mut store = MemoryStore::new();
        let mut archive = RecordingArchive::default();
        archive.insert("loop", &[frame(10.0)]).unwrap();
        archive.save(&mut store).unwrap();

        let json = store.get_item(RECORDINGS_KEY).unwrap().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let first = &value["loop"][0];
        assert_eq!(first["position"], serde_json::json!([1.0, 2.0, 3.0]));
        assert_eq!(first["timestamp"], serde_json::json!(10.0));
        assert!(first["rotation"].is_array());
    }

    #[test]
    fn test_corrupt_entry_fails_alone() {
        let mut store = MemoryStore::new();
        store
            .set_item(
                RECORDINGS_KEY,
                r#"{"bad":[{"position":[1,2],"rotation":[0,0,0],"timestamp":1}],
                    "good":[{"position":[1,2,3],"rotation":[0,0,0],"timestamp":1}]}"#,
            )
            .unwrap();
        let archive = RecordingArchive::load(&store).unwrap();
        assert_eq!(archive.names(), vec!["bad".to_string(), "good".to_string()]);
        assert!(matches!(
            archive.get("bad"),
            Err(PersistenceError::CorruptRecording { .. })
        ));
        assert_eq!(archive.get("good").unwrap().len(), 1);
        assert!(matches!(archive.get("nope"), Err(PersistenceError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_archive_is_reported() {
        let mut store = MemoryStore::new();
        store.set_item(RECORDINGS_KEY, "not json").unwrap();
        assert!(matches!(
            RecordingArchive::load(&store),
            Err(PersistenceError::CorruptArchive(_))
        ));
    }

    #[test]
    fn test_insert_replaces_and_remove_drops() {
        let mut archive = RecordingArchive::default();
        archive.insert("run", &[frame(1.0)]).unwrap();
        archive.insert("run", &[frame(1.0), frame(2.0)]).unwrap();
        assert_eq!(archive.get("run").unwrap().len(), 2);
        assert!(archive.contains("run"));
        assert!(archive.remove("run"));
        assert!(!archive.contains("run"));
        assert!(!archive.remove("run"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut archive = RecordingArchive::default();
        assert!(matches!(
            archive.insert("  ", &[frame(0.0)]),
            Err(PersistenceError::EmptyName)
        ));
    }
}
