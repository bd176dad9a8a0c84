//! Flight recorder
//!
//! Records the drone pose every frame while recording is on and plays it back
//! frame by frame. Recording and replay exclude each other. Recordings can be
//! saved to storage under a name and loaded back later.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::persistence::{PersistenceError, RecordingArchive, StoredFrame};
use crate::platform::KeyValueStore;

/// One recorded pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightFrame {
    pub position: Vec3,
    /// Euler angles (pitch, yaw, roll)
    pub rotation: Vec3,
    /// Wall-clock time (ms since epoch)
    pub timestamp: f64,
}

impl From<&FlightFrame> for StoredFrame {
    fn from(frame: &FlightFrame) -> Self {
        Self {
            position: frame.position.to_array(),
            rotation: frame.rotation.to_array(),
            timestamp: frame.timestamp,
        }
    }
}

impl From<StoredFrame> for FlightFrame {
    fn from(frame: StoredFrame) -> Self {
        Self {
            position: Vec3::from_array(frame.position),
            rotation: Vec3::from_array(frame.rotation),
            timestamp: frame.timestamp,
        }
    }
}

/// Recorder state: the frame log plus a replay cursor
#[derive(Debug, Clone, Default)]
pub struct FlightRecorder {
    frames: Vec<FlightFrame>,
    cursor: usize,
    recording: bool,
    replaying: bool,
}

impl FlightRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    pub fn frames(&self) -> &[FlightFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the next frame replay will return
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Start a fresh recording (drops the current log, stops replay)
    pub fn start_recording(&mut self) {
        self.frames.clear();
        self.cursor = 0;
        self.replaying = false;
        self.recording = true;
        log::info!("Recording started");
    }

    pub fn stop_recording(&mut self) {
        if self.recording {
            log::info!("Recording stopped ({} frames)", self.frames.len());
        }
        self.recording = false;
    }

    /// Append a pose if recording; returns true if it was kept
    pub fn record_frame(&mut self, position: Vec3, rotation: Vec3, timestamp: f64) -> bool {
        if !self.recording {
            return false;
        }
        self.frames.push(FlightFrame {
            position,
            rotation,
            timestamp,
        });
        true
    }

    /// Start replay from the first frame; no-op on an empty log
    pub fn start_replay(&mut self) -> bool {
        if self.frames.is_empty() {
            return false;
        }
        self.recording = false;
        self.replaying = true;
        self.cursor = 0;
        log::info!("Replay started ({} frames)", self.frames.len());
        true
    }

    pub fn stop_replay(&mut self) {
        self.replaying = false;
        self.cursor = 0;
    }

    /// Next replay frame; `None` once the log is exhausted, which also
    /// stops replay and rewinds the cursor
    pub fn next_frame(&mut self) -> Option<FlightFrame> {
        if !self.replaying {
            return None;
        }
        match self.frames.get(self.cursor) {
            Some(frame) => {
                self.cursor += 1;
                Some(*frame)
            }
            None => {
                self.stop_replay();
                None
            }
        }
    }

    /// Drop the log and stop everything
    pub fn clear(&mut self) {
        self.frames.clear();
        self.cursor = 0;
        self.recording = false;
        self.replaying = false;
    }

    /// Save the current log under `name`, replacing an existing entry
    pub fn save(&self, store: &mut dyn KeyValueStore, name: &str) -> Result<(), PersistenceError> {
        let mut archive = RecordingArchive::load(store)?;
        let replacing = archive.contains(name);
        let stored: Vec<StoredFrame> = self.frames.iter().map(StoredFrame::from).collect();
        archive.insert(name, &stored)?;
        archive.save(store)?;
        log::info!(
            "{} recording '{}' ({} frames)",
            if replacing { "Replaced" } else { "Saved" },
            name,
            stored.len()
        );
        Ok(())
    }

    /// Remove a saved recording; returns false if there was none by that name
    pub fn delete(store: &mut dyn KeyValueStore, name: &str) -> Result<bool, PersistenceError> {
        let mut archive = RecordingArchive::load(store)?;
        if !archive.remove(name) {
            return Ok(false);
        }
        archive.save(store)?;
        log::info!("Deleted recording '{}'", name);
        Ok(true)
    }

    /// Replace the log with the recording called `name`
    ///
    /// The cursor is rewound and replay is not started. On error the current
    /// log is left untouched.
    pub fn try_load(&mut self, store: &dyn KeyValueStore, name: &str) -> Result<(), PersistenceError> {
        let frames = RecordingArchive::load(store)?.get(name)?;
        self.frames = frames.into_iter().map(FlightFrame::from).collect();
        self.cursor = 0;
        self.replaying = false;
        log::info!("Loaded recording '{}' ({} frames)", name, self.frames.len());
        Ok(())
    }

    /// [`try_load`](Self::try_load) reporting only success
    pub fn load(&mut self, store: &dyn KeyValueStore, name: &str) -> bool {
        match self.try_load(store, name) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not load recording '{}': {}", name, e);
                false
            }
        }
    }

    /// Names of saved recordings; empty if the archive can't be read
    pub fn saved_recordings(store: &dyn KeyValueStore) -> Vec<String> {
        match RecordingArchive::load(store) {
            Ok(archive) => archive.names(),
            Err(e) => {
                log::warn!("Could not list recordings: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::RECORDINGS_KEY;
    use crate::platform::MemoryStore;

    fn recorded(n: usize) -> FlightRecorder {
        let mut rec = FlightRecorder::new();
        rec.start_recording();
        for i in 0..n {
            let f = i as f32;
            rec.record_frame(Vec3::new(f, 5.0, -f), Vec3::new(0.0, f * 0.1, 0.0), i as f64);
        }
        rec.stop_recording();
        rec
    }

    #[test]
    fn test_ignores_frames_when_not_recording() {
        let mut rec = FlightRecorder::new();
        assert!(!rec.record_frame(Vec3::ZERO, Vec3::ZERO, 0.0));
        assert!(rec.is_empty());
    }

    #[test]
    fn test_replay_walks_log_then_stops() {
        let mut rec = recorded(3);
        assert!(rec.start_replay());
        assert!(!rec.is_recording());
        for i in 0..3 {
            let frame = rec.next_frame().unwrap();
            assert_eq!(frame.position.x, i as f32);
        }
        assert_eq!(rec.next_frame(), None);
        assert!(!rec.is_replaying());
        assert_eq!(rec.cursor(), 0);
    }

    #[test]
    fn test_recording_and_replay_are_exclusive() {
        let mut rec = recorded(2);
        rec.start_replay();
        rec.start_recording();
        assert!(rec.is_recording());
        assert!(!rec.is_replaying());
        assert!(rec.is_empty());

        rec.record_frame(Vec3::ONE, Vec3::ZERO, 1.0);
        rec.start_replay();
        assert!(rec.is_replaying());
        assert!(!rec.is_recording());
    }

    #[test]
    fn test_replay_of_empty_log_is_noop() {
        let mut rec = FlightRecorder::new();
        assert!(!rec.start_replay());
        assert!(!rec.is_replaying());
    }

    #[test]
    fn test_save_list_and_load() {
        let mut store = MemoryStore::new();
        let rec = recorded(4);
        rec.save(&mut store, "first").unwrap();
        recorded(2).save(&mut store, "second").unwrap();

        assert_eq!(
            FlightRecorder::saved_recordings(&store),
            vec!["first".to_string(), "second".to_string()]
        );

        let mut other = FlightRecorder::new();
        assert!(other.load(&store, "first"));
        assert_eq!(other.frames(), rec.frames());
        assert_eq!(other.cursor(), 0);
        assert!(!other.is_replaying());
    }

    #[test]
    fn test_delete_drops_only_named_recording() {
        let mut store = MemoryStore::new();
        recorded(2).save(&mut store, "keep").unwrap();
        recorded(3).save(&mut store, "drop").unwrap();

        assert!(FlightRecorder::delete(&mut store, "drop").unwrap());
        assert!(!FlightRecorder::delete(&mut store, "drop").unwrap());
        assert_eq!(FlightRecorder::saved_recordings(&store), vec!["keep".to_string()]);

        let mut rec = FlightRecorder::new();
        assert!(!rec.load(&store, "drop"));
        assert!(rec.load(&store, "keep"));
        assert_eq!(rec.len(), 2);
    }

    #[test]
    fn test_failed_load_keeps_log() {
        let mut store = MemoryStore::new();
        store
            .set_item(RECORDINGS_KEY, r#"{"broken":[{"position":"x"}]}"#)
            .unwrap();
        let mut rec = recorded(3);
        assert!(!rec.load(&store, "missing"));
        assert!(!rec.load(&store, "broken"));
        assert_eq!(rec.len(), 3);
    }

    #[test]
    fn test_corrupt_archive_is_not_overwritten() {
        let mut store = MemoryStore::new();
        store.set_item(RECORDINGS_KEY, "{oops").unwrap();
        assert!(recorded(1).save(&mut store, "new").is_err());
        assert_eq!(store.get_item(RECORDINGS_KEY).unwrap().as_deref(), Some("{oops"));
        assert!(FlightRecorder::saved_recordings(&store).is_empty());
    }
}
