//! Recording session for a single command run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Environment variable naming the directory recordings are written under.
pub const RECORD_ENV: &str = "NAVMARK_RECORD";

/// Owns the element-write recorder for one run.
///
/// Cassettes are stored in a timestamped directory under the recording
/// root: `<root>/<timestamp>/dom.cassette.yaml`.
pub struct RecordingSession {
    /// Recorder for element writes.
    pub dom: Arc<Mutex<CassetteRecorder>>,
    /// Output directory containing the cassette file.
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a new recording session under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The timestamped directory already exists
    /// - The directory cannot be created
    pub fn new(root: &Path, source: &str) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let path = output_dir.join("dom.cassette.yaml");
        let dom = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-dom"),
            source,
        )));

        Ok(Self { dom, output_dir })
    }

    /// Directory the cassette is written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Finish the recorder and write the cassette file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds the recorder or the file
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.dom)
            .map_err(|_| "Recording adapter for dom still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock for dom poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write dom cassette: {e}"))?;
        Ok(self.output_dir)
    }
}
