//! Records interactions into a cassette file.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, Interaction};

/// Records interactions and writes them as a YAML cassette file.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    source: String,
    interactions: Vec<Interaction>,
    next_seq: u64,
}

impl CassetteRecorder {
    /// Create a new recorder that will write to the given path.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            source: source.into(),
            interactions: Vec::new(),
            next_seq: 0,
        }
    }

    /// Record an interaction. The `seq` field is assigned automatically.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        let interaction = Interaction {
            seq: self.next_seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        };
        self.next_seq += 1;
        self.interactions.push(interaction);
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Builds a cassette from what has been recorded so far.
    #[must_use]
    pub fn to_cassette(&self) -> Cassette {
        Cassette {
            name: self.name.clone(),
            recorded_at: Utc::now(),
            source: self.source.clone(),
            interactions: self.interactions.clone(),
        }
    }

    /// Finish recording and write the cassette YAML file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            source: self.source,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_and_finish() {
        let dir = std::env::temp_dir().join("navmark_cassette_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "test-recording", "nav.yaml");
        assert!(recorder.is_empty());
        recorder.record("dom", "remove_classes", json!({"element": 0}), json!(null));
        recorder.record("dom", "add_classes", json!({"element": 1}), json!(null));
        recorder.record("dom", "add_classes", json!({"element": 2}), json!(null));
        assert_eq!(recorder.len(), 3);

        let result_path = recorder.finish().expect("finish should succeed");
        assert_eq!(result_path, path);

        let content = std::fs::read_to_string(&path).unwrap();
        let cassette: Cassette = serde_yaml::from_str(&content).unwrap();

        assert_eq!(cassette.name, "test-recording");
        assert_eq!(cassette.source, "nav.yaml");
        assert_eq!(cassette.interactions.len(), 3);
        assert_eq!(cassette.interactions[0].seq, 0);
        assert_eq!(cassette.interactions[2].seq, 2);
        assert_eq!(cassette.interactions[0].method, "remove_classes");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
