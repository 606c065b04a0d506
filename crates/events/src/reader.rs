//! JSONL event reader - sequential reader for replay

use crate::error::EventError;
use crate::record::EventRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Sequential journal reader
pub struct EventReader {
    files: Vec<PathBuf>,
}

impl EventReader {
    /// Create a new reader from a directory. A missing directory reads
    /// as an empty journal.
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, EventError> {
        let path = path.as_ref();
        let mut files = Vec::new();

        if path.exists() {
            for entry in std::fs::read_dir(path)? {
                let file_path = entry?.path();
                if file_path.extension().map_or(false, |ext| ext == "jsonl") {
                    files.push(file_path);
                }
            }
        }

        files.sort();

        Ok(Self { files })
    }

    /// Read all records from all files in order
    pub fn read_all(&self) -> Result<Vec<EventRecord>, EventError> {
        let mut records = Vec::new();

        for file_path in &self.files {
            let reader = BufReader::new(File::open(file_path)?);

            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                records.push(serde_json::from_str(&line)?);
            }
        }

        Ok(records)
    }

    /// Read all records and check sequences run 1, 2, 3, ...
    pub fn read_verified(&self) -> Result<Vec<EventRecord>, EventError> {
        let records = self.read_all()?;
        for (i, record) in records.iter().enumerate() {
            let expected = i as u64 + 1;
            if record.sequence != expected {
                return Err(EventError::OutOfOrder {
                    expected,
                    actual: record.sequence,
                });
            }
        }
        Ok(records)
    }

    /// Get the last sequence number from all files
    pub fn last_sequence(&self) -> Result<Option<u64>, EventError> {
        Ok(self.read_all()?.last().map(|r| r.sequence))
    }

    /// Journal files, oldest first
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_is_empty() {
        let reader = EventReader::from_directory("/definitely/not/here").unwrap();
        assert!(reader.read_all().unwrap().is_empty());
        assert_eq!(reader.last_sequence().unwrap(), None);
    }

    #[test]
    fn test_out_of_order_detected() {
        let dir = TempDir::new().unwrap();
        let mut file = File::create(dir.path().join("2026-01-01.jsonl")).unwrap();
        writeln!(
            file,
            r#"{{"sequence":2,"recorded_at":"2026-01-01T00:00:00Z","event":{{"event":"quorum_update_initiated","id":1}}}}"#
        )
        .unwrap();
        writeln!(file).unwrap();

        let reader = EventReader::from_directory(dir.path()).unwrap();
        assert_eq!(reader.read_all().unwrap().len(), 1);
        assert!(matches!(
            reader.read_verified(),
            Err(EventError::OutOfOrder { expected: 1, actual: 2 })
        ));
    }
}
