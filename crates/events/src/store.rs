//! JSONL event store - append-only writer

use crate::error::EventError;
use crate::reader::EventReader;
use crate::record::EventRecord;
use chrono::Utc;
use multisig_approval::MultisigEvent;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only JSONL event store, one file per day
pub struct EventStore {
    base_path: PathBuf,
    current_file: Option<BufWriter<File>>,
    current_date: Option<String>,
    last_sequence: u64,
}

impl EventStore {
    /// Open (or create) a store at the given path.
    ///
    /// Sequencing continues after the last record already on disk.
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self, EventError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        let last_sequence = EventReader::from_directory(&base_path)?
            .last_sequence()?
            .unwrap_or(0);

        Ok(Self {
            base_path,
            current_file: None,
            current_date: None,
            last_sequence,
        })
    }

    /// Append an event and return the stored record
    pub fn append(&mut self, event: &MultisigEvent) -> Result<EventRecord, EventError> {
        let record = EventRecord {
            sequence: self.last_sequence + 1,
            recorded_at: Utc::now(),
            event: event.clone(),
        };
        let date = record.recorded_at.format("%Y-%m-%d").to_string();

        // Rotate file if date changed
        if self.current_date.as_ref() != Some(&date) {
            self.rotate_file(&date)?;
        }

        if let Some(ref mut writer) = self.current_file {
            let json = serde_json::to_string(&record)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }

        self.last_sequence = record.sequence;
        Ok(record)
    }

    /// Sequence of the last appended record (0 when empty)
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    fn rotate_file(&mut self, date: &str) -> Result<(), EventError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }

        let file_path = self.base_path.join(format!("{}.jsonl", date));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;

        self.current_file = Some(BufWriter::new(file));
        self.current_date = Some(date.to_string());

        Ok(())
    }

    /// List all JSONL files in the store
    pub fn list_files(&self) -> Result<Vec<PathBuf>, EventError> {
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "jsonl") {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Flush and close the current file
    pub fn close(&mut self) -> Result<(), EventError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }
        self.current_file = None;
        self.current_date = None;
        Ok(())
    }
}

impl Drop for EventStore {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_append_assigns_sequence() {
        let dir = TempDir::new().unwrap();
        let mut store = EventStore::new(dir.path()).unwrap();

        let first = store
            .append(&MultisigEvent::QuorumUpdateInitiated { id: 1 })
            .unwrap();
        let second = store
            .append(&MultisigEvent::QuorumUpdateSuccessful { id: 1, new_quorum: 3 })
            .unwrap();

        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert_eq!(store.list_files().unwrap().len(), 1);
    }

    #[test]
    fn test_reopen_continues_sequence() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = EventStore::new(dir.path()).unwrap();
            store
                .append(&MultisigEvent::QuorumUpdateInitiated { id: 1 })
                .unwrap();
        }

        let mut store = EventStore::new(dir.path()).unwrap();
        assert_eq!(store.last_sequence(), 1);
        let record = store
            .append(&MultisigEvent::QuorumUpdateInitiated { id: 2 })
            .unwrap();
        assert_eq!(record.sequence, 2);
    }
}
