//! History export
//!
//! Exports are handed to a [`DownloadSink`], the terminal equivalent of a
//! browser download: the history store picks the file name and contents,
//! the sink decides where the bytes land.

use crate::error::Result;
use crate::types::StorageKey;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// Receives exported files
pub trait DownloadSink {
    /// Save `contents` under `file_name`
    fn save(&self, file_name: &str, contents: &str) -> Result<()>;
}

/// `<key>-history-<YYYY-MM-DD>.json`
pub fn export_file_name(key: &StorageKey, date: NaiveDate) -> String {
    format!("{}-history-{}.json", key, date.format("%Y-%m-%d"))
}

/// Writes exports into a directory, replacing same-named files
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of `file_name` if the sink holds it
    pub fn written(&self, file_name: &str) -> Option<PathBuf> {
        let path = self.dir.join(file_name);
        path.is_file().then_some(path)
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, file_name: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, contents)?;
        info!(path = %path.display(), "exported history");
        Ok(())
    }
}

/// Keeps exported files in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved `(file_name, contents)` pairs in save order
    pub fn files(&self) -> Vec<(String, String)> {
        self.files
            .lock()
            .map(|files| files.clone())
            .unwrap_or_default()
    }
}

impl DownloadSink for MemorySink {
    fn save(&self, file_name: &str, contents: &str) -> Result<()> {
        if let Ok(mut files) = self.files.lock() {
            files.push((file_name.to_string(), contents.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_file_name() {
        let key = StorageKey::new("text-summarizer-history").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            export_file_name(&key, date),
            "text-summarizer-history-history-2024-03-07.json"
        );
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(dir.path().join("exports"));

        sink.save("a.json", "[]").unwrap();
        sink.save("a.json", "[1]").unwrap();

        let written = fs::read_to_string(dir.path().join("exports/a.json")).unwrap();
        assert_eq!(written, "[1]");
        assert_eq!(sink.written("a.json"), Some(dir.path().join("exports/a.json")));
        assert_eq!(sink.written("b.json"), None);
    }

    #[test]
    fn test_directory_sink_failed_save_is_not_written() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let sink = DirectorySink::new(&blocker);

        assert!(sink.save("a.json", "[]").is_err());
        assert_eq!(sink.written("a.json"), None);
    }

    #[test]
    fn test_memory_sink_records_files() {
        let sink = MemorySink::new();
        sink.save("x.json", "{}").unwrap();
        assert_eq!(sink.files(), vec![("x.json".to_string(), "{}".to_string())]);
    }
}
