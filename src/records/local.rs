use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::error::StoreError;
use super::types::DailyRecord;

/// Get the default record file path (~/.local/share/carbon-tally/records.jsonl)
pub fn get_records_path() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("carbon-tally").join("records.jsonl"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.local/share/carbon-tally/records.jsonl",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Append-only JSON Lines file, one record per line
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &DailyRecord) -> Result<(), StoreError> {
        record.check_finite()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Io(format!("creating {}: {}", parent.display(), e))
                })?;
            }
        }

        let mut line = serde_json::to_string(record)
            .map_err(|e| StoreError::Corrupt(format!("serializing record: {}", e)))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::Io(format!("opening {}: {}", self.path.display(), e)))?;

        // Single write so a line is never split between two appenders
        file.write_all(line.as_bytes())
            .map_err(|e| StoreError::Io(format!("writing {}: {}", self.path.display(), e)))?;

        Ok(())
    }

    /// Every record in insertion order. A missing file is an empty store.
    pub fn load_all(&self) -> Result<Vec<DailyRecord>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "opening {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let mut records = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .map_err(|e| StoreError::Io(format!("reading {}: {}", self.path.display(), e)))?;
            if line.trim().is_empty() {
                continue;
            }
            let record: DailyRecord = serde_json::from_str(&line)
                .map_err(|e| StoreError::Corrupt(format!("line {}: {}", i + 1, e)))?;
            records.push(record);
        }

        Ok(records)
    }

    /// One user's records, oldest date first (stable for equal dates)
    pub fn fetch_for_user(&self, user_id: &str) -> Result<Vec<DailyRecord>, StoreError> {
        let mut records: Vec<_> = self
            .load_all()?
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    /// All records, newest date first
    pub fn fetch_all(&self) -> Result<Vec<DailyRecord>, StoreError> {
        let mut records = self.load_all()?;
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }
}
