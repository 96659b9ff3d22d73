//! Append-only interaction log
//!
//! Every answered request becomes one record:
//!
//! ```text
//! [2024-05-01T09:30:00] USER: add 2 and 3
//! [2024-05-01T09:30:00] ASSISTANT: Step 1: Add 2 and 3 -> 5
//! ...
//!
//! ```
//!
//! The file is opened once per session and flushed after each record.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

/// Timestamp layout, second precision without offset
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("LOG WRITE FAILED: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HistoryError>;

/// Render one record, including the trailing blank separator line
pub fn format_record(timestamp: &DateTime<Local>, user: &str, assistant: &str) -> String {
    let ts = timestamp.format(TIMESTAMP_FORMAT);
    format!("[{ts}] USER: {user}\n[{ts}] ASSISTANT: {assistant}\n\n")
}

/// Handle on an open log file
pub struct InteractionLog {
    path: PathBuf,
    writer: BufWriter<File>,
    records: usize,
}

impl InteractionLog {
    /// Open for append, creating the containing directory if absent
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        info!("◆ LOGGING INTERACTIONS TO {:?}", path);

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            records: 0,
        })
    }

    /// Append a record stamped with the current local time
    pub async fn record(&mut self, user: &str, assistant: &str) -> Result<()> {
        self.record_at(&Local::now(), user, assistant).await
    }

    /// Append a record with an explicit timestamp
    pub async fn record_at(
        &mut self,
        timestamp: &DateTime<Local>,
        user: &str,
        assistant: &str,
    ) -> Result<()> {
        let entry = format_record(timestamp, user, assistant);
        self.writer.write_all(entry.as_bytes()).await?;
        self.writer.flush().await?;
        self.records += 1;
        debug!("◆ LOG RECORD {} WRITTEN TO {:?}", self.records, self.path);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records written through this handle
    pub fn records_written(&self) -> usize {
        self.records
    }

    /// Flush and release the file
    pub async fn close(mut self) -> Result<()> {
        self.writer.shutdown().await?;
        debug!("◆ LOG CLOSED AFTER {} RECORDS", self.records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_record_layout() {
        let ts = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let record = format_record(&ts, "add 2 and 3", "5");

        assert_eq!(
            record,
            "[2024-05-01T09:30:00] USER: add 2 and 3\n[2024-05-01T09:30:00] ASSISTANT: 5\n\n"
        );
    }

    #[test]
    fn test_format_record_keeps_multiline_response() {
        let ts = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let record = format_record(&ts, "q", "line one\nline two");

        assert!(record.contains("ASSISTANT: line one\nline two\n\n"));
    }
}
