//! Integration tests for stepwise-history
//!
//! Covers directory creation, append semantics across reopen,
//! and record layout on disk.

use chrono::{Local, TimeZone};
use stepwise_history::InteractionLog;
use tempfile::tempdir;

#[tokio::test]
async fn test_open_creates_missing_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("logs").join("level3_log.txt");

    let log = InteractionLog::open(&path).await.unwrap();

    assert!(path.parent().unwrap().is_dir());
    assert!(path.exists());
    assert_eq!(log.path(), path.as_path());
    assert_eq!(log.records_written(), 0);
}

#[tokio::test]
async fn test_record_is_flushed_immediately() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("level1_log.txt");

    let mut log = InteractionLog::open(&path).await.unwrap();
    let ts = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    log.record_at(&ts, "hello", "Hallo").await.unwrap();

    // Still open, but the bytes are on disk
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "[2024-01-02T03:04:05] USER: hello\n[2024-01-02T03:04:05] ASSISTANT: Hallo\n\n"
    );
    assert_eq!(log.records_written(), 1);
}

#[tokio::test]
async fn test_multiple_records_append_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("level2_log.txt");

    let mut log = InteractionLog::open(&path).await.unwrap();
    log.record("first", "one").await.unwrap();
    log.record("second", "two").await.unwrap();
    log.close().await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let first = content.find("USER: first").unwrap();
    let second = content.find("USER: second").unwrap();
    assert!(first < second);
    assert_eq!(content.matches("ASSISTANT: ").count(), 2);
    assert!(content.ends_with("ASSISTANT: two\n\n"));
}

#[tokio::test]
async fn test_reopen_appends_instead_of_truncating() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("level3_log.txt");

    {
        let mut log = InteractionLog::open(&path).await.unwrap();
        log.record("before", "a").await.unwrap();
        log.close().await.unwrap();
    }

    let mut log = InteractionLog::open(&path).await.unwrap();
    log.record("after", "b").await.unwrap();
    log.close().await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("USER: before"));
    assert!(content.contains("USER: after"));
}

#[tokio::test]
async fn test_record_timestamp_shape() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");

    let mut log = InteractionLog::open(&path).await.unwrap();
    log.record("q", "a").await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let first_line = content.lines().next().unwrap();
    // [YYYY-MM-DDTHH:MM:SS] is 21 characters
    assert_eq!(&first_line[0..1], "[");
    assert_eq!(&first_line[11..12], "T");
    assert_eq!(&first_line[20..21], "]");
    assert!(first_line.ends_with("] USER: q"));
}
