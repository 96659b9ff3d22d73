//! Common test utilities for Stepwise integration tests
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

/// Isolated environment: a private log directory and no credential
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub log_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = tempdir()?;
        let log_dir = temp_dir.path().join("logs");

        Ok(Self { temp_dir, log_dir })
    }

    /// Path of a level's log file
    pub fn log_file(&self, level: u8) -> PathBuf {
        self.log_dir.join(format!("level{}_log.txt", level))
    }

    /// Read a level's log, empty when absent
    pub fn read_log(&self, level: u8) -> String {
        std::fs::read_to_string(self.log_file(level)).unwrap_or_default()
    }

    /// Command with the remote model disabled and logs in the temp dir
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_stepwise"));
        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("OPENAI_API_KEY");
        cmd.env_remove("OPENAI_BASE_URL");
        cmd.env_remove("STEPWISE_MODEL");
        cmd.env_remove("STEPWISE_TEMPERATURE");
        cmd.env_remove("RUST_LOG");
        cmd.env("STEPWISE_LOG_DIR", &self.log_dir);
        cmd
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new().expect("Failed to create test environment")
    }
}
