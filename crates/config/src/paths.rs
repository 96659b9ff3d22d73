//! Log file locations

use std::path::PathBuf;

/// Relative directory the tutorial writes its logs into
pub fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

/// Per-level log file name, e.g. `level3_log.txt`
pub fn log_file_name(level: u8) -> String {
    format!("level{}_log.txt", level)
}
