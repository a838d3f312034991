use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::NaiveDate;

/// One log file found in the watched directory.
#[derive(Debug, Clone)]
pub struct LogFileInfo {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

/// Index of log files in a directory, newest first.
#[derive(Debug, Clone, Default)]
pub struct DirectoryIndex {
    pub files: Vec<LogFileInfo>,
}

impl DirectoryIndex {
    /// Scan a directory for `.log` files. Unreadable entries are skipped.
    pub fn scan(dir: &Path) -> std::io::Result<Self> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("log") {
                continue;
            }
            let Ok(meta) = entry.metadata() else { continue };
            files.push(LogFileInfo {
                path,
                size: meta.len(),
                modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }
        files.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(Self { files })
    }

    pub fn newest(&self) -> Option<&LogFileInfo> {
        self.files.first()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Extract the date stamp from an add-on log filename,
/// e.g. `Network_26680_20260103.log` -> 2026-01-03.
pub fn parse_log_filename(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(".log")?;
    let stamp = stem.rsplit('_').next()?;
    if stamp.len() != 8 {
        return None;
    }
    let year: i32 = stamp[0..4].parse().ok()?;
    let month: u32 = stamp[4..6].parse().ok()?;
    let day: u32 = stamp[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
