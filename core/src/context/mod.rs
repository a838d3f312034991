mod config;
mod interner;
mod log_files;

pub use config::{AppConfig, ConfigError};
pub use interner::{IStr, empty_istr, intern, resolve, serialize_istr, serialize_opt_istr};
pub use log_files::{DirectoryIndex, LogFileInfo, parse_log_filename};
