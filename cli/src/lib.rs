pub mod commands;
pub mod context;
pub mod dir_watcher;
pub mod logging;

pub use context::CliContext;

use std::io::Write;

/// Read one command line from stdin.
pub fn readline() -> Result<String, String> {
    write!(std::io::stdout(), "pullwatch> ").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())?;
    let mut buffer = String::new();
    std::io::stdin()
        .read_line(&mut buffer)
        .map_err(|e| e.to_string())?;
    Ok(buffer)
}
