//! Stdout logging. `RUST_LOG` overrides the default info level, e.g.
//! `RUST_LOG=pullwatch_core=debug` to trace parser state changes.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
