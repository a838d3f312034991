use std::sync::Arc;

use pullwatch_core::context::DirectoryIndex;
use pullwatch_core::{AppConfig, RaidSession};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Long-lived background work owned by the REPL.
#[derive(Default)]
pub struct BackgroundTasks {
    pub watcher: Option<JoinHandle<()>>,
    pub follower: Option<JoinHandle<()>>,
}

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in the commands.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<RwLock<AppConfig>>,
    /// The last completed parse. Swapped wholesale after each run so a
    /// reader sees either the previous complete model or the new one,
    /// never a partially rebuilt session.
    session: Arc<RwLock<Option<Arc<RaidSession>>>>,
    pub tasks: Arc<Mutex<BackgroundTasks>>,
    pub file_index: Arc<RwLock<Option<DirectoryIndex>>>,
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CliContext {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::load())),
            session: Arc::new(RwLock::new(None)),
            tasks: Arc::new(Mutex::new(BackgroundTasks::default())),
            file_index: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_session(&self, session: RaidSession) {
        *self.session.write().await = Some(Arc::new(session));
    }

    pub async fn session(&self) -> Option<Arc<RaidSession>> {
        self.session.read().await.clone()
    }

    pub async fn clear_session(&self) {
        *self.session.write().await = None;
    }
}
