use std::path::Path;

use notify::{RecursiveMode, Watcher};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::context::CliContext;
use pullwatch_core::context::DirectoryIndex;

/// Build the initial file index and start watching the log directory so
/// the index stays current as the add-on writes new files.
pub async fn init_watcher(ctx: &CliContext) -> Option<JoinHandle<()>> {
    let dir = ctx.config.read().await.log_directory_path();
    if !dir.is_dir() {
        warn!("log directory {:?} does not exist; watcher not started", dir);
        return None;
    }

    refresh_index(ctx, &dir).await;

    let ctx = ctx.clone();
    let handle = tokio::spawn(async move {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(8);
        let mut watcher = match notify::recommended_watcher(
            move |result: Result<notify::Event, notify::Error>| {
                if result.is_ok() {
                    let _ = tx.blocking_send(());
                }
            },
        ) {
            Ok(w) => w,
            Err(e) => {
                warn!("failed to create directory watcher: {e}");
                return;
            }
        };

        if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
            warn!("failed to watch {:?}: {e}", dir);
            return;
        }

        while rx.recv().await.is_some() {
            refresh_index(&ctx, &dir).await;
        }
    });

    Some(handle)
}

async fn refresh_index(ctx: &CliContext, dir: &Path) {
    match DirectoryIndex::scan(dir) {
        Ok(index) => {
            debug!("indexed {} log files", index.files.len());
            *ctx.file_index.write().await = Some(index);
        }
        Err(e) => warn!("failed to scan {:?}: {e}", dir),
    }
}
