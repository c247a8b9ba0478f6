//! # Configuration Hot-Reloading
//!
//! Watches the configuration file and reports changes over a channel. The
//! watcher runs on notify's own thread; the render loop polls the receiving
//! end between frames, so animation state is never touched off the main
//! thread.
//!
//! The parent directory is watched rather than the file itself because many
//! editors save by replacing the file, which would silently end a watch on
//! the original inode.

use anyhow::{Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use tracing::{debug, error};

/// Filters directory events down to the watched configuration file.
struct ConfigChangeHandler {
    file_name: OsString,
    notify: Sender<PathBuf>,
}

impl ConfigChangeHandler {
    fn handle(&self, event: &Event) {
        if !(event.kind.is_modify() || event.kind.is_create()) {
            return;
        }
        for path in event.paths.iter().filter(|p| self.is_config_file(p)) {
            debug!("Config file changed: {:?}", path);
            // The receiver is gone once the app shuts down; nothing left to notify.
            let _ = self.notify.send(path.clone());
        }
    }

    fn is_config_file(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| name == self.file_name.as_os_str())
    }
}

/// Start watching `config_path`, sending its path on `notify` after each change.
///
/// The caller must keep the returned watcher alive; dropping it ends the watch.
pub fn start(config_path: &Path, notify: Sender<PathBuf>) -> Result<RecommendedWatcher> {
    let file_name = config_path
        .file_name()
        .with_context(|| format!("{} does not name a file", config_path.display()))?
        .to_os_string();
    let directory = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let handler = ConfigChangeHandler { file_name, notify };

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => handler.handle(&event),
        Err(e) => error!("Error watching config file: {e:?}"),
    })?;
    watcher.watch(&directory, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
