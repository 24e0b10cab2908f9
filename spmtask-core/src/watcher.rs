//! Watches the package manifest and reports changes over a channel.

use std::path::{Path, PathBuf};

use notify::Config as NotifyConfig;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::package::MANIFEST_FILE;

/// Something happened to the manifest. Carries no further payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestEvent {
    Changed,
    Created,
    Deleted,
}

/// Watches `<root>/Package.swift` for modifications, creation and deletion.
///
/// The project root is watched non-recursively so that a manifest created
/// after the watcher started is still seen. Dropping the watcher stops it.
pub struct ManifestWatcher {
    _watcher: RecommendedWatcher,
    manifest: PathBuf,
}

impl ManifestWatcher {
    /// Starts watching and returns the receiving end of the event stream.
    pub fn spawn(root: impl AsRef<Path>) -> Result<(Self, UnboundedReceiver<ManifestEvent>)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let watcher = Self::new(root, tx)?;
        Ok((watcher, rx))
    }

    pub fn new(root: impl AsRef<Path>, sender: UnboundedSender<ManifestEvent>) -> Result<Self> {
        let root = root
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| root.as_ref().to_path_buf());
        let manifest = root.join(MANIFEST_FILE);

        let watched = manifest.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Some(manifest_event) = classify(&event, &watched) {
                        debug!(?manifest_event, "manifest event");
                        let _ = sender.send(manifest_event);
                    }
                }
                Err(e) => warn!("Watcher error: {}", e),
            },
            NotifyConfig::default(),
        )
        .map_err(|e| Error::Watcher {
            path: manifest.clone(),
            message: format!("Failed to create watcher: {}", e),
        })?;

        watcher
            .watch(&root, RecursiveMode::NonRecursive)
            .map_err(|e| Error::Watcher {
                path: manifest.clone(),
                message: format!("Failed to watch directory: {}", e),
            })?;

        Ok(Self {
            _watcher: watcher,
            manifest,
        })
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest
    }
}

/// Maps a raw filesystem event to a manifest event, if it concerns `manifest`.
pub fn classify(event: &Event, manifest: &Path) -> Option<ManifestEvent> {
    if !event.paths.iter().any(|p| is_manifest(p, manifest)) {
        return None;
    }

    match event.kind {
        EventKind::Create(_) => Some(ManifestEvent::Created),
        EventKind::Modify(_) | EventKind::Any => Some(ManifestEvent::Changed),
        EventKind::Remove(_) => Some(ManifestEvent::Deleted),
        EventKind::Access(_) | EventKind::Other => None,
    }
}

fn is_manifest(path: &Path, manifest: &Path) -> bool {
    if path == manifest {
        return true;
    }
    // Backends may report paths through a different but equivalent prefix.
    path.file_name() == manifest.file_name()
        && path.parent().and_then(|p| p.canonicalize().ok()).as_deref() == manifest.parent()
}
