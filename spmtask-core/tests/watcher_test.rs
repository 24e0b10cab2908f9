use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use spmtask_core::watcher::{classify, ManifestEvent, ManifestWatcher};
use tempfile::TempDir;

fn event(kind: EventKind, path: &Path) -> Event {
    Event::new(kind).add_path(path.to_path_buf())
}

#[test]
fn test_classify_manifest_events() {
    let manifest = PathBuf::from("/work/Example/Package.swift");

    assert_eq!(
        classify(&event(EventKind::Create(CreateKind::File), &manifest), &manifest),
        Some(ManifestEvent::Created)
    );
    assert_eq!(
        classify(&event(EventKind::Modify(ModifyKind::Any), &manifest), &manifest),
        Some(ManifestEvent::Changed)
    );
    assert_eq!(
        classify(&event(EventKind::Remove(RemoveKind::File), &manifest), &manifest),
        Some(ManifestEvent::Deleted)
    );
    assert_eq!(
        classify(&event(EventKind::Access(AccessKind::Any), &manifest), &manifest),
        None
    );
}

#[test]
fn test_classify_ignores_other_files() {
    let manifest = PathBuf::from("/work/Example/Package.swift");
    let resolved = PathBuf::from("/work/Example/Package.resolved");

    assert_eq!(
        classify(&event(EventKind::Modify(ModifyKind::Any), &resolved), &manifest),
        None
    );
}

#[tokio::test]
async fn test_watcher_reports_changes() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("Package.swift");
    std::fs::write(&manifest, "// swift-tools-version:5.9\n").unwrap();

    let (watcher, mut rx) = ManifestWatcher::spawn(temp_dir.path()).unwrap();
    assert!(watcher.manifest_path().ends_with("Package.swift"));

    std::fs::write(temp_dir.path().join("README.md"), "unrelated").unwrap();
    std::fs::remove_file(&manifest).unwrap();

    // Some backends report an attribute change before the removal.
    let deleted = tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(event) = rx.recv().await {
            if event == ManifestEvent::Deleted {
                return true;
            }
        }
        false
    })
    .await
    .expect("no manifest event");
    assert!(deleted);
}

#[test]
fn test_watching_missing_root_fails() {
    let temp_dir = TempDir::new().unwrap();
    let result = ManifestWatcher::spawn(temp_dir.path().join("missing"));
    assert!(result.is_err());
}
