//! Workbook file watching.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

/// Whether a filesystem event touches the watched file.
///
/// Canonical paths are compared first; the file name is the fallback because
/// editors often replace the file, which changes what the path resolves to.
fn event_matches(event_paths: &[PathBuf], canonical: &Path, file_name: Option<&std::ffi::OsStr>) -> bool {
    event_paths.iter().any(|p| {
        if let Ok(resolved) = p.canonicalize() {
            if resolved == canonical {
                return true;
            }
        }
        match (file_name, p.file_name()) {
            (Some(expected), Some(actual)) => actual == expected,
            _ => false,
        }
    })
}

/// Watch a local workbook and raise `needs_refresh` whenever it changes.
///
/// Returns `None` when the platform watcher cannot be created; the dashboard
/// then only refreshes on demand.
pub fn setup_workbook_watcher(
    workbook_path: PathBuf,
    needs_refresh: Arc<AtomicBool>,
) -> Option<RecommendedWatcher> {
    let config = Config::default().with_poll_interval(Duration::from_millis(500));

    let canonical = workbook_path
        .canonicalize()
        .unwrap_or_else(|_| workbook_path.clone());
    let file_name = workbook_path.file_name().map(|s| s.to_os_string());

    let watcher_result = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                if event_matches(&event.paths, &canonical, file_name.as_deref()) {
                    debug!(paths = ?event.paths, "workbook changed");
                    needs_refresh.store(true, Ordering::SeqCst);
                }
            }
        },
        config,
    );

    match watcher_result {
        Ok(mut watcher) => {
            // Watch the parent directory since some editors replace files
            let parent = workbook_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            if let Err(e) = watcher.watch(parent, RecursiveMode::NonRecursive) {
                warn!(error = %e, "cannot watch workbook directory");
            }
            Some(watcher)
        }
        Err(e) => {
            warn!(error = %e, "file watcher unavailable");
            None
        }
    }
}
