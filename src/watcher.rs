// SPDX-License-Identifier: Apache-2.0

//! Change watcher for the environment marker files.
//!
//! Filesystem events for `pyproject.toml`, `uv.lock`, or anything under the
//! venv directory trigger a refresh signal. Events are debounced, so a burst
//! coalesces into one signal, and each signal carries a monotonic generation:
//! the debouncer callback runs on notify's own thread, so consumers discard
//! results from a scan that started before the latest signal.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

use notify::RecommendedWatcher;
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};

use crate::types::UvError;

/// Default coalescing window for event bursts.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Whether a changed path names one of the environment markers.
pub fn is_relevant(path: &Path, venv_dir_name: &str) -> bool {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if file_name == "pyproject.toml" || file_name == "uv.lock" {
        return true;
    }
    path.components()
        .any(|c| c.as_os_str().to_str() == Some(venv_dir_name))
}

/// Watches workspace folders and signals debounced refreshes.
///
/// Two states: idle, and refresh-issued the instant a relevant batch lands;
/// the signal is fire-and-forget and the watcher is immediately idle again.
pub struct RefreshWatcher {
    // Held for its Drop — dropping stops the underlying watcher thread.
    _debouncer: Debouncer<RecommendedWatcher>,
    generation: Arc<AtomicU64>,
    rx: Receiver<u64>,
}

impl RefreshWatcher {
    /// Start watching `folders` (recursively) with the given debounce window.
    pub fn new(
        folders: &[PathBuf],
        venv_dir_name: &str,
        window: Duration,
    ) -> Result<Self, UvError> {
        let (tx, rx) = channel();
        let generation = Arc::new(AtomicU64::new(0));

        let gen_clone = Arc::clone(&generation);
        let venv_name = venv_dir_name.to_string();
        let mut debouncer = new_debouncer(window, move |result: DebounceEventResult| {
            let Ok(events) = result else {
                return;
            };
            if events.iter().any(|e| is_relevant(&e.path, &venv_name)) {
                let generation = gen_clone.fetch_add(1, Ordering::SeqCst) + 1;
                let _ = tx.send(generation);
            }
        })
        .map_err(|e| UvError::process("watcher", e.to_string()))?;

        for folder in folders {
            debouncer
                .watcher()
                .watch(folder, notify::RecursiveMode::Recursive)
                .map_err(|e| UvError::process("watcher", e.to_string()))?;
        }

        Ok(Self {
            _debouncer: debouncer,
            generation,
            rx,
        })
    }

    /// The generation of the most recent refresh signal.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// True iff a scan started at `generation` is still the latest.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Block until the next refresh signal. `None` when the watcher stopped.
    pub fn recv(&self) -> Option<u64> {
        self.rx.recv().ok()
    }

    /// Like [`recv`](Self::recv), but gives up after `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<u64> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Drain queued signals, returning the newest one (if any).
    ///
    /// Used right before a rescan so a burst that slipped past the debounce
    /// window still results in a single scan.
    pub fn drain_pending(&self) -> Option<u64> {
        let mut latest = None;
        while let Ok(generation) = self.rx.try_recv() {
            latest = Some(generation);
        }
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_relevance() {
        assert!(is_relevant(Path::new("/ws/app/pyproject.toml"), ".venv"));
        assert!(is_relevant(Path::new("/ws/uv.lock"), ".venv"));
        assert!(is_relevant(Path::new("/ws/.venv/bin/python"), ".venv"));
        assert!(is_relevant(Path::new("/ws/env/bin/python"), "env"));
        assert!(!is_relevant(Path::new("/ws/app/main.py"), ".venv"));
        assert!(!is_relevant(Path::new("/ws/README.md"), ".venv"));
    }

    #[test]
    fn test_event_burst_coalesces_into_one_signal() {
        let ws = std::env::temp_dir().join("uvkit_watcher_burst");
        std::fs::remove_dir_all(&ws).ok();
        std::fs::create_dir_all(&ws).unwrap();
        let watcher = RefreshWatcher::new(
            std::slice::from_ref(&ws),
            ".venv",
            Duration::from_millis(400),
        )
        .unwrap();

        // Two writes inside one debounce window.
        std::fs::write(ws.join("pyproject.toml"), "[project]\n").unwrap();
        std::fs::write(ws.join("pyproject.toml"), "[project]\nname = \"x\"\n").unwrap();

        let first = watcher
            .recv_timeout(Duration::from_secs(5))
            .expect("expected a refresh signal");
        assert_eq!(first, 1);

        // The second write rode the same window; no further signal arrives.
        assert_eq!(watcher.recv_timeout(Duration::from_millis(800)), None);
        assert_eq!(watcher.generation(), 1);
        std::fs::remove_dir_all(&ws).ok();
    }

    #[test]
    fn test_stale_generation_detection() {
        let ws = std::env::temp_dir().join("uvkit_watcher_gen");
        std::fs::create_dir_all(&ws).unwrap();
        let watcher = RefreshWatcher::new(
            std::slice::from_ref(&ws),
            ".venv",
            Duration::from_millis(10),
        )
        .unwrap();

        let before = watcher.generation();
        assert!(watcher.is_current(before));

        // Simulate the callback bumping past an in-flight scan.
        watcher.generation.fetch_add(2, Ordering::SeqCst);
        assert!(!watcher.is_current(before));
        assert!(watcher.is_current(before + 2));
        std::fs::remove_dir_all(&ws).ok();
    }
}
