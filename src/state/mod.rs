// State management module
//
// Holds the coordinator's runtime state (known assets, initial-clean flag) and
// the broadcast channel used to notify observers about cleanup activity.

use camino::Utf8PathBuf;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Events emitted while the coordinator runs
///
/// Observers (a host's progress output, tests, a dev-server overlay) can listen
/// for these instead of scraping log output.
#[derive(Clone, Debug, PartialEq)]
pub enum SweepEvent {
    /// The one-time pre-build clean is about to remove these patterns
    InitialCleanStarted {
        patterns: Vec<String>,
    },

    /// A build reported errors, so cleanup was paused for this cycle
    BuildSkipped,

    /// The known asset list was replaced after a successful build
    AssetsUpdated {
        current: usize,
        stale: Vec<String>,
    },

    /// The remover finished; `dry_run` paths were only reported
    FilesRemoved {
        paths: Vec<Utf8PathBuf>,
        dry_run: bool,
    },
}

/// Runtime state owned by one coordinator
///
/// `current_assets` is an immutable snapshot. A finished build swaps in a new
/// snapshot as a whole, so readers never observe a half-updated list.
#[derive(Clone, Debug, Default)]
pub struct SweepState {
    current_assets: Arc<[String]>,
    initial_clean_done: bool,
}

impl SweepState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asset names from the last successful build, sorted ascending
    pub fn current_assets(&self) -> &[String] {
        &self.current_assets
    }

    /// Shared handle to the current asset snapshot
    pub fn snapshot(&self) -> Arc<[String]> {
        Arc::clone(&self.current_assets)
    }

    pub fn initial_clean_done(&self) -> bool {
        self.initial_clean_done
    }

    /// Record that the initial clean ran. The flag never resets.
    pub fn mark_initial_clean_done(&mut self) {
        self.initial_clean_done = true;
    }

    /// Replace the known assets with those of a finished build.
    ///
    /// Returns every previously known name missing from `names`, in the
    /// (sorted) order of the previous snapshot.
    pub fn replace_assets(&mut self, names: Vec<String>) -> Vec<String> {
        let stale: Vec<String> = {
            let incoming: HashSet<&str> = names.iter().map(String::as_str).collect();
            self.current_assets
                .iter()
                .filter(|name| !incoming.contains(name.as_str()))
                .cloned()
                .collect()
        };

        let mut next = names;
        next.sort();
        self.current_assets = next.into();

        stale
    }
}

/// Broadcast channel for [`SweepEvent`]s
///
/// Sending never fails from the caller's point of view: with no subscribers the
/// event is dropped.
#[derive(Debug, Clone)]
pub struct SweepEvents {
    tx: broadcast::Sender<SweepEvent>,
}

impl SweepEvents {
    /// Create a channel with a buffer of 100 events
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SweepEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: SweepEvent) {
        // Ignore send errors - it's OK if no one is listening
        let _ = self.tx.send(event);
    }
}

impl Default for SweepEvents {
    fn default() -> Self {
        Self::new()
    }
}
