// Cleanup metrics module
//
// Lightweight counters describing what the coordinator did over its lifetime

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Cleanup counters for one coordinator
///
/// Uses atomic operations so a host can read them from another thread while
/// builds keep running (watch mode).
#[derive(Debug)]
pub struct SweepMetrics {
    /// Finished builds handed to the post-build hook
    pub builds_seen: AtomicU64,

    /// Builds skipped because they reported errors
    pub builds_skipped: AtomicU64,

    /// Assets found stale across all builds
    pub stale_detected: AtomicU64,

    /// Calls made to the path remover
    pub removal_calls: AtomicU64,

    /// Paths removed (or reported under dry run)
    pub paths_removed: AtomicU64,

    /// Coordinator creation time
    start_time: Instant,
}

impl SweepMetrics {
    pub fn new() -> Self {
        Self {
            builds_seen: AtomicU64::new(0),
            builds_skipped: AtomicU64::new(0),
            stale_detected: AtomicU64::new(0),
            removal_calls: AtomicU64::new(0),
            paths_removed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_build(&self) {
        self.builds_seen.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_build_skipped(&self) {
        self.builds_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale(&self, count: usize) {
        self.stale_detected.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record one remover call and how many paths it returned
    pub fn record_removal(&self, paths: usize) {
        self.removal_calls.fetch_add(1, Ordering::Relaxed);
        self.paths_removed.fetch_add(paths as u64, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!(
            "Cleanup summary: {} builds ({} skipped), {} stale assets, {} paths removed in {} calls, uptime {:.0}s",
            self.builds_seen.load(Ordering::Relaxed),
            self.builds_skipped.load(Ordering::Relaxed),
            self.stale_detected.load(Ordering::Relaxed),
            self.paths_removed.load(Ordering::Relaxed),
            self.removal_calls.load(Ordering::Relaxed),
            self.uptime().as_secs_f64()
        );
    }
}

impl Default for SweepMetrics {
    fn default() -> Self {
        Self::new()
    }
}
