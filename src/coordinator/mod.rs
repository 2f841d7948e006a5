//! Cleanup coordinator - the stale-output policy.
//!
//! [`CleanCoordinator`] decides *what* to delete and when; the
//! [`PathRemover`] it owns does the deleting. It reacts to two lifecycle
//! points of a host build:
//!
//! - **emit** ([`run_initial_clean`](CleanCoordinator::run_initial_clean)):
//!   removes `cleanOnceBeforePatterns` once, before the first successful build
//!   writes its output
//! - **done** ([`run_after_build`](CleanCoordinator::run_after_build)):
//!   diffs the build's assets against the previous build and removes the
//!   stale ones plus `cleanAfterEveryBuildPatterns`
//!
//! Builds that report errors never trigger a deletion. Assets of the latest
//! build are passed to the remover as an ignore list (when `protectAssets` is
//! on), so broad patterns such as `**/*` cannot sweep up fresh output.
//!
//! # State Machine
//!
//! ```text
//! Unattached ──attach_to──▶ Attached(initial clean pending) ──emit──▶ Attached(initial clean done)
//! ```
//!
//! `run_after_build` may run any number of times once attached (watch mode).
//! Calls made while unattached do nothing.

use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::host::{BuildStats, Compilation};
use crate::metrics::SweepMetrics;
use crate::models::CleanOptions;
use crate::services::{PathRemover, RemoveError, RemoveOptions};
use crate::state::{SweepEvent, SweepEvents, SweepState};

/// Errors raised by the coordinator
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(
        "Refusing to delete {path}: it is outside the output directory. \
         Set `allowOutsideProjectRoot: true` to permit deletions outside the output directory"
    )]
    UnsafeDeletionBlocked { path: Utf8PathBuf },

    #[error(transparent)]
    Remove(#[from] RemoveError),
}

/// Tracks build outputs and removes the stale ones
///
/// Owns its [`SweepState`] exclusively. Hosts that need to reach it from
/// several hooks share it through [`CleanPlugin`](crate::host::CleanPlugin).
pub struct CleanCoordinator<R> {
    options: CleanOptions,
    remover: R,
    state: SweepState,
    output_path: Option<Utf8PathBuf>,
    events: SweepEvents,
    metrics: Arc<SweepMetrics>,
}

impl<R: PathRemover> CleanCoordinator<R> {
    pub fn new(options: CleanOptions, remover: R) -> Self {
        Self {
            options,
            remover,
            state: SweepState::new(),
            output_path: None,
            events: SweepEvents::new(),
            metrics: Arc::new(SweepMetrics::new()),
        }
    }

    pub fn options(&self) -> &CleanOptions {
        &self.options
    }

    pub fn state(&self) -> &SweepState {
        &self.state
    }

    /// Asset names of the last successful build, sorted ascending
    pub fn current_assets(&self) -> &[String] {
        self.state.current_assets()
    }

    pub fn initial_clean_done(&self) -> bool {
        self.state.initial_clean_done()
    }

    pub fn output_path(&self) -> Option<&Utf8Path> {
        self.output_path.as_deref()
    }

    pub fn is_attached(&self) -> bool {
        self.output_path.is_some()
    }

    pub fn remover(&self) -> &R {
        &self.remover
    }

    pub fn metrics(&self) -> Arc<SweepMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Subscribe to cleanup events
    pub fn subscribe(&self) -> broadcast::Receiver<SweepEvent> {
        self.events.subscribe()
    }

    /// Bind the coordinator to the host's resolved output directory.
    pub fn attach_to(&mut self, output_path: impl Into<Utf8PathBuf>) {
        let output_path = output_path.into();
        tracing::debug!("Cleanup attached to output directory {}", output_path);
        self.output_path = Some(output_path);
    }

    /// Emit hook: remove `cleanOnceBeforePatterns` the first time a build
    /// without errors is about to write output.
    pub fn run_initial_clean<C>(&mut self, compilation: &C) -> Result<(), CleanError>
    where
        C: Compilation + ?Sized,
    {
        let Some(cwd) = self.output_path.clone() else {
            tracing::debug!("Initial clean requested before attach, ignoring");
            return Ok(());
        };

        if self.state.initial_clean_done() || compilation.has_errors() {
            return Ok(());
        }

        self.state.mark_initial_clean_done();

        let patterns = self.options.clean_once_before_patterns().to_vec();
        self.events.emit(SweepEvent::InitialCleanStarted {
            patterns: patterns.clone(),
        });

        if patterns.is_empty() {
            return Ok(());
        }

        self.remove_files(&cwd, &patterns)
    }

    /// Done hook: diff this build's assets against the previous build and
    /// remove what is stale, plus `cleanAfterEveryBuildPatterns`.
    pub fn run_after_build<S>(&mut self, stats: &S) -> Result<(), CleanError>
    where
        S: BuildStats + ?Sized,
    {
        let Some(cwd) = self.output_path.clone() else {
            tracing::debug!("Post-build clean requested before attach, ignoring");
            return Ok(());
        };

        self.metrics.record_build();

        if stats.has_errors() {
            self.metrics.record_build_skipped();
            self.events.emit(SweepEvent::BuildSkipped);
            if self.options.verbose() {
                tracing::warn!("Pausing cleanup: the build reported errors");
            }
            return Ok(());
        }

        let names: Vec<String> = stats.assets().into_iter().map(|asset| asset.name).collect();
        let stale = self.state.replace_assets(names);

        self.metrics.record_stale(stale.len());
        self.events.emit(SweepEvent::AssetsUpdated {
            current: self.state.current_assets().len(),
            stale: stale.clone(),
        });

        let mut patterns = Vec::new();
        if self.options.clean_stale_assets() {
            // Asset names are literal paths, not globs
            patterns.extend(stale.iter().map(|name| glob::Pattern::escape(name)));
        }
        patterns.extend_from_slice(self.options.clean_after_every_build_patterns());

        if patterns.is_empty() {
            return Ok(());
        }

        self.remove_files(&cwd, &patterns)
    }

    /// Hand `patterns` to the remover, relative to `cwd`.
    fn remove_files(&self, cwd: &Utf8Path, patterns: &[String]) -> Result<(), CleanError> {
        let options = RemoveOptions {
            force: self.options.allow_outside_project_root(),
            cwd: cwd.to_path_buf(),
            dry_run: self.options.dry(),
            dot: true,
            // Protected names are matched literally as well
            ignore: if self.options.protect_assets() {
                self.state
                    .current_assets()
                    .iter()
                    .map(|name| glob::Pattern::escape(name))
                    .collect()
            } else {
                Vec::new()
            },
        };

        tracing::debug!(
            "Removing {} pattern(s) in {} (dry: {}, protected: {})",
            patterns.len(),
            cwd,
            options.dry_run,
            options.ignore.len()
        );

        let removed = match self.remover.remove(patterns, &options) {
            Ok(removed) => removed,
            Err(RemoveError::OutsideRoot { path, .. }) => {
                return Err(CleanError::UnsafeDeletionBlocked { path });
            }
            Err(e) => return Err(e.into()),
        };

        self.metrics.record_removal(removed.len());

        if self.options.verbose() {
            let label = if self.options.dry() { "dry" } else { "removed" };
            let base = std::env::current_dir()
                .ok()
                .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok());

            for path in &removed {
                tracing::info!("{}", report_line(label, path, base.as_deref()));
            }
        }

        self.events.emit(SweepEvent::FilesRemoved {
            paths: removed,
            dry_run: self.options.dry(),
        });

        Ok(())
    }
}

/// One verbose report line: `label` followed by `path` relative to `base`,
/// or the absolute path when no relative form exists.
fn report_line(label: &str, path: &Utf8Path, base: Option<&Utf8Path>) -> String {
    let shown = base
        .and_then(|base| pathdiff::diff_utf8_paths(path, base))
        .unwrap_or_else(|| path.to_path_buf());
    format!("{} {}", label, shown)
}
