//! Logging setup for hosts embedding the plugin.
//!
//! The library itself only emits `tracing` events; it never installs a
//! subscriber. Hosts that have no logging of their own can call one of these
//! helpers once at startup.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
fn default_filter(debug_mode: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug_mode {
            EnvFilter::new("stalesweep=debug,info")
        } else {
            EnvFilter::new("info")
        }
    })
}

/// Log to a daily rotating file in `log_dir`, optionally mirrored to the console.
///
/// # Arguments
/// * `log_dir` - Directory for log files, created if missing
/// * `log_prefix` - Prefix for log file names
/// * `debug_mode` - Include the coordinator's debug-level decisions
/// * `console_output` - Also write colored output to stderr
///
/// # Returns
/// A guard that must be held for as long as logs should be flushed
pub fn setup_logging(
    log_dir: &Utf8Path,
    log_prefix: &str,
    debug_mode: bool,
    console_output: bool,
) -> Result<WorkerGuard> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }

    let (non_blocking, guard) = tracing_appender::non_blocking(rolling::daily(log_dir, log_prefix));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let console_layer = console_output.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(default_filter(debug_mode))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, debug={}, console={}",
        log_dir,
        log_prefix,
        debug_mode,
        console_output
    );

    Ok(guard)
}

/// Log newline-delimited JSON records to a daily rotating file in `log_dir`.
///
/// Suited to hosts that ship their build logs to a collector. Each record
/// carries the target, source location and event fields.
pub fn setup_json_logging(
    log_dir: &Utf8Path,
    log_prefix: &str,
    debug_mode: bool,
) -> Result<WorkerGuard> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }

    let (non_blocking, guard) = tracing_appender::non_blocking(rolling::daily(log_dir, log_prefix));

    tracing_subscriber::registry()
        .with(default_filter(debug_mode))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_current_span(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(guard)
}

/// Log to stderr only. Suited to CLI hosts and tests.
pub fn setup_console_logging(debug_mode: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(default_filter(debug_mode))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .context("A global tracing subscriber is already installed")
}
