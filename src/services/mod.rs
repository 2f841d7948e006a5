//! Services module - path removal collaborators.
//!
//! The coordinator never touches the filesystem itself; every deletion goes
//! through a [`PathRemover`]. This module defines that boundary and ships the
//! implementations hosts can pick from.
//!
//! # Components
//!
//! - [`PathRemover`]: Synchronous glob-pattern delete with dry-run, force and ignore support
//! - [`RemoveOptions`]: Per-call options (`cwd`, `force`, `dry_run`, `dot`, `ignore`)
//! - [`RemoveError`]: Failures, including the out-of-root refusal
//! - [`GlobRemover`]: Default filesystem implementation built on `glob` and `walkdir`
//! - [`AsyncPathRemover`]: Asynchronous variant of the same contract
//! - [`BlockingRemover`]: Adapts an async remover back to [`PathRemover`] so hooks can wait on it
//!
//! # Usage Example
//!
//! ```ignore
//! use stalesweep::services::{GlobRemover, PathRemover, RemoveOptions};
//!
//! let options = RemoveOptions {
//!     dry_run: true,
//!     ..RemoveOptions::new("/project/dist")
//! };
//! let would_remove = GlobRemover::new().remove(&["**/*.map".to_string()], &options)?;
//! ```

pub mod async_remover;
pub mod remover;

pub use async_remover::{AsyncPathRemover, BlockingRemover};
pub use remover::{GlobRemover, PathRemover, RemoveError, RemoveOptions};
