//! Data models for stalesweep.
//!
//! - [`RawCleanOptions`]: options as supplied by the host, every field optional
//! - [`CleanOptions`]: the resolved, immutable form the coordinator runs on
//! - [`AssetRecord`]: one emitted output file from a build
//! - [`BuildReport`]: a serializable build outcome usable as compilation result and stats

pub mod assets;
pub mod config;

pub use assets::{AssetRecord, BuildReport};
pub use config::{CleanOptions, RawCleanOptions};
