// stalesweep - stale build output cleanup
//
// Library crate for a build-tool plugin that clears the output directory once
// before the first build and removes outputs that later builds stop emitting.

pub mod config;
pub mod coordinator;
pub mod host;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::OptionsLoader;
pub use coordinator::{CleanCoordinator, CleanError};
pub use host::{
    BuildStats, CallbackHooks, CleanPlugin, Compilation, Compiler, HostCompiler, LifecycleHooks,
    TapHooks,
};
pub use models::{AssetRecord, BuildReport, CleanOptions, RawCleanOptions};
pub use services::{GlobRemover, PathRemover, RemoveError, RemoveOptions};
pub use state::{SweepEvent, SweepState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
