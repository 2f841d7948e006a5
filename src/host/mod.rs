//! Host build-system integration.
//!
//! The coordinator only needs three things from a build tool: the resolved
//! output directory, an "emit" hook and a "done" hook. This module names those
//! capabilities as traits and provides the glue around them.
//!
//! # Components
//!
//! - [`Compilation`] / [`BuildStats`]: what the emit and done hooks receive
//! - [`LifecycleHooks`]: the single registration capability the plugin depends on
//! - [`TapHooks`]: registry for hosts whose hooks return `Result` directly
//! - [`CallbackHooks`]: registry for hosts that use a completion callback
//! - [`Compiler`] / [`HostCompiler`]: output directory plus a hook registry
//! - [`CleanPlugin`]: shares one coordinator between both hooks and wires it to a compiler

use camino::{Utf8Path, Utf8PathBuf};

use crate::coordinator::CleanError;
use crate::models::{AssetRecord, BuildReport};

pub mod callback;
pub mod plugin;
pub mod tap;

pub use callback::CallbackHooks;
pub use plugin::{CleanPlugin, PLUGIN_NAME};
pub use tap::TapHooks;

/// Result of a compilation, as seen right before output is written
pub trait Compilation {
    fn has_errors(&self) -> bool;
}

/// Statistics of a finished build
pub trait BuildStats {
    fn has_errors(&self) -> bool;

    /// Emitted assets in the order the host reports them
    fn assets(&self) -> Vec<AssetRecord>;
}

impl Compilation for BuildReport {
    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl BuildStats for BuildReport {
    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn assets(&self) -> Vec<AssetRecord> {
        self.assets.clone()
    }
}

/// Handler bound to the "before output is emitted" lifecycle point
pub type EmitHook = Box<dyn FnMut(&dyn Compilation) -> Result<(), CleanError> + Send>;

/// Handler bound to the "build finished" lifecycle point
pub type DoneHook = Box<dyn FnMut(&dyn BuildStats) -> Result<(), CleanError> + Send>;

/// Lifecycle hook registration, independent of how the host dispatches
pub trait LifecycleHooks {
    fn register_emit(&mut self, name: &str, hook: EmitHook);

    fn register_done(&mut self, name: &str, hook: DoneHook);
}

/// A build tool instance the plugin can attach to
pub trait Compiler {
    /// Resolved output directory, if the host has one configured
    fn output_path(&self) -> Option<&Utf8Path>;

    fn hooks(&mut self) -> &mut dyn LifecycleHooks;
}

/// Plain [`Compiler`]: an optional output directory and a hook registry
pub struct HostCompiler<H> {
    output_path: Option<Utf8PathBuf>,
    hooks: H,
}

impl<H: LifecycleHooks> HostCompiler<H> {
    pub fn new(output_path: Option<Utf8PathBuf>, hooks: H) -> Self {
        Self { output_path, hooks }
    }

    /// Access the concrete registry, e.g. to dispatch hooks
    pub fn lifecycle(&mut self) -> &mut H {
        &mut self.hooks
    }
}

impl<H: LifecycleHooks> Compiler for HostCompiler<H> {
    fn output_path(&self) -> Option<&Utf8Path> {
        self.output_path.as_deref()
    }

    fn hooks(&mut self) -> &mut dyn LifecycleHooks {
        &mut self.hooks
    }
}
