use camino::{Utf8Path, Utf8PathBuf};
use serde_yaml_ng::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{BuildStats, Compilation, Compiler};
use crate::coordinator::{CleanCoordinator, CleanError};
use crate::models::CleanOptions;
use crate::services::PathRemover;
use crate::services::remover::normalize;

/// Name the plugin registers its hooks under
pub const PLUGIN_NAME: &str = "stalesweep";

/// Entry point for hosts: one coordinator shared by the emit and done hooks.
///
/// # Usage
///
/// ```ignore
/// let plugin = CleanPlugin::from_value(&options, GlobRemover::new())?;
/// let mut compiler = HostCompiler::new(Some("dist".into()), TapHooks::new());
/// plugin.apply(&mut compiler);
///
/// compiler.lifecycle().call_emit(&compilation)?;
/// compiler.lifecycle().call_done(&stats)?;
/// ```
pub struct CleanPlugin<R> {
    coordinator: Arc<Mutex<CleanCoordinator<R>>>,
}

impl<R: PathRemover + Send + 'static> CleanPlugin<R> {
    pub fn new(options: CleanOptions, remover: R) -> Self {
        Self {
            coordinator: Arc::new(Mutex::new(CleanCoordinator::new(options, remover))),
        }
    }

    /// Build from an untyped options value; fails with
    /// [`CleanError::InvalidConfiguration`] when it is not a valid mapping.
    pub fn from_value(value: &Value, remover: R) -> Result<Self, CleanError> {
        Ok(Self::new(CleanOptions::from_value(value)?, remover))
    }

    /// Shared handle to the coordinator
    pub fn coordinator(&self) -> Arc<Mutex<CleanCoordinator<R>>> {
        Arc::clone(&self.coordinator)
    }

    /// Execute a function with access to the coordinator
    ///
    /// # Example
    /// ```ignore
    /// let assets = plugin.read(|c| c.current_assets().to_vec());
    /// ```
    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&CleanCoordinator<R>) -> T,
    {
        f(&lock(&self.coordinator))
    }

    /// Attach to a compiler and register the lifecycle hooks.
    ///
    /// Returns `false` (with a warning) when the compiler has no output
    /// directory; nothing is registered in that case.
    pub fn apply(&self, compiler: &mut dyn Compiler) -> bool {
        let Some(output_path) = compiler.output_path().map(absolutize) else {
            tracing::warn!("No output directory configured; stale output cleanup is disabled");
            return false;
        };

        let clean_once = {
            let mut coordinator = lock(&self.coordinator);
            coordinator.attach_to(output_path);
            !coordinator.options().clean_once_before_patterns().is_empty()
        };

        let hooks = compiler.hooks();

        if clean_once {
            let coordinator = Arc::clone(&self.coordinator);
            hooks.register_emit(
                PLUGIN_NAME,
                Box::new(move |compilation: &dyn Compilation| {
                    lock(&coordinator).run_initial_clean(compilation)
                }),
            );
        }

        let coordinator = Arc::clone(&self.coordinator);
        hooks.register_done(
            PLUGIN_NAME,
            Box::new(move |stats: &dyn BuildStats| lock(&coordinator).run_after_build(stats)),
        );

        true
    }
}

// Hooks never run concurrently, so a poisoned lock only means an earlier hook
// panicked; the state itself is still consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn absolutize(path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }

    match std::env::current_dir()
        .ok()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
    {
        Some(dir) => normalize(&dir.join(path)),
        None => path.to_path_buf(),
    }
}
