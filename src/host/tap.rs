use super::{BuildStats, Compilation, DoneHook, EmitHook, LifecycleHooks};
use crate::coordinator::CleanError;

/// Hook registry for hosts whose handlers report completion by returning.
///
/// Handlers run in registration order; the first error stops dispatch and is
/// returned to the host.
#[derive(Default)]
pub struct TapHooks {
    emit: Vec<(String, EmitHook)>,
    done: Vec<(String, DoneHook)>,
}

impl TapHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the handlers tapped into the emit point
    pub fn emit_taps(&self) -> Vec<&str> {
        self.emit.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Names of the handlers tapped into the done point
    pub fn done_taps(&self) -> Vec<&str> {
        self.done.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn call_emit(&mut self, compilation: &dyn Compilation) -> Result<(), CleanError> {
        for (name, hook) in &mut self.emit {
            hook(compilation).inspect_err(|e| tracing::debug!("emit hook {} failed: {}", name, e))?;
        }
        Ok(())
    }

    pub fn call_done(&mut self, stats: &dyn BuildStats) -> Result<(), CleanError> {
        for (name, hook) in &mut self.done {
            hook(stats).inspect_err(|e| tracing::debug!("done hook {} failed: {}", name, e))?;
        }
        Ok(())
    }
}

impl LifecycleHooks for TapHooks {
    fn register_emit(&mut self, name: &str, hook: EmitHook) {
        self.emit.push((name.to_string(), hook));
    }

    fn register_done(&mut self, name: &str, hook: DoneHook) {
        self.done.push((name.to_string(), hook));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BuildReport;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_hooks_run_in_order_and_stop_on_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut hooks = TapHooks::new();

        hooks.register_done(
            "failing",
            Box::new(|_: &dyn BuildStats| {
                Err(CleanError::InvalidConfiguration("boom".to_string()))
            }),
        );
        let counter = Arc::clone(&calls);
        hooks.register_done(
            "counting",
            Box::new(move |_: &dyn BuildStats| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        assert_eq!(hooks.done_taps(), vec!["failing", "counting"]);
        assert!(hooks.call_done(&BuildReport::default()).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_registry_succeeds() {
        let mut hooks = TapHooks::new();
        assert!(hooks.emit_taps().is_empty());
        hooks.call_emit(&BuildReport::default()).unwrap();
    }
}
