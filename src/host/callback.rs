use super::{BuildStats, Compilation, DoneHook, EmitHook, LifecycleHooks};
use crate::coordinator::CleanError;

/// Completion callback handed to callback-style handlers.
///
/// `None` signals success, `Some(error)` failure.
pub type Completion<'a> = &'a mut dyn FnMut(Option<CleanError>);

pub type EmitHandler = Box<dyn FnMut(&dyn Compilation, Completion<'_>) + Send>;

pub type DoneHandler = Box<dyn FnMut(&dyn BuildStats, Completion<'_>) + Send>;

/// Hook registry for hosts that signal completion through a callback.
///
/// Hooks registered through [`LifecycleHooks`] are wrapped so their `Result`
/// is reported via the completion callback. Hosts can also register native
/// callback-style handlers with [`on_emit`](Self::on_emit) and
/// [`on_done`](Self::on_done).
#[derive(Default)]
pub struct CallbackHooks {
    emit: Vec<(String, EmitHandler)>,
    done: Vec<(String, DoneHandler)>,
}

impl CallbackHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_emit(&mut self, name: &str, handler: EmitHandler) {
        self.emit.push((name.to_string(), handler));
    }

    pub fn on_done(&mut self, name: &str, handler: DoneHandler) {
        self.done.push((name.to_string(), handler));
    }

    pub fn handler_names(&self) -> (Vec<&str>, Vec<&str>) {
        (
            self.emit.iter().map(|(name, _)| name.as_str()).collect(),
            self.done.iter().map(|(name, _)| name.as_str()).collect(),
        )
    }

    /// Run every emit handler, then report the outcome to `callback`.
    pub fn emit<F>(&mut self, compilation: &dyn Compilation, callback: F)
    where
        F: FnOnce(Option<CleanError>),
    {
        callback(dispatch(&mut self.emit, |handler, done| {
            handler(compilation, done)
        }));
    }

    /// Run every done handler, then report the outcome to `callback`.
    pub fn done<F>(&mut self, stats: &dyn BuildStats, callback: F)
    where
        F: FnOnce(Option<CleanError>),
    {
        callback(dispatch(&mut self.done, |handler, done| handler(stats, done)));
    }
}

/// Call handlers in order until one completes with an error.
fn dispatch<H>(
    handlers: &mut [(String, H)],
    mut call: impl FnMut(&mut H, Completion<'_>),
) -> Option<CleanError> {
    for (name, handler) in handlers.iter_mut() {
        let mut outcome: Option<CleanError> = None;
        call(handler, &mut |result: Option<CleanError>| outcome = result);

        if let Some(err) = outcome {
            tracing::debug!("handler {} completed with error: {}", name, err);
            return Some(err);
        }
    }
    None
}

impl LifecycleHooks for CallbackHooks {
    fn register_emit(&mut self, name: &str, mut hook: EmitHook) {
        self.on_emit(
            name,
            Box::new(move |compilation: &dyn Compilation, done: Completion<'_>| {
                done(hook(compilation).err())
            }),
        );
    }

    fn register_done(&mut self, name: &str, mut hook: DoneHook) {
        self.on_done(
            name,
            Box::new(move |stats: &dyn BuildStats, done: Completion<'_>| {
                done(hook(stats).err())
            }),
        );
    }
}
