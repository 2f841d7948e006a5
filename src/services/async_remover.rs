use camino::Utf8PathBuf;
use std::future::Future;
use tokio::runtime::{Builder, Runtime};

use super::remover::{GlobRemover, PathRemover, RemoveError, RemoveOptions};

/// Asynchronous counterpart of [`PathRemover`].
pub trait AsyncPathRemover: Send + Sync {
    fn remove_async(
        &self,
        patterns: &[String],
        options: &RemoveOptions,
    ) -> impl Future<Output = Result<Vec<Utf8PathBuf>, RemoveError>> + Send;
}

impl AsyncPathRemover for GlobRemover {
    async fn remove_async(
        &self,
        patterns: &[String],
        options: &RemoveOptions,
    ) -> Result<Vec<Utf8PathBuf>, RemoveError> {
        let remover = *self;
        let patterns = patterns.to_vec();
        let options = options.clone();

        tokio::task::spawn_blocking(move || remover.remove(&patterns, &options))
            .await
            .map_err(|e| RemoveError::Task(e.to_string()))?
    }
}

/// Drives an [`AsyncPathRemover`] to completion from synchronous hooks.
///
/// Lifecycle hooks must report success or failure before the host moves on,
/// so every call blocks until the removal future resolves. The adapter owns a
/// current-thread runtime and must not be called from inside another tokio
/// runtime.
pub struct BlockingRemover<R> {
    inner: R,
    runtime: Runtime,
}

impl<R: AsyncPathRemover> BlockingRemover<R> {
    pub fn new(inner: R) -> std::io::Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .thread_name("stalesweep-remover")
            .build()?;

        Ok(Self { inner, runtime })
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: AsyncPathRemover> PathRemover for BlockingRemover<R> {
    fn remove(
        &self,
        patterns: &[String],
        options: &RemoveOptions,
    ) -> Result<Vec<Utf8PathBuf>, RemoveError> {
        self.runtime
            .block_on(self.inner.remove_async(patterns, options))
    }
}
