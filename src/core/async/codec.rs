//! Async facade over the codec for concurrent callers
//!
//! Request handlers in an async server must not block their executor on file
//! I/O. `AsyncLegacyCodec` shares one `LegacyCodec` behind an `Arc` and runs
//! every operation on tokio's blocking pool. Mutual exclusion of writers is
//! still provided by the store's per-file lock, so any number of tasks may
//! call `update` at once.
//!
//! # Concurrency
//!
//! ```text
//! task A ── update("101") ─┐
//! task B ── update("102") ─┼─► spawn_blocking ─► FlatFileStore::modify ─► lock ─► backup ─► rename
//! task C ── project("101") ┘                     (readers take no lock)
//! ```

use crate::core::codec::LegacyCodec;
use crate::core::traits::RecordStore;
use crate::types::{AttributeMap, ClientView, ProjectionOptions, Record, RecordError};
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Thread-safe, cloneable async handle to a `LegacyCodec`
#[derive(Debug)]
pub struct AsyncLegacyCodec<S> {
    inner: Arc<LegacyCodec<S>>,
    max_concurrent: usize,
}

impl<S> Clone for AsyncLegacyCodec<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            max_concurrent: self.max_concurrent,
        }
    }
}

impl<S: RecordStore + 'static> AsyncLegacyCodec<S> {
    /// Wrap a codec; `project_many` runs up to one projection per CPU core
    pub fn new(codec: LegacyCodec<S>) -> Self {
        Self {
            inner: Arc::new(codec),
            max_concurrent: num_cpus::get(),
        }
    }

    /// Override the `project_many` concurrency limit
    ///
    /// A limit of 0 falls back to the number of CPU cores.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = if max_concurrent == 0 {
            num_cpus::get()
        } else {
            max_concurrent
        };
        self
    }

    pub fn codec(&self) -> &LegacyCodec<S> {
        &self.inner
    }

    async fn run_blocking<T, F>(&self, f: F) -> Result<T, RecordError>
    where
        T: Send + 'static,
        F: FnOnce(&LegacyCodec<S>) -> Result<T, RecordError> + Send + 'static,
    {
        let codec = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&codec))
            .await
            .map_err(|e| RecordError::io("blocking task failed", e))?
    }

    /// Async form of `LegacyCodec::read`
    pub async fn read(&self, key: &str) -> Result<Record, RecordError> {
        let key = key.to_string();
        self.run_blocking(move |codec| codec.read(&key)).await
    }

    /// Async form of `LegacyCodec::project`
    pub async fn project(
        &self,
        key: &str,
        options: ProjectionOptions,
    ) -> Result<ClientView, RecordError> {
        let key = key.to_string();
        self.run_blocking(move |codec| codec.project(&key, &options))
            .await
    }

    /// Async form of `LegacyCodec::update`
    pub async fn update(&self, key: &str, attribute_map: AttributeMap) -> Result<Record, RecordError> {
        let key = key.to_string();
        self.run_blocking(move |codec| codec.update(&key, &attribute_map))
            .await
    }

    /// Project several keys concurrently
    ///
    /// Results come back in the order of `keys`; each key succeeds or fails
    /// on its own.
    pub async fn project_many(
        &self,
        keys: &[String],
        options: ProjectionOptions,
    ) -> Vec<Result<ClientView, RecordError>> {
        stream::iter(keys.iter().cloned())
            .map(|key| {
                let this = self.clone();
                async move { this.project(&key, options).await }
            })
            .buffered(self.max_concurrent)
            .collect()
            .await
    }
}
