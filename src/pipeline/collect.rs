// src/pipeline/collect.rs

//! Fan-out/fan-in collection of independent units of work.
//!
//! One task is spawned per input item. Every task deposits its outcome into a
//! channel sized to the number of items, so no producer ever waits on the
//! consumer. The caller waits for every task to finish, closes the channel,
//! and drains it. Values arrive in completion order, not input order.

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::error::{AppError, Result};
use crate::models::FailurePolicy;

/// Outcome of one collection.
#[derive(Debug)]
pub struct Collected<R> {
    /// Values in completion order
    pub values: Vec<R>,
    /// Units that finished with `Ok(None)`
    pub excluded: usize,
    /// Units that failed or panicked
    pub failures: Vec<AppError>,
    /// Number of units started
    pub total: usize,
}

impl<R> Collected<R> {
    fn empty(total: usize) -> Self {
        Self {
            values: Vec::with_capacity(total),
            excluded: 0,
            failures: Vec::new(),
            total,
        }
    }

    /// Every unit either produced a value or was deliberately excluded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure_messages(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }

    /// Apply a failure policy once the stage has drained.
    ///
    /// Under [`FailurePolicy::Abort`] any failure turns into a single
    /// [`AppError::Collect`]. Under [`FailurePolicy::Continue`] failures are
    /// logged and the collected values are kept.
    pub fn settle(self, stage: &str, policy: FailurePolicy) -> Result<Self> {
        if self.is_complete() {
            return Ok(self);
        }
        match policy {
            FailurePolicy::Abort => Err(AppError::collect(
                stage,
                self.total,
                self.failure_messages(),
            )),
            FailurePolicy::Continue => {
                for failure in &self.failures {
                    if failure.is_fetch() {
                        log::warn!("{stage}: fetch failed: {failure}");
                    } else {
                        log::warn!("{stage}: unit failed: {failure}");
                    }
                }
                Ok(self)
            }
        }
    }
}

/// Spawns one unit per item and joins them all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Collector {
    limit: Option<NonZeroUsize>,
}

impl Collector {
    /// One live unit per item.
    pub fn unbounded() -> Self {
        Self { limit: None }
    }

    /// At most `limit` live units; zero means unbounded.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: NonZeroUsize::new(limit),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit.map(NonZeroUsize::get)
    }

    /// Run `work` over every item and gather the outcomes.
    ///
    /// `Ok(Some(v))` is collected, `Ok(None)` counts as excluded and `Err`
    /// is kept as a failure. A failing or panicking unit never stops its
    /// siblings.
    pub async fn collect<T, R, F, Fut>(&self, items: Vec<T>, work: F) -> Collected<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<Option<R>>> + Send + 'static,
    {
        let total = items.len();
        let mut collected = Collected::empty(total);
        if total == 0 {
            return collected;
        }

        let (tx, mut rx) = mpsc::channel::<Result<Option<R>>>(total);
        let permits = self.limit.map(|n| Arc::new(Semaphore::new(n.get())));
        let mut units = JoinSet::new();

        for item in items {
            let tx = tx.clone();
            let permits = permits.clone();
            let unit = work(item);

            units.spawn(async move {
                let _permit = match permits {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let outcome = unit.await;
                // Capacity equals the unit count; this never waits.
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        while let Some(joined) = units.join_next().await {
            if let Err(e) = joined {
                collected.failures.push(AppError::Task(e));
            }
        }

        rx.close();
        while let Some(outcome) = rx.recv().await {
            match outcome {
                Ok(Some(value)) => collected.values.push(value),
                Ok(None) => collected.excluded += 1,
                Err(e) => collected.failures.push(e),
            }
        }

        collected
    }
}
