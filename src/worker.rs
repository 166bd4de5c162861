//! Bounded concurrency: a counting [`Gate`] and a [`Worker`] that runs
//! tasks through one.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{StreamError, StreamResult};
use crate::stream_configuration::bounded_capacity;
use crate::task;

/// Counting semaphore limiting how many holders may be active at once.
#[derive(Debug, Clone)]
pub struct Gate {
    semaphore: Arc<Semaphore>,
    size: usize,
}

/// A slot in a [`Gate`], released on drop.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl Gate {
    /// A gate with `size` slots. A size of zero is raised to one.
    pub fn new(size: usize) -> Self {
        let size = bounded_capacity(size);
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Slots currently held.
    pub fn in_flight(&self) -> usize {
        self.size - self.semaphore.available_permits()
    }

    /// Wait for a free slot.
    pub async fn acquire(&self) -> StreamResult<GatePermit> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| StreamError::Closed)?;
        Ok(GatePermit { _permit: permit })
    }
}

/// Runs futures on their own tasks, never more than `size` at a time.
#[derive(Debug, Clone)]
pub struct Worker {
    gate: Gate,
}

impl Worker {
    pub fn new(size: usize) -> Self {
        Self {
            gate: Gate::new(size),
        }
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// Wait for a slot, then run `fut` to completion.
    pub async fn run<F, T>(&self, fut: F) -> StreamResult<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self.gate.acquire().await?;
        task::run(fut).await
    }

    /// Wait for a slot, then run `fut` with a deadline.
    pub async fn run_with_timeout<F, T>(&self, timeout: Duration, fut: F) -> StreamResult<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self.gate.acquire().await?;
        task::run_with_timeout(timeout, fut).await
    }
}
