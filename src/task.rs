//! Task wrappers: run a future on its own task with panic capture,
//! a deadline, an external cancel signal, or a retry policy.

use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};

use crate::error::{RetryPolicy, StreamError, StreamResult};

/// Run `fut` on a new task. A panic inside it is returned as [`StreamError::Panicked`].
pub async fn run<F, T>(fut: F) -> StreamResult<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    joined(tokio::spawn(fut).await)
}

/// Run `fut` on a new task, aborting it once `timeout` elapses.
pub async fn run_with_timeout<F, T>(timeout: Duration, fut: F) -> StreamResult<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(fut);
    let abort = handle.abort_handle();
    match tokio::time::timeout(timeout, handle).await {
        Ok(result) => joined(result),
        Err(elapsed) => {
            abort.abort();
            log::debug!("task aborted after {:?}", timeout);
            Err(elapsed.into())
        }
    }
}

/// Run `fut` on a new task until it finishes or `cancel` resolves, whichever comes first.
pub async fn run_until<F, T, C>(fut: F, cancel: C) -> StreamResult<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
    C: Future<Output = ()>,
{
    let mut handle: JoinHandle<T> = tokio::spawn(fut);
    tokio::select! {
        result = &mut handle => joined(result),
        _ = cancel => {
            handle.abort();
            Err(StreamError::Cancelled)
        }
    }
}

/// Call `f` until it succeeds, following `policy` between attempts.
pub async fn retry<F, Fut, T, E>(policy: RetryPolicy, mut f: F) -> StreamResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.max_retries() + 1;
    let mut last = String::new();
    for attempt in 0..attempts {
        if attempt > 0 {
            let delay = policy.delay_for(attempt - 1);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                log::warn!("attempt {}/{} failed: {}", attempt + 1, attempts, e);
                last = e.to_string();
            }
        }
    }
    Err(StreamError::RetriesExhausted { attempts, last })
}

fn joined<T>(result: Result<T, JoinError>) -> StreamResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_panic() => Err(StreamError::Panicked(panic_message(&*e.into_panic()))),
        Err(_) => Err(StreamError::Cancelled),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
