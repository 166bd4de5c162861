//! Error types and handling for xstream
//!
//! This module provides the error taxonomy shared by the stream operators
//! and the task wrappers.

use std::time::Duration;
use thiserror::Error;

/// Main error type for xstream operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A size or count argument was rejected (programmer error)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The stream ended without producing the requested element
    #[error("no element")]
    NoElement,
    /// The receiving side of a channel is gone
    #[error("stream closed")]
    Closed,
    /// Operation timed out
    #[error("operation timed out")]
    Timeout,
    /// Operation was cancelled
    #[error("operation cancelled")]
    Cancelled,
    /// A wrapped task panicked
    #[error("task panicked: {0}")]
    Panicked(String),
    /// Every attempt allowed by a retry policy failed
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: usize, last: String },
}

impl From<tokio::time::error::Elapsed> for StreamError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        StreamError::Timeout
    }
}

/// Result type for xstream operations
pub type StreamResult<T> = Result<T, StreamError>;

/// Retry policy for [`crate::task::retry`]
#[derive(Debug, Clone)]
pub enum RetryPolicy {
    /// No retries
    None,
    /// Immediate retry up to max_retries
    Immediate { max_retries: usize },
    /// Fixed delay between retries
    Fixed { max_retries: usize, delay: Duration },
    /// Exponential backoff
    Exponential {
        max_retries: usize,
        initial_delay: Duration,
        multiplier: f64,
    },
}

impl RetryPolicy {
    /// Number of retries allowed after the first attempt
    pub fn max_retries(&self) -> usize {
        match self {
            RetryPolicy::None => 0,
            RetryPolicy::Immediate { max_retries }
            | RetryPolicy::Fixed { max_retries, .. }
            | RetryPolicy::Exponential { max_retries, .. } => *max_retries,
        }
    }

    /// Delay to wait before retry number `retry` (0-based).
    ///
    /// Exponential delays saturate at [`Duration::MAX`].
    pub fn delay_for(&self, retry: usize) -> Duration {
        match self {
            RetryPolicy::None | RetryPolicy::Immediate { .. } => Duration::ZERO,
            RetryPolicy::Fixed { delay, .. } => *delay,
            RetryPolicy::Exponential {
                initial_delay,
                multiplier,
                ..
            } => {
                let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
                let secs = initial_delay.as_secs_f64() * multiplier.powi(exponent);
                Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Immediate { max_retries: 3 }
    }
}
