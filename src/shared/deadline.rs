//! Deadline-bounded execution of a unit of work.
//!
//! The unit of work runs as its own task and receives a cancellation token
//! derived from the deadline. When the timer wins the race the caller gets
//! `DeadlineError::Elapsed` immediately and the token is cancelled; the work
//! is expected to observe the token at its own await points and unwind
//! instead of running to completion unsupervised.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Error returned by [`DeadlineGuard::run`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DeadlineError {
    /// The deadline elapsed before the unit of work finished.
    #[error("deadline elapsed")]
    Elapsed,

    /// The unit of work panicked or was aborted before producing a result.
    #[error("unit of work aborted: {0}")]
    Aborted(String),
}

/// Wraps execution of a unit of work with a maximum duration.
#[derive(Debug, Clone, Copy)]
pub struct DeadlineGuard {
    deadline: Duration,
}

impl DeadlineGuard {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Race the unit of work against the deadline.
    ///
    /// The work is handed a child [`CancellationToken`]; if the deadline
    /// elapses first the token is cancelled and the work's eventual result
    /// is discarded.
    pub async fn run<F, Fut, T>(&self, work: F) -> Result<T, DeadlineError>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let token = CancellationToken::new();
        let mut handle = tokio::spawn(work(token.child_token()));

        tokio::select! {
            result = &mut handle => {
                result.map_err(|e| DeadlineError::Aborted(e.to_string()))
            }
            _ = tokio::time::sleep(self.deadline) => {
                token.cancel();
                Err(DeadlineError::Elapsed)
            }
        }
    }
}
