use std::future::Future;
use std::time::Duration;

/// Outcome of racing an operation against a timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timed<T> {
    Completed(T),
    TimedOut,
}

impl<T> Timed<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Timed::Completed(value) => Some(value),
            Timed::TimedOut => None,
        }
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, Timed::TimedOut)
    }
}

/// Run `operation` until it finishes or `limit` elapses, whichever is first.
/// The losing operation is dropped, so its result is never observed.
pub async fn race_timeout<F>(limit: Duration, operation: F) -> Timed<F::Output>
where
    F: Future,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(output) => Timed::Completed(output),
        Err(_) => Timed::TimedOut,
    }
}
