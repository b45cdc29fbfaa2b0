// ============================================================================
// Execution Context
// ============================================================================
//
// Carries a cancellation signal and an optional deadline through a
// transaction run. Drivers consult it before and while talking to the
// database; the runner only passes it along.
//
// ============================================================================

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Why a context is done.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cancellation and deadline carrier.
///
/// Cloning a context (or deriving one with [`Context::with_timeout`]) shares
/// the cancellation signal: cancelling any of them cancels all of them.
/// Deadlines only ever get tighter when derived.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use txwrapper::Context;
///
/// let ctx = Context::background().with_timeout(Duration::from_secs(5));
/// assert!(ctx.check().is_ok());
///
/// ctx.cancel();
/// assert!(ctx.check().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    state: Arc<CancelState>,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never done unless cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context that expires at `deadline`, or at the current
    /// deadline if that is earlier.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        };

        Self {
            state: Arc::clone(&self.state),
            deadline: Some(deadline),
        }
    }

    /// Derive a context that expires after `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel this context and every context sharing its signal.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        self.state.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Returns why the context is done, or `None` while it is still live.
    ///
    /// Cancellation wins over an expired deadline.
    pub fn err(&self) -> Option<ContextError> {
        if self.is_cancelled() {
            return Some(ContextError::Cancelled);
        }

        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn check(&self) -> Result<(), ContextError> {
        match self.err() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> ContextError {
        let cancelled = async {
            loop {
                // Registered before the flag is read so a concurrent
                // `cancel` cannot slip between the check and the wait.
                let notified = self.state.notify.notified();
                if self.is_cancelled() {
                    return;
                }
                notified.await;
            }
        };

        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = cancelled => ContextError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => ContextError::DeadlineExceeded,
            },
            None => {
                cancelled.await;
                ContextError::Cancelled
            }
        }
    }

    /// Drive `fut` to completion unless the context is done first.
    ///
    /// An already-done context fails without polling `fut`. When both are
    /// ready, the future's output is preferred.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, ContextError>
    where
        F: Future,
    {
        self.check()?;

        tokio::select! {
            biased;
            output = fut => Ok(output),
            err = self.done() => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_live() {
        let ctx = Context::background();
        assert!(ctx.err().is_none());
        assert!(ctx.deadline().is_none());
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn test_cancel_is_shared_with_clones() {
        let parent = Context::background();
        let child = parent.with_timeout(Duration::from_secs(60));

        child.cancel();
        assert_eq!(parent.err(), Some(ContextError::Cancelled));
        assert_eq!(child.err(), Some(ContextError::Cancelled));
    }

    #[test]
    fn test_derived_deadline_never_extends() {
        let ctx = Context::background().with_timeout(Duration::from_secs(1));
        let wider = ctx.with_timeout(Duration::from_secs(3600));
        assert_eq!(wider.deadline(), ctx.deadline());

        let tighter = ctx.with_timeout(Duration::from_millis(1));
        assert!(tighter.deadline() < ctx.deadline());
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = Context::background().with_timeout(Duration::ZERO);
        assert_eq!(ctx.check(), Err(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_run_skips_future_when_already_cancelled() {
        let ctx = Context::background();
        ctx.cancel();

        let mut polled = false;
        let result = ctx
            .run(async {
                polled = true;
            })
            .await;

        assert_eq!(result, Err(ContextError::Cancelled));
        assert!(!polled);
    }

    #[tokio::test]
    async fn test_run_returns_output() {
        let ctx = Context::background().with_timeout(Duration::from_secs(30));
        let result = ctx.run(async { 42 }).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_run_stops_at_deadline() {
        let ctx = Context::background().with_timeout(Duration::from_millis(20));
        let result = ctx.run(std::future::pending::<()>()).await;
        assert_eq!(result, Err(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_cancel_wakes_pending_run() {
        let ctx = Context::background();
        let canceller = ctx.clone();

        let handle = tokio::spawn(async move {
            ctx.run(std::future::pending::<()>()).await
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        canceller.cancel();

        let result = handle.await.unwrap();
        assert_eq!(result, Err(ContextError::Cancelled));
    }
}
