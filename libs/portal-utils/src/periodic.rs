//! Self-rescheduling background task.
//!
//! [`run_periodically`] invokes a refresh function immediately and then again
//! after every `interval`, forever, until the returned [`PeriodicTask`] is
//! cancelled. A failing invocation is logged and the next tick still runs.
//!
//! Cancellation is cooperative: it prevents future invocations but never
//! aborts one that is already running.

use std::future::Future;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Handle to a task started by [`run_periodically`].
///
/// Dropping the handle does not stop the task; call [`PeriodicTask::cancel`].
#[derive(Debug)]
pub struct PeriodicTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Stop scheduling further invocations.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token that cancels this task, for wiring into a shutdown signal.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the task to stop. Only returns after [`Self::cancel`] was
    /// called and any in-flight invocation finished.
    ///
    /// # Errors
    ///
    /// Returns the [`JoinError`] if the refresh function panicked.
    pub async fn join(self) -> Result<(), JoinError> {
        self.handle.await
    }
}

/// Run `refresh` now and then every `interval` until cancelled.
///
/// Must be called from within a Tokio runtime.
#[must_use]
pub fn run_periodically<F, Fut>(name: &str, interval: Duration, mut refresh: F) -> PeriodicTask
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let span = tracing::info_span!("periodic", task = %name);

    let handle = tokio::spawn(
        async move {
            loop {
                if token.is_cancelled() {
                    break;
                }

                if let Err(e) = refresh().await {
                    tracing::error!(error = %e, "Periodic task failed");
                }

                tokio::select! {
                    () = token.cancelled() => break,
                    () = tokio::time::sleep(interval) => {}
                }
            }
            tracing::debug!("Periodic task cancelled");
        }
        .instrument(span),
    );

    PeriodicTask { cancel, handle }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const INTERVAL: Duration = Duration::from_secs(10);

    fn counting(calls: &Arc<AtomicUsize>) -> impl FnMut() -> std::future::Ready<anyhow::Result<()>> + use<> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok(()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_immediately_and_then_every_interval() {
        let calls = Arc::new(AtomicUsize::new(0));
        let task = run_periodically("count", INTERVAL, counting(&calls));

        // t = 0, 10, 20, 30
        tokio::time::sleep(Duration::from_secs(35)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        task.cancel();
        task.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn failures_do_not_stop_the_schedule() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_task = Arc::clone(&calls);
        let task = run_periodically("flaky", INTERVAL, move || {
            let n = calls_in_task.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    anyhow::bail!("upstream unavailable");
                }
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        task.cancel();
        task.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_future_runs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let task = run_periodically("cancel", INTERVAL, counting(&calls));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        task.cancel();
        assert!(task.is_cancelled());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        task.join().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_does_not_abort_in_flight_run() {
        let started = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));
        let (s, f) = (Arc::clone(&started), Arc::clone(&finished));

        let task = run_periodically("slow", INTERVAL, move || {
            let (s, f) = (Arc::clone(&s), Arc::clone(&f));
            async move {
                s.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(5)).await;
                f.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        task.cancellation_token().cancel();
        task.join().await.unwrap();

        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }
}
