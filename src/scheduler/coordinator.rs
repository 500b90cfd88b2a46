//! Failure accounting and the abort decision.

use crate::error::{Error, Result};
use crate::executor::task::{TaskId, TaskOutcome};
use crate::executor::worker::WorkerId;
use crate::telemetry::{Metrics, RunReport};
use crate::util::CancelSignal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{info, trace, warn};

/// Counts task failures for one run and cancels it once they exceed the
/// tolerance.
///
/// Workers report into it concurrently; the failure counter is a single
/// atomic so each failure is counted exactly once, and only the report that
/// moves the count from `tolerance` to `tolerance + 1` raises the signal.
#[derive(Debug)]
pub(crate) struct Coordinator {
    tolerance: usize,
    failures: AtomicUsize,
    cancel: CancelSignal,
    metrics: Metrics,
}

impl Coordinator {
    pub fn new(tolerance: usize, metrics: Metrics) -> Self {
        Self {
            tolerance,
            failures: AtomicUsize::new(0),
            cancel: CancelSignal::new(),
            metrics,
        }
    }

    pub fn cancel_signal(&self) -> &CancelSignal {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Acquire)
    }

    /// Record the outcome of a task a worker has finished.
    pub fn report(&self, worker: WorkerId, task: TaskId, outcome: TaskOutcome, elapsed: Duration) {
        match outcome {
            TaskOutcome::Succeeded => {
                trace!(worker, task = %task, "task succeeded");
                self.metrics.record_success(elapsed);
            }
            TaskOutcome::Failed(err) => {
                warn!(worker, task = %task, error = %err, "task failed");
                self.metrics.record_failure(elapsed);
                self.record_failure();
            }
            TaskOutcome::Panicked(panic) => {
                warn!(worker, task = %task, panic = %panic.message, "task panicked");
                self.metrics.record_panic(elapsed);
                self.record_failure();
            }
        }
    }

    fn record_failure(&self) {
        let failed = self.failures.fetch_add(1, Ordering::AcqRel) + 1;
        if failed - 1 == self.tolerance {
            info!(
                failed,
                tolerated = self.tolerance,
                "errors limit exceeded, cancelling run"
            );
            self.cancel.cancel();
        }
    }

    /// Stop the run for a reason other than failures (e.g. a thread could
    /// not be spawned).
    pub fn abort(&self) {
        self.cancel.cancel();
    }

    /// The final verdict. Only meaningful once every worker has been joined.
    pub fn verdict(&self) -> Result<()> {
        let failed = self.failures();
        if failed > self.tolerance {
            return Err(Error::ErrorsLimitExceeded {
                failed,
                tolerated: self.tolerance,
            });
        }
        Ok(())
    }

    pub fn into_report(self, total: usize, workers: usize) -> RunReport {
        RunReport {
            total,
            workers,
            tolerated: self.tolerance,
            aborted: self.verdict().is_err(),
            metrics: self.metrics.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn coordinator(tolerance: usize) -> Coordinator {
        Coordinator::new(tolerance, Metrics::new(true))
    }

    fn fail(coordinator: &Coordinator) {
        coordinator.report(
            0,
            TaskId(0),
            TaskOutcome::Failed("boom".into()),
            Duration::from_micros(1),
        );
    }

    #[test]
    fn test_zero_tolerance_cancels_on_first_failure() {
        let coordinator = coordinator(0);
        assert!(!coordinator.is_cancelled());

        fail(&coordinator);
        assert!(coordinator.is_cancelled());
        assert!(coordinator.verdict().is_err());
    }

    #[test]
    fn test_tolerated_failures_do_not_cancel() {
        let coordinator = coordinator(2);

        fail(&coordinator);
        fail(&coordinator);
        assert!(!coordinator.is_cancelled());
        assert!(coordinator.verdict().is_ok());

        fail(&coordinator);
        assert!(coordinator.is_cancelled());
        assert_eq!(coordinator.failures(), 3);
    }

    #[test]
    fn test_successes_never_cancel() {
        let coordinator = coordinator(0);
        for i in 0..10 {
            coordinator.report(
                i % 3,
                TaskId(i),
                TaskOutcome::Succeeded,
                Duration::from_micros(1),
            );
        }
        assert!(!coordinator.is_cancelled());

        let report = coordinator.into_report(10, 3);
        assert!(!report.aborted);
        assert_eq!(report.metrics.succeeded, 10);
    }

    #[test]
    fn test_panic_counts_as_failure() {
        let coordinator = coordinator(0);
        let outcome = crate::executor::Task::new(|| panic!("oops")).execute();
        coordinator.report(0, TaskId(0), outcome, Duration::from_micros(1));

        assert_eq!(coordinator.failures(), 1);
        let report = coordinator.into_report(1, 1);
        assert!(report.aborted);
        assert_eq!(report.metrics.panicked, 1);
    }

    #[test]
    fn test_concurrent_failures_are_not_lost() {
        let coordinator = Arc::new(coordinator(1000));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let coordinator = coordinator.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        fail(&coordinator);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(coordinator.failures(), 800);
        assert!(!coordinator.is_cancelled());
    }

    #[test]
    fn test_abort_without_failures() {
        let coordinator = coordinator(0);
        coordinator.abort();
        coordinator.abort();
        assert!(coordinator.is_cancelled());
        assert!(coordinator.verdict().is_ok());
    }
}
