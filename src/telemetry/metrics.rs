//! Per-run counters and task latency.

use crate::error::{Error, Result};
use hdrhistogram::Histogram;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters for a single run. Created with the run and dropped with it.
#[derive(Debug)]
pub struct Metrics {
    tasks_dispatched: AtomicU64,
    tasks_succeeded: AtomicU64,
    tasks_failed: AtomicU64,
    tasks_panicked: AtomicU64,

    // None when latency recording is switched off in the config
    latency_histogram: Option<Mutex<Histogram<u64>>>,

    start_time: Instant,
}

impl Metrics {
    pub fn new(record_latency: bool) -> Self {
        // 3 significant figures is always a valid precision, and the
        // histogram auto-resizes, so creation has no real failure mode
        let latency_histogram = record_latency
            .then(|| Histogram::new(3).ok())
            .flatten()
            .map(Mutex::new);

        Self {
            tasks_dispatched: AtomicU64::new(0),
            tasks_succeeded: AtomicU64::new(0),
            tasks_failed: AtomicU64::new(0),
            tasks_panicked: AtomicU64::new(0),
            latency_histogram,
            start_time: Instant::now(),
        }
    }

    pub fn record_dispatch(&self) {
        self.tasks_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, elapsed: Duration) {
        self.tasks_succeeded.fetch_add(1, Ordering::Relaxed);
        self.record_latency(elapsed);
    }

    /// A task that returned an error. Panics go through
    /// [`record_panic`](Self::record_panic) and are counted in both.
    pub fn record_failure(&self, elapsed: Duration) {
        self.tasks_failed.fetch_add(1, Ordering::Relaxed);
        self.record_latency(elapsed);
    }

    pub fn record_panic(&self, elapsed: Duration) {
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
        self.record_failure(elapsed);
    }

    fn record_latency(&self, elapsed: Duration) {
        if let Some(histogram) = &self.latency_histogram {
            let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
            histogram.lock().saturating_record(nanos);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let (avg, p50, p99, max) = match &self.latency_histogram {
            Some(histogram) => {
                let histogram = histogram.lock();
                if histogram.len() > 0 {
                    (
                        histogram.mean() as u64,
                        histogram.value_at_quantile(0.50),
                        histogram.value_at_quantile(0.99),
                        histogram.max(),
                    )
                } else {
                    (0, 0, 0, 0)
                }
            }
            None => (0, 0, 0, 0),
        };

        let succeeded = self.tasks_succeeded.load(Ordering::Relaxed);
        let failed = self.tasks_failed.load(Ordering::Relaxed);

        MetricsSnapshot {
            elapsed: self.start_time.elapsed(),
            dispatched: self.tasks_dispatched.load(Ordering::Relaxed),
            executed: succeeded + failed,
            succeeded,
            failed,
            panicked: self.tasks_panicked.load(Ordering::Relaxed),
            avg_latency_ns: avg,
            p50_latency_ns: p50,
            p99_latency_ns: p99,
            max_latency_ns: max,
        }
    }
}

/// Counters at a point in time.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub elapsed: Duration,
    pub dispatched: u64,
    pub executed: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub panicked: u64,
    pub avg_latency_ns: u64,
    pub p50_latency_ns: u64,
    pub p99_latency_ns: u64,
    pub max_latency_ns: u64,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Tasks handed to the runner.
    pub total: usize,
    /// Worker threads started for the run.
    pub workers: usize,
    /// Failures the run was allowed to absorb.
    pub tolerated: usize,
    /// Whether failures exceeded the tolerance.
    pub aborted: bool,
    pub metrics: MetricsSnapshot,
}

impl RunReport {
    /// Tasks never handed to a worker because the run was cancelled first.
    pub fn skipped(&self) -> usize {
        self.total
            .saturating_sub(usize::try_from(self.metrics.dispatched).unwrap_or(usize::MAX))
    }

    /// The aggregate verdict: `ErrorsLimitExceeded` when aborted.
    pub fn into_result(self) -> Result<()> {
        if self.aborted {
            return Err(Error::ErrorsLimitExceeded {
                failed: usize::try_from(self.metrics.failed).unwrap_or(usize::MAX),
                tolerated: self.tolerated,
            });
        }
        Ok(())
    }
}
