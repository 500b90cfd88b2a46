use crate::config::Config;
use crate::error::{Error, Result};
use crate::executor::{Dispatcher, Task, Worker};
use crate::scheduler::Coordinator;
use crate::telemetry::{Metrics, RunReport};
use crossbeam_channel::bounded;
use std::thread;
use tracing::{debug, error};

/// Runs task lists on a bounded pool of worker threads.
///
/// Every call to [`run`](Self::run) starts its own dispatcher and workers and
/// joins all of them before returning; nothing outlives the call.
#[derive(Debug, Clone)]
pub struct Runner {
    config: Config,
}

impl Runner {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every task and return the aggregate verdict.
    ///
    /// Fails with [`Error::ErrorsLimitExceeded`] once more than
    /// `max_errors` tasks have failed. Individual task errors are never
    /// returned.
    pub fn run(&self, tasks: Vec<Task<'_>>) -> Result<()> {
        self.run_with_report(tasks)?.into_result()
    }

    /// Like [`run`](Self::run) but returns the full report for both
    /// outcomes. `Err` is reserved for failures to start the run.
    pub fn run_with_report(&self, tasks: Vec<Task<'_>>) -> Result<RunReport> {
        let total = tasks.len();
        let tolerance = self.config.error_tolerance();
        let coordinator = Coordinator::new(tolerance, Metrics::new(self.config.record_latency));

        if tasks.is_empty() {
            return Ok(coordinator.into_report(0, 0));
        }

        // extra workers would only find a closed channel
        let workers = self.config.worker_threads().min(total);
        debug!(tasks = total, workers, tolerance, "starting run");

        let started = thread::scope(|scope| {
            let (sender, receiver) = bounded(0);
            let mut handles = Vec::with_capacity(workers);
            let mut spawn_error = None;

            for id in 0..workers {
                let worker = Worker::new(id, receiver.clone(), &coordinator);
                let name = format!("{}-{}", self.config.thread_name_prefix, id);
                match self.thread_builder(name).spawn_scoped(scope, move || worker.run()) {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        spawn_error = Some(Error::executor(format!("spawn failed: {}", e)));
                        break;
                    }
                }
            }
            // workers hold the only receivers from here on
            drop(receiver);

            let dispatcher = if spawn_error.is_none() {
                let name = format!("{}-dispatch", self.config.thread_name_prefix);
                let dispatcher = Dispatcher::new(tasks, sender, &coordinator);
                match self.thread_builder(name).spawn_scoped(scope, move || dispatcher.run()) {
                    Ok(handle) => Some(handle),
                    Err(e) => {
                        spawn_error = Some(Error::executor(format!("spawn failed: {}", e)));
                        None
                    }
                }
            } else {
                None
            };

            if let Some(err) = &spawn_error {
                error!(error = %err, "could not start run, cancelling");
                coordinator.abort();
            }

            let mut crashed = 0;
            if let Some(handle) = dispatcher {
                if handle.join().is_err() {
                    crashed += 1;
                }
            }
            for handle in handles {
                if handle.join().is_err() {
                    crashed += 1;
                }
            }

            match spawn_error {
                Some(err) => Err(err),
                None if crashed > 0 => Err(Error::executor(format!(
                    "{} runner thread(s) panicked",
                    crashed
                ))),
                None => Ok(()),
            }
        });
        started?;

        let report = coordinator.into_report(total, workers);
        debug!(
            executed = report.metrics.executed,
            failed = report.metrics.failed,
            skipped = report.skipped(),
            aborted = report.aborted,
            "run finished"
        );
        Ok(report)
    }

    fn thread_builder(&self, name: String) -> thread::Builder {
        let mut builder = thread::Builder::new().name(name);
        if let Some(stack_size) = self.config.stack_size {
            builder = builder.stack_size(stack_size);
        }
        builder
    }
}

/// Run `tasks` on `n` workers, aborting once more than `m` of them fail.
///
/// A negative `m` tolerates no failures. An empty task list succeeds for any
/// `n`; otherwise `n == 0` is rejected with [`Error::Config`].
pub fn run(tasks: Vec<Task<'_>>, n: usize, m: i64) -> Result<()> {
    if tasks.is_empty() {
        return Ok(());
    }

    let config = Config::builder().num_workers(n).max_errors(m).build()?;
    Runner::new(config)?.run(tasks)
}
