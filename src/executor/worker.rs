// worker thread stuff
use super::task::{Task, TaskId};
use crate::scheduler::Coordinator;
use crossbeam_channel::{select, Receiver};
use std::time::Instant;
use tracing::debug;

pub(crate) type WorkerId = usize;

pub(crate) struct Worker<'run, 'task> {
    pub id: WorkerId,
    tasks: Receiver<(TaskId, Task<'task>)>,
    coordinator: &'run Coordinator,
}

impl<'run, 'task> Worker<'run, 'task> {
    pub fn new(
        id: WorkerId,
        tasks: Receiver<(TaskId, Task<'task>)>,
        coordinator: &'run Coordinator,
    ) -> Self {
        Self {
            id,
            tasks,
            coordinator,
        }
    }

    // main loop
    pub fn run(self) {
        debug!(worker = self.id, "worker started");
        let mut executed = 0usize;

        loop {
            if self.coordinator.is_cancelled() {
                break;
            }

            let Some((task_id, task)) = self.next_task() else {
                break;
            };

            // a task that made it off the channel always runs to completion
            let start = Instant::now();
            let outcome = task.execute();
            self.coordinator
                .report(self.id, task_id, outcome, start.elapsed());
            executed += 1;
        }

        debug!(
            worker = self.id,
            executed,
            cancelled = self.coordinator.is_cancelled(),
            "worker exiting"
        );
    }

    /// Block until the dispatcher hands over a task. `None` once the
    /// dispatcher is done or the run is cancelled.
    fn next_task(&self) -> Option<(TaskId, Task<'task>)> {
        select! {
            recv(self.tasks) -> msg => msg.ok(),
            recv(self.coordinator.cancel_signal().done()) -> _ => None,
        }
    }
}
