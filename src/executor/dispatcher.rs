//! Feeds tasks to the worker pool, one hand-off at a time.

use super::task::{Task, TaskId};
use crate::scheduler::Coordinator;
use crossbeam_channel::{select, Sender};
use tracing::debug;

/// Owns the task list for the duration of a run.
///
/// The sender is a rendezvous channel: a send completes only when a worker
/// takes the task, so "dispatched" and "accepted by a worker" are the same
/// event. Dropping the sender at the end tells idle workers there is no more
/// work.
pub(crate) struct Dispatcher<'run, 'task> {
    tasks: Vec<Task<'task>>,
    sender: Sender<(TaskId, Task<'task>)>,
    coordinator: &'run Coordinator,
}

impl<'run, 'task> Dispatcher<'run, 'task> {
    pub fn new(
        tasks: Vec<Task<'task>>,
        sender: Sender<(TaskId, Task<'task>)>,
        coordinator: &'run Coordinator,
    ) -> Self {
        Self {
            tasks,
            sender,
            coordinator,
        }
    }

    /// Returns the number of tasks handed to workers.
    pub fn run(self) -> usize {
        let Self {
            tasks,
            sender,
            coordinator,
        } = self;

        let total = tasks.len();
        let mut dispatched = 0;

        for (index, task) in tasks.into_iter().enumerate() {
            if coordinator.is_cancelled() {
                break;
            }

            let id = TaskId(index);
            // a failed send means every worker is gone; the task comes back
            // inside the error and is dropped with it
            let delivered = select! {
                send(sender, (id, task)) -> res => res.is_ok(),
                recv(coordinator.cancel_signal().done()) -> _ => false,
            };
            if !delivered {
                break;
            }

            coordinator.metrics().record_dispatch();
            dispatched += 1;
        }

        debug!(
            dispatched,
            skipped = total - dispatched,
            cancelled = coordinator.is_cancelled(),
            "dispatcher finished"
        );
        dispatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::Metrics;
    use crossbeam_channel::bounded;
    use std::thread;

    fn coordinator() -> Coordinator {
        Coordinator::new(0, Metrics::new(false))
    }

    fn noop_tasks(n: usize) -> Vec<Task<'static>> {
        (0..n).map(|_| Task::new(|| Ok(()))).collect()
    }

    #[test]
    fn test_dispatch_in_order_exactly_once() {
        let coordinator = coordinator();
        let (tx, rx) = bounded(0);

        let received = thread::scope(|s| {
            let consumer = s.spawn(move || rx.iter().map(|(id, _)| id).collect::<Vec<TaskId>>());
            let dispatched = Dispatcher::new(noop_tasks(6), tx, &coordinator).run();
            assert_eq!(dispatched, 6);
            consumer.join().unwrap()
        });

        let expected: Vec<TaskId> = (0..6).map(TaskId).collect();
        assert_eq!(received, expected);
        assert_eq!(coordinator.metrics().snapshot().dispatched, 6);
    }

    #[test]
    fn test_nothing_dispatched_after_cancel() {
        let coordinator = coordinator();
        let (tx, _rx) = bounded(0);

        coordinator.abort();
        let dispatched = Dispatcher::new(noop_tasks(3), tx, &coordinator).run();
        assert_eq!(dispatched, 0);
    }

    #[test]
    fn test_blocked_dispatcher_wakes_on_cancel() {
        let coordinator = coordinator();
        // receiver kept alive but never read, so the first send blocks
        let (tx, _rx) = bounded(0);

        let dispatched = thread::scope(|s| {
            let handle = s.spawn(|| Dispatcher::new(noop_tasks(3), tx, &coordinator).run());
            thread::sleep(std::time::Duration::from_millis(10));
            coordinator.abort();
            handle.join().unwrap()
        });

        assert_eq!(dispatched, 0);
    }

    #[test]
    fn test_no_deadlock_when_workers_gone() {
        let coordinator = coordinator();
        let (tx, rx) = bounded(0);
        drop(rx);

        let dispatched = Dispatcher::new(noop_tasks(3), tx, &coordinator).run();
        assert_eq!(dispatched, 0);
        assert!(!coordinator.is_cancelled());
    }
}
