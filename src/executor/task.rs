//! Task representation and execution.

use super::panic_handler::{catch_panic, PanicInfo};
use crate::error::TaskError;
use std::fmt;

/// Position of a task in the list handed to the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) usize);

impl TaskId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A zero-argument unit of work, run at most once.
///
/// The closure may borrow from the caller: workers are scoped threads that
/// are always joined before the runner returns.
pub struct Task<'a> {
    func: Box<dyn FnOnce() -> Result<(), TaskError> + Send + 'a>,
}

impl<'a> Task<'a> {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<(), TaskError> + Send + 'a,
    {
        Task { func: Box::new(f) }
    }

    /// Run the task, turning a panic into a [`TaskOutcome::Panicked`].
    pub(crate) fn execute(self) -> TaskOutcome {
        match catch_panic(self.func) {
            Ok(Ok(())) => TaskOutcome::Succeeded,
            Ok(Err(err)) => TaskOutcome::Failed(err),
            Err(info) => TaskOutcome::Panicked(info),
        }
    }
}

impl fmt::Debug for Task<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}

/// What happened when a worker ran a task.
#[derive(Debug)]
pub(crate) enum TaskOutcome {
    Succeeded,
    Failed(TaskError),
    Panicked(PanicInfo),
}

impl TaskOutcome {
    pub(crate) fn is_failure(&self) -> bool {
        !matches!(self, TaskOutcome::Succeeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_task_success() {
        let runs = AtomicUsize::new(0);
        let task = Task::new(|| {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let outcome = task.execute();
        assert!(matches!(outcome, TaskOutcome::Succeeded));
        assert!(!outcome.is_failure());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_task_error() {
        let task = Task::new(|| Err("Error during calculation".into()));

        match task.execute() {
            TaskOutcome::Failed(err) => assert_eq!(err.to_string(), "Error during calculation"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_task_question_mark_converts_errors() {
        let task = Task::new(|| {
            let _n: u32 = "not a number".parse()?;
            Ok(())
        });
        assert!(task.execute().is_failure());
    }

    #[test]
    fn test_task_panic_is_captured() {
        let task = Task::new(|| panic!("kaboom"));

        match task.execute() {
            TaskOutcome::Panicked(info) => assert_eq!(info.message, "kaboom"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_task_id_display() {
        assert_eq!(TaskId(7).to_string(), "#7");
        assert_eq!(TaskId(7).index(), 7);
    }
}
