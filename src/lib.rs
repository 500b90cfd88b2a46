//! parallel-rs - bounded parallel task runner
//!
//! Runs a list of independent tasks on a fixed number of worker threads and
//! gives up as soon as more tasks have failed than the caller is willing to
//! tolerate.
//!
//! # Quick Start
//!
//! ```no_run
//! use parallel_rs::prelude::*;
//!
//! let tasks = vec![
//!     Task::new(|| Ok(())),
//!     Task::new(|| Err("disk full".into())),
//!     Task::new(|| Ok(())),
//! ];
//!
//! // two workers, one failure tolerated
//! parallel_rs::run(tasks, 2, 1).unwrap();
//! ```
//!
//! # Behavior
//!
//! - **Bounded parallelism**: at most `n` tasks execute at the same time
//! - **Error threshold**: the `(m + 1)`-th failure cancels the run; tasks not
//!   yet handed to a worker are skipped, tasks already running finish
//! - **Panic isolation**: a panicking task counts as a failed one
//! - **No leaks**: every thread a run starts is joined before it returns
//! - **Borrowing tasks**: tasks may borrow from the caller's stack

// Lint configuration
#![warn(missing_debug_implementations)]

// Core modules
pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod runner;
pub(crate) mod scheduler;
pub mod telemetry;
pub(crate) mod util;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result, TaskError};
pub use executor::{Task, TaskId};
pub use runner::{run, Runner};
pub use telemetry::{MetricsSnapshot, RunReport};
