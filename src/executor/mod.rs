//! Task execution infrastructure.
//!
//! This module provides the task type, the dispatcher that feeds tasks to
//! the pool, and the worker loop that runs them. Only [`Task`] and
//! [`TaskId`] are public; panic capture and worker ids stay inside the
//! crate:
//!
//! ```compile_fail
//! use parallel_rs::executor::panic_handler::PanicInfo;
//! ```
//!
//! ```compile_fail
//! use parallel_rs::executor::WorkerId;
//! ```

pub(crate) mod dispatcher;
pub(crate) mod panic_handler;
pub mod task;
pub(crate) mod worker;

pub use task::{Task, TaskId};

pub(crate) use dispatcher::Dispatcher;
pub(crate) use worker::Worker;
