pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result, TaskError};
pub use crate::executor::{Task, TaskId};
pub use crate::runner::{run, Runner};
pub use crate::telemetry::RunReport;
