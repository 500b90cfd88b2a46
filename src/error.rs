pub type Result<T> = std::result::Result<T, Error>;

/// Error a single task may return. Anything convertible into it (any
/// `std::error::Error + Send + Sync`, `&str`, `String`) works as a task error.
pub type TaskError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// More tasks failed than the configured tolerance allows.
    #[error("errors limit exceeded: {failed} task failures, {tolerated} tolerated")]
    ErrorsLimitExceeded { failed: usize, tolerated: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error("executor error: {0}")]
    Executor(String),
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn executor<S: Into<String>>(msg: S) -> Self {
        Error::Executor(msg.into())
    }

    /// True for the aggregate abort, the only error a run itself produces.
    pub fn is_limit_exceeded(&self) -> bool {
        matches!(self, Error::ErrorsLimitExceeded { .. })
    }
}
