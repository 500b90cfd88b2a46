use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of tasks executing at once. `None` means one per CPU.
    pub num_workers: Option<usize>,
    /// Failures absorbed before the run is aborted. Negative values act as 0.
    pub max_errors: i64,
    pub thread_name_prefix: String,
    pub stack_size: Option<usize>,
    pub record_latency: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_workers: None,
            max_errors: 0,
            thread_name_prefix: "parallel-worker".to_string(),
            stack_size: Some(2 * 1024 * 1024),
            record_latency: true,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_workers == Some(0) {
            return Err(Error::config("num_workers must be > 0"));
        }

        if self.stack_size == Some(0) {
            return Err(Error::config("stack_size must be > 0"));
        }

        Ok(())
    }

    pub fn worker_threads(&self) -> usize {
        self.num_workers.unwrap_or_else(num_cpus::get)
    }

    /// Number of failures tolerated, with negative limits clamped to zero.
    pub fn error_tolerance(&self) -> usize {
        usize::try_from(self.max_errors.max(0)).unwrap_or(usize::MAX)
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn num_workers(mut self, n: usize) -> Self {
        self.config.num_workers = Some(n);
        self
    }

    pub fn max_errors(mut self, m: i64) -> Self {
        self.config.max_errors = m;
        self
    }

    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    pub fn record_latency(mut self, enable: bool) -> Self {
        self.config.record_latency = enable;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
