use crate::error::{Error, Result};

/// Pool configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of worker threads. 0 means one per hardware thread.
    pub worker_threads: u32,

    /// Prefix for worker thread names (an index is appended).
    pub thread_name_prefix: String,

    /// Stack size for worker threads, in bytes.
    pub stack_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            thread_name_prefix: "jobpool-worker".to_string(),
            stack_size: Some(2 * 1024 * 1024),
        }
    }
}

impl Config {
    /// Start building a configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Check the configuration for invalid values.
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads > 1024 {
            return Err(Error::config("worker_threads too large (max 1024)"));
        }

        if self.thread_name_prefix.is_empty() {
            return Err(Error::config("thread_name_prefix must not be empty"));
        }

        Ok(())
    }

    /// The worker count the pool will actually spawn: the configured count,
    /// or one per hardware thread when 0 (never less than 1).
    pub fn resolved_worker_threads(&self) -> u32 {
        if self.worker_threads != 0 {
            return self.worker_threads;
        }

        num_cpus::get().max(1) as u32
    }
}

/// Builder for [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder holding the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the number of worker threads (0 = auto).
    pub fn worker_threads(mut self, n: u32) -> Self {
        self.config.worker_threads = n;
        self
    }

    /// Set the worker thread name prefix.
    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// Set the worker thread stack size in bytes.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    /// Validate and produce the configuration.
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
