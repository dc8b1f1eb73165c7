//! Named logger registry.
//!
//! # Responsibilities
//! - Build every configured logger exactly once
//! - Publish loggers by name, first registration wins
//! - Always hand back a usable logger, falling back to "default"
//!
//! # Data Flow
//! ```text
//! ProcessEnv → RegistryBuilder::build → LoggerRegistry (immutable)
//!                                            ↓
//!                          resolve(["a", "b"]) → &LoggerHandle
//! ```
//!
//! # Design Decisions
//! - The registry is a plain value; owners pass it (or its handles) around
//! - Nothing is mutated after construction, so lookups take no locks
//! - Every degradation is recorded as an [`InitEvent`]
//! - A process-wide instance is available through [`global`] for callers
//!   that cannot thread the registry through

pub mod builder;
pub mod events;
pub mod global;

use std::collections::HashMap;

use thiserror::Error;
use tracing::dispatcher::SetGlobalDefaultError;
use tracing_log::log::SetLoggerError;
use tracing_log::LogTracer;

use crate::config::{ProcessEnv, DEFAULT_LOGGER};
use crate::logging::LoggerHandle;

pub use builder::RegistryBuilder;
pub use events::InitEvent;
pub use global::{get_or_init_global, global, init_global, logger};

/// Error type for redirecting ambient logging to the default logger.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("a global tracing dispatcher is already set: {0}")]
    Dispatcher(#[from] SetGlobalDefaultError),

    #[error("a global `log` logger is already set: {0}")]
    LogBridge(#[from] SetLoggerError),
}

/// Loggers by name plus the default logger.
#[derive(Debug)]
pub struct LoggerRegistry {
    loggers: HashMap<String, LoggerHandle>,
    default: LoggerHandle,
    events: Vec<InitEvent>,
}

impl LoggerRegistry {
    /// Build from `<prefix>/etc/conf/logging.json` with console output on
    /// the process streams.
    pub fn init<P: ProcessEnv + ?Sized>(env: &P) -> Self {
        RegistryBuilder::new(env).build()
    }

    pub fn builder<P: ProcessEnv + ?Sized>(env: &P) -> RegistryBuilder {
        RegistryBuilder::new(env)
    }

    /// First logger in `names` that exists, else the default logger.
    ///
    /// An empty slice yields the default logger. Never fails.
    pub fn resolve(&self, names: &[&str]) -> &LoggerHandle {
        names
            .iter()
            .find_map(|name| self.loggers.get(*name))
            .unwrap_or(&self.default)
    }

    pub fn default_logger(&self) -> &LoggerHandle {
        &self.default
    }

    /// Exact lookup. `"default"` returns the default logger.
    pub fn get(&self, name: &str) -> Option<&LoggerHandle> {
        if name == DEFAULT_LOGGER {
            return Some(&self.default);
        }
        self.loggers.get(name)
    }

    /// Names of the published loggers, sorted, including `"default"`.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.loggers.keys().map(String::as_str).collect();
        names.push(DEFAULT_LOGGER);
        names.sort_unstable();
        names
    }

    /// Degradation decisions taken while building, in order.
    pub fn events(&self) -> &[InitEvent] {
        &self.events
    }

    /// Route ambient `tracing` and `log` records to the default logger.
    ///
    /// Succeeds at most once per process.
    pub fn install_global(&self) -> Result<(), InstallError> {
        tracing::dispatcher::set_global_default(self.default.dispatch().clone())?;
        LogTracer::init()?;
        Ok(())
    }
}
