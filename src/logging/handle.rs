//! Logger handles.
//!
//! A handle owns a `tracing::Dispatch` built from its cores. Records emitted
//! through the handle, or through `tracing` macros inside
//! [`LoggerHandle::in_scope`], are routed to that dispatch only.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;

use crate::logging::core::{Core, CoreSpec, SinkTarget};
use crate::logging::environment::Environment;
use crate::logging::severity::Severity;

/// A leveled, structured logger. Cheap to clone; clones share the cores.
#[derive(Clone)]
pub struct LoggerHandle {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    level: Severity,
    environment: Environment,
    cores: Vec<CoreSpec>,
    dispatch: Dispatch,
}

impl LoggerHandle {
    pub fn new(
        name: impl Into<String>,
        level: Severity,
        environment: Environment,
        cores: Vec<Core>,
    ) -> Self {
        let (specs, layers): (Vec<CoreSpec>, Vec<_>) =
            cores.into_iter().map(|core| (core.spec, core.layer)).unzip();
        let subscriber = tracing_subscriber::registry().with(layers);

        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                level,
                environment,
                cores: specs,
                dispatch: Dispatch::new(subscriber),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Configured minimum severity of the file core.
    pub fn level(&self) -> Severity {
        self.inner.level
    }

    pub fn environment(&self) -> Environment {
        self.inner.environment
    }

    pub fn cores(&self) -> &[CoreSpec] {
        &self.inner.cores
    }

    /// Path of the rotating file, if the file core could be opened.
    pub fn file_path(&self) -> Option<&Path> {
        self.inner.cores.iter().find_map(|core| match &core.target {
            SinkTarget::File(path) => Some(path.as_path()),
            _ => None,
        })
    }

    /// Whether any core accepts records of `severity`.
    pub fn enabled(&self, severity: Severity) -> bool {
        self.inner.cores.iter().any(|core| core.accepts(severity))
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.inner.dispatch
    }

    /// Run `f` with this logger as the current `tracing` dispatcher.
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.inner.dispatch, f)
    }

    /// Whether both handles share the same cores.
    pub fn ptr_eq(&self, other: &LoggerHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn log(&self, severity: Severity, message: &str) {
        let logger = self.name();
        self.in_scope(|| match severity {
            Severity::Debug => tracing::debug!(logger, "{message}"),
            Severity::Info => tracing::info!(logger, "{message}"),
            Severity::Warn => tracing::warn!(logger, "{message}"),
            Severity::Error => tracing::error!(logger, "{message}"),
            Severity::Fatal => tracing::error!(logreg.fatal = true, logger, "{message}"),
        })
    }

    pub fn debug(&self, message: &str) {
        self.log(Severity::Debug, message)
    }

    pub fn info(&self, message: &str) {
        self.log(Severity::Info, message)
    }

    pub fn warn(&self, message: &str) {
        self.log(Severity::Warn, message)
    }

    pub fn error(&self, message: &str) {
        self.log(Severity::Error, message)
    }

    /// Emit a fatal record. The process keeps running.
    pub fn fatal(&self, message: &str) {
        self.log(Severity::Fatal, message)
    }
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("name", &self.inner.name)
            .field("level", &self.inner.level)
            .field("environment", &self.inner.environment)
            .field("cores", &self.inner.cores)
            .finish()
    }
}

/// Emit a debug record with structured fields through a handle.
///
/// ```ignore
/// logreg::debug!(handle, batch = 42, "batch complete");
/// ```
#[macro_export]
macro_rules! debug {
    ($handle:expr, $($arg:tt)+) => {
        $handle.in_scope(|| ::tracing::debug!($($arg)+))
    };
}

/// Emit an info record with structured fields through a handle.
#[macro_export]
macro_rules! info {
    ($handle:expr, $($arg:tt)+) => {
        $handle.in_scope(|| ::tracing::info!($($arg)+))
    };
}

/// Emit a warn record with structured fields through a handle.
#[macro_export]
macro_rules! warn {
    ($handle:expr, $($arg:tt)+) => {
        $handle.in_scope(|| ::tracing::warn!($($arg)+))
    };
}

/// Emit an error record with structured fields through a handle.
#[macro_export]
macro_rules! error {
    ($handle:expr, $($arg:tt)+) => {
        $handle.in_scope(|| ::tracing::error!($($arg)+))
    };
}

/// Emit a fatal record with structured fields through a handle.
#[macro_export]
macro_rules! fatal {
    ($handle:expr, $($arg:tt)+) => {
        $handle.in_scope(|| ::tracing::error!(logreg.fatal = true, $($arg)+))
    };
}
