//! Outcomes recorded while a registry is built.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// One degradation decision taken during initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InitEvent {
    /// The config file was missing, unreadable or malformed; built from an empty set.
    ConfigUnavailable { path: PathBuf, reason: String },
    /// Level text did not parse; `Info` was used.
    InvalidLevel { logger: String, value: String },
    /// Environment text did not parse; `Prod` was used.
    InvalidEnv { logger: String, value: String },
    /// A later entry reused a name; the first one was kept.
    DuplicateLogger { name: String },
    /// The log file could not be opened.
    WriterUnavailable {
        logger: String,
        path: PathBuf,
        reason: String,
    },
    /// No usable "default" entry existed; the built-in one was used.
    DefaultSynthesized,
}

impl InitEvent {
    /// Whether the event is also reported on stderr.
    pub(crate) fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            InitEvent::ConfigUnavailable { .. }
                | InitEvent::InvalidLevel { .. }
                | InitEvent::WriterUnavailable { .. }
        )
    }
}

impl fmt::Display for InitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitEvent::ConfigUnavailable { path, reason } => {
                write!(f, "logging config {} unavailable: {reason}", path.display())
            }
            InitEvent::InvalidLevel { logger, value } => {
                write!(f, "logger {logger}: invalid level {value:?}, using info")
            }
            InitEvent::InvalidEnv { logger, value } => {
                write!(f, "logger {logger}: invalid env {value:?}, using prod")
            }
            InitEvent::DuplicateLogger { name } => {
                write!(f, "logger {name}: duplicate entry ignored")
            }
            InitEvent::WriterUnavailable {
                logger,
                path,
                reason,
            } => write!(f, "logger {logger}: cannot open {}: {reason}", path.display()),
            InitEvent::DefaultSynthesized => f.write_str("no default logger configured, using built-in"),
        }
    }
}
