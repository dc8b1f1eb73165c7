//! Record severities and per-core severity filters.
//!
//! # Design Decisions
//! - Five ordered severities; `Fatal` has no `tracing` level of its own, so
//!   fatal records are emitted at ERROR with a `logreg.fatal` field and
//!   recognised from callsite metadata
//! - Filters decide from metadata alone, so callsite interest can be cached

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::subscriber::Interest;
use tracing::{Level, Metadata};
use tracing_subscriber::layer::{Context, Filter};

/// Field name marking a record as fatal.
///
/// Reserved: any ERROR callsite declaring this field is `Fatal` whatever its
/// value, since filters only see metadata. A user field named `fatal` is an
/// ordinary field.
pub const FATAL_FIELD: &str = "logreg.fatal";

/// Ordered record severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized level: {0}")]
pub struct ParseSeverityError(pub String);

impl Severity {
    /// Severity of a record or span from its callsite metadata.
    ///
    /// TRACE records fold into `Debug`.
    pub fn of(meta: &Metadata<'_>) -> Self {
        match *meta.level() {
            Level::ERROR if meta.fields().field(FATAL_FIELD).is_some() => Severity::Fatal,
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warn,
            Level::INFO => Severity::Info,
            _ => Severity::Debug,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    /// Case-insensitive; the empty string is `Info`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "" | "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a configured level.
pub fn parse_severity(text: &str) -> Result<Severity, ParseSeverityError> {
    text.parse()
}

/// Level-enabler of a single core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityFilter {
    /// Records at or above the severity.
    AtLeast(Severity),
    /// Records at exactly the severity.
    Exactly(Severity),
}

impl SeverityFilter {
    pub fn accepts(&self, severity: Severity) -> bool {
        match self {
            SeverityFilter::AtLeast(min) => severity >= *min,
            SeverityFilter::Exactly(only) => severity == *only,
        }
    }

    fn enabled_for(&self, meta: &Metadata<'_>) -> bool {
        meta.is_span() || self.accepts(Severity::of(meta))
    }
}

impl fmt::Display for SeverityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityFilter::AtLeast(min) => write!(f, ">={min}"),
            SeverityFilter::Exactly(only) => write!(f, "={only}"),
        }
    }
}

impl<S> Filter<S> for SeverityFilter {
    fn enabled(&self, meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        self.enabled_for(meta)
    }

    fn callsite_enabled(&self, meta: &'static Metadata<'static>) -> Interest {
        if self.enabled_for(meta) {
            Interest::always()
        } else {
            Interest::never()
        }
    }
}
