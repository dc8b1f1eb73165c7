//! Record pipeline: from a logger entry to a usable handle.
//!
//! # Responsibilities
//! - Resolve configured level and environment text
//! - Pick the record renderer for an environment
//! - Open the rotating file a logger writes to
//! - Compose filtered cores and wrap them in a [`LoggerHandle`]
//!
//! # Data Flow
//! ```text
//! LoggerConfig
//!     ├─▶ severity.rs    (level text → Severity)
//!     ├─▶ environment.rs (env text → Environment) ─▶ encoder.rs (Json | Text)
//!     └─▶ rotation.rs    (filename + rotation fields → RotatingWriter)
//!             ↓
//!         core.rs    (file core [+ stdout/stderr cores])
//!             ↓
//!         handle.rs  (LoggerHandle owning a tracing Dispatch)
//! ```
//!
//! # Design Decisions
//! - Records are ordinary `tracing` events; fatal is ERROR plus a reserved `logreg.fatal` field
//! - Each handle has its own dispatch, so loggers never see each other's records
//! - Parsing returns errors; fallback policy belongs to the registry

pub mod core;
pub mod encoder;
pub mod environment;
pub mod handle;
pub mod rotation;
pub mod severity;

pub use self::core::{
    build_core, ConsolePolicy, ConsoleTargets, ConsoleWriter, Core, CoreComposer, CoreSpec,
    FileSink, SinkTarget,
};
pub use encoder::{select_encoder, Encoder};
pub use environment::{parse_env, Environment, ParseEnvError};
pub use handle::LoggerHandle;
pub use rotation::{
    build_rotating_writer, normalize_log_path, RotatingWriter, RotationPolicy, WriterError,
};
pub use severity::{parse_severity, ParseSeverityError, Severity, SeverityFilter, FATAL_FIELD};
