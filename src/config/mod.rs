//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! ProcessEnv (prefix, log dir, process name)
//!     → loader.rs (<prefix>/etc/conf/logging.json → ConfigSet)
//!     → schema.rs (LoggerConfig per named entry, document order)
//!     → registry builder (one logger per entry)
//! ```
//!
//! # Design Decisions
//! - Config is read once per registry; no reload
//! - All fields have zero-value defaults to allow minimal entries
//! - Load errors are returned to the caller, which decides to degrade

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::{config_path, load_config, ConfigError};
pub use paths::{ProcessEnv, ProcessPaths};
pub use schema::{ConfigSet, LoggerConfig, DEFAULT_LOGGER};
