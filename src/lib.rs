//! Config-driven multi-sink logger registry.
//!
//! A process describes its loggers in `<prefix>/etc/conf/logging.json`.
//! Each entry becomes a [`LoggerHandle`] writing to a rotating file; the
//! reserved `default` logger also tees info records to stdout and error
//! records to stderr. Lookups by name never fail and fall back to `default`.
//!
//! ```no_run
//! use logreg::{LoggerRegistry, ProcessPaths};
//!
//! let registry = LoggerRegistry::init(&ProcessPaths::from_current_exe());
//! let log = registry.resolve(&["billing", "payments"]);
//! logreg::info!(log, invoice = 1042, "invoice issued");
//! ```

pub mod config;
pub mod logging;
pub mod registry;

pub use config::{ConfigError, ConfigSet, LoggerConfig, ProcessEnv, ProcessPaths, DEFAULT_LOGGER};
pub use logging::{
    ConsolePolicy, ConsoleTargets, ConsoleWriter, Encoder, Environment, LoggerHandle, Severity,
};
pub use registry::{
    get_or_init_global, global, init_global, logger, InitEvent, InstallError, LoggerRegistry,
    RegistryBuilder,
};
