//! Process-wide registry.
//!
//! The registry is published behind a [`OnceLock`]: the first caller runs
//! the initializer, concurrent callers block until it finishes, and every
//! caller sees the same instance afterwards.

use std::sync::OnceLock;

use crate::config::ProcessPaths;
use crate::logging::LoggerHandle;
use crate::registry::LoggerRegistry;

static GLOBAL: OnceLock<LoggerRegistry> = OnceLock::new();

/// The process-wide registry, running `init` if none is published yet.
pub fn get_or_init_global<F>(init: F) -> &'static LoggerRegistry
where
    F: FnOnce() -> LoggerRegistry,
{
    GLOBAL.get_or_init(init)
}

/// Publish `registry` as the process-wide registry.
///
/// The first publication wins; a later one is handed back unchanged.
pub fn init_global(registry: LoggerRegistry) -> Result<(), LoggerRegistry> {
    GLOBAL.set(registry)
}

/// The process-wide registry, built from the running executable's
/// locations on first use. Ambient `tracing` and `log` output is redirected
/// to its default logger when nothing else claimed it.
pub fn global() -> &'static LoggerRegistry {
    GLOBAL.get_or_init(|| {
        let registry = LoggerRegistry::init(&ProcessPaths::from_current_exe());
        if let Err(err) = registry.install_global() {
            eprintln!("logreg: ambient logging not redirected: {err}");
        }
        registry
    })
}

/// Shorthand for `global().resolve(names)`.
pub fn logger(names: &[&str]) -> &'static LoggerHandle {
    global().resolve(names)
}
