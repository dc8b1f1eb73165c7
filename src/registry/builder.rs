//! One initialization pass.
//!
//! ```text
//! load <prefix>/etc/conf/logging.json  (error → empty set)
//!     → for each entry in document order:
//!         level, env, encoder, writer, cores → LoggerHandle
//!         publish unless the name is already taken
//!     → synthesize "default" if none was published
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::{config_path, load_config, ConfigSet, LoggerConfig, ProcessEnv, DEFAULT_LOGGER};
use crate::logging::{
    build_rotating_writer, normalize_log_path, parse_env, parse_severity, select_encoder,
    ConsolePolicy, ConsoleTargets, CoreComposer, Environment, FileSink, LoggerHandle,
    RotatingWriter, Severity,
};
use crate::registry::events::InitEvent;
use crate::registry::LoggerRegistry;

/// Builds a [`LoggerRegistry`] for one process.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    prefix: PathBuf,
    log_dir: PathBuf,
    process_name: String,
    console: ConsoleTargets,
    policy: ConsolePolicy,
}

/// Mutable state of a single build.
#[derive(Default)]
struct BuildState {
    events: Vec<InitEvent>,
    /// Writers by resolved path; entries sharing a file share one appender.
    writers: HashMap<PathBuf, RotatingWriter>,
}

impl BuildState {
    fn record(&mut self, event: InitEvent) {
        if event.is_diagnostic() {
            eprintln!("logreg: {event}");
        }
        self.events.push(event);
    }

    fn level(&mut self, logger: &str, text: &str) -> Severity {
        parse_severity(text).unwrap_or_else(|_| {
            self.record(InitEvent::InvalidLevel {
                logger: logger.to_string(),
                value: text.to_string(),
            });
            Severity::Info
        })
    }

    fn environment(&mut self, logger: &str, text: &str) -> Environment {
        parse_env(text).unwrap_or_else(|_| {
            self.record(InitEvent::InvalidEnv {
                logger: logger.to_string(),
                value: text.to_string(),
            });
            Environment::Prod
        })
    }
}

impl RegistryBuilder {
    pub fn new<P: ProcessEnv + ?Sized>(env: &P) -> Self {
        Self {
            prefix: env.prefix_path().to_path_buf(),
            log_dir: env.log_dir().to_path_buf(),
            process_name: env.process_name().to_string(),
            console: ConsoleTargets::process(),
            policy: ConsolePolicy::default(),
        }
    }

    /// Streams the console cores write to.
    pub fn console(mut self, console: ConsoleTargets) -> Self {
        self.console = console;
        self
    }

    /// Which loggers get console cores.
    pub fn console_policy(mut self, policy: ConsolePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Load the config file and build every logger it names.
    pub fn build(self) -> LoggerRegistry {
        let mut state = BuildState::default();
        let path = config_path(&self.prefix);

        let config = match load_config(&path) {
            Ok(config) => config,
            Err(err) => {
                let event = InitEvent::ConfigUnavailable {
                    path,
                    reason: err.to_string(),
                };
                // A missing file is the normal unconfigured case.
                if err.is_not_found() {
                    state.events.push(event);
                } else {
                    state.record(event);
                }
                ConfigSet::new()
            }
        };

        self.build_entries(&config, state)
    }

    /// Build from an already loaded config, skipping the file read.
    pub fn build_from(self, config: &ConfigSet) -> LoggerRegistry {
        self.build_entries(config, BuildState::default())
    }

    fn build_entries(self, config: &ConfigSet, mut state: BuildState) -> LoggerRegistry {
        let composer = CoreComposer::new(self.console.clone(), self.policy);
        let mut loggers = HashMap::new();
        let mut default = None;

        for (name, entry) in config.iter() {
            let taken = if name == DEFAULT_LOGGER {
                default.is_some()
            } else {
                loggers.contains_key(name)
            };
            if taken {
                state.record(InitEvent::DuplicateLogger {
                    name: name.to_string(),
                });
                continue;
            }

            let Some(handle) = self.build_logger(&composer, name, entry, &mut state) else {
                continue;
            };
            if name == DEFAULT_LOGGER {
                default = Some(handle);
            } else {
                loggers.insert(name.to_string(), handle);
            }
        }

        let default = match default {
            Some(handle) => handle,
            None => {
                state.record(InitEvent::DefaultSynthesized);
                self.synthesize_default(&composer, &mut state)
            }
        };

        LoggerRegistry {
            loggers,
            default,
            events: state.events,
        }
    }

    /// Returns `None` for a named logger whose file cannot be opened.
    fn build_logger(
        &self,
        composer: &CoreComposer,
        name: &str,
        entry: &LoggerConfig,
        state: &mut BuildState,
    ) -> Option<LoggerHandle> {
        let level = state.level(name, &entry.level);
        let env = state.environment(name, &entry.env);

        let file = match self.open_writer(name, entry, state) {
            Some(writer) => FileSink::Rotating(writer),
            None if name == DEFAULT_LOGGER => FileSink::Discard,
            None => return None,
        };

        Some(assemble(composer, name, level, env, file))
    }

    fn synthesize_default(&self, composer: &CoreComposer, state: &mut BuildState) -> LoggerHandle {
        let entry = LoggerConfig::fallback(&self.process_name);
        let level = state.level(DEFAULT_LOGGER, &entry.level);
        let env = state.environment(DEFAULT_LOGGER, &entry.env);
        let file = self
            .open_writer(DEFAULT_LOGGER, &entry, state)
            .map_or(FileSink::Discard, FileSink::Rotating);

        assemble(composer, DEFAULT_LOGGER, level, env, file)
    }

    fn open_writer(
        &self,
        name: &str,
        entry: &LoggerConfig,
        state: &mut BuildState,
    ) -> Option<RotatingWriter> {
        let path = normalize_log_path(&self.log_dir, &entry.file_name);
        if let Some(writer) = state.writers.get(&path) {
            return Some(writer.clone());
        }

        match build_rotating_writer(entry, &self.log_dir) {
            Ok(writer) => {
                state.writers.insert(path, writer.clone());
                Some(writer)
            }
            Err(err) => {
                state.record(InitEvent::WriterUnavailable {
                    logger: name.to_string(),
                    path,
                    reason: err.to_string(),
                });
                None
            }
        }
    }
}

fn assemble(
    composer: &CoreComposer,
    name: &str,
    level: Severity,
    env: Environment,
    file: FileSink,
) -> LoggerHandle {
    let cores = composer.compose(name, file, level, select_encoder(env));
    LoggerHandle::new(name, level, env, cores)
}
