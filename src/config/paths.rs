//! Process location providers.
//!
//! The registry needs three facts about the host process: the prefix the
//! config tree lives under, the directory log files go to, and the process
//! name used for the synthesized default log file.

use std::env;
use std::path::{Path, PathBuf};

pub const PREFIX_ENV: &str = "LOGREG_PREFIX";
pub const LOG_DIR_ENV: &str = "LOGREG_LOG_DIR";
pub const PROCESS_NAME_ENV: &str = "LOGREG_PROCESS_NAME";

/// Supplies the host process locations consumed by the registry.
pub trait ProcessEnv {
    /// Base directory holding `etc/conf/logging.json`.
    fn prefix_path(&self) -> &Path;

    /// Directory log files are rooted at.
    fn log_dir(&self) -> &Path;

    /// Name of the running process.
    fn process_name(&self) -> &str;
}

/// Concrete process locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessPaths {
    pub prefix: PathBuf,
    pub log_dir: PathBuf,
    pub process_name: String,
}

impl ProcessPaths {
    pub fn new(
        prefix: impl Into<PathBuf>,
        log_dir: impl Into<PathBuf>,
        process_name: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            log_dir: log_dir.into(),
            process_name: process_name.into(),
        }
    }

    /// Derive locations from the running executable.
    ///
    /// For `/opt/app/bin/server` this yields prefix `/opt/app`, log dir
    /// `/opt/app/log` and process name `server`. `LOGREG_PREFIX`,
    /// `LOGREG_LOG_DIR` and `LOGREG_PROCESS_NAME` override each part.
    pub fn from_current_exe() -> Self {
        let exe = env::current_exe().unwrap_or_default();
        let derived = Self::from_executable(&exe);

        let prefix = env::var_os(PREFIX_ENV)
            .map(PathBuf::from)
            .unwrap_or(derived.prefix);
        let log_dir = env::var_os(LOG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| prefix.join("log"));
        let process_name = env::var(PROCESS_NAME_ENV).unwrap_or(derived.process_name);

        Self {
            prefix,
            log_dir,
            process_name,
        }
    }

    fn from_executable(exe: &Path) -> Self {
        let process_name = exe
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "app".to_string());
        let prefix = exe
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let log_dir = prefix.join("log");

        Self {
            prefix,
            log_dir,
            process_name,
        }
    }
}

impl ProcessEnv for ProcessPaths {
    fn prefix_path(&self) -> &Path {
        &self.prefix
    }

    fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    fn process_name(&self) -> &str {
        &self.process_name
    }
}
