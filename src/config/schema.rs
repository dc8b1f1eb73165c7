//! Configuration schema definitions.
//!
//! The logging config file is a JSON object whose top-level keys are logger
//! names and whose values describe the rotation policy and verbosity of that
//! logger. All fields default to their zero value so minimal entries parse.

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Name of the reserved entry that governs the process-wide default logger.
pub const DEFAULT_LOGGER: &str = "default";

/// Configuration for one named logger.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LoggerConfig {
    /// File to write records to, relative to the log directory.
    #[serde(rename = "filename")]
    pub file_name: String,

    /// Size in megabytes that triggers a rotation (0 = writer default).
    #[serde(rename = "maxsize")]
    pub max_size_mb: u64,

    /// Days to keep rotated files (0 = never age out).
    #[serde(rename = "maxage")]
    pub max_age_days: u32,

    /// Number of rotated files to keep (0 = keep all).
    #[serde(rename = "maxbackups")]
    pub max_backups: usize,

    /// Stamp rotated files with local time instead of UTC.
    #[serde(rename = "localtime")]
    pub local_time: bool,

    /// Gzip rotated files.
    pub compress: bool,

    /// Minimum severity, e.g. "info".
    pub level: String,

    /// Target environment, "prod" or "dev".
    pub env: String,
}

impl LoggerConfig {
    /// The entry used when no usable "default" logger is configured.
    pub fn fallback(process_name: &str) -> Self {
        Self {
            file_name: format!("{process_name}.log"),
            max_size_mb: 20,
            max_age_days: 7,
            max_backups: 0,
            local_time: true,
            compress: true,
            level: "info".to_string(),
            env: "prod".to_string(),
        }
    }
}

/// Logger entries in document order.
///
/// Duplicate names are preserved so the registry can apply its
/// first-registration-wins policy; a plain map would keep the last one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigSet {
    entries: Vec<(String, LoggerConfig)>,
}

impl ConfigSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, keeping any earlier entry of the same name.
    pub fn push(&mut self, name: impl Into<String>, config: LoggerConfig) {
        self.entries.push((name.into(), config));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LoggerConfig)> {
        self.entries.iter().map(|(name, config)| (name.as_str(), config))
    }

    /// First entry registered under `name`.
    pub fn get(&self, name: &str) -> Option<&LoggerConfig> {
        self.iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, config)| config)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, LoggerConfig)> for ConfigSet {
    fn from_iter<T: IntoIterator<Item = (String, LoggerConfig)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for ConfigSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = ConfigSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of logger names to logger configurations")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut set = ConfigSet::new();
                while let Some((name, config)) = access.next_entry::<String, LoggerConfig>()? {
                    set.push(name, config);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
