//! Rotating file writers.
//!
//! # Responsibilities
//! - Resolve a logger's file path under the log directory
//! - Map `LoggerConfig` rotation fields onto the rotating appender
//! - Expose the appender as a thread-safe `MakeWriter`
//!
//! # Design Decisions
//! - Rotation, retention and gzip belong to `file-rotate`; this module only
//!   names backups and decides which ones are stale
//! - Backups are suffixed with the rotation time (`app.log.2026-01-31T09-15-00`),
//!   on the local clock or UTC depending on `localtime`
//! - A file rotates once it has grown past `maxsize`, so records are never
//!   split across files
//! - `maxbackups` and `maxage` both apply; zero disables either limit

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{self, Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Local, NaiveDateTime, Utc};
use file_rotate::compression::Compression;
use file_rotate::suffix::{SuffixScheme, TimestampSuffix};
use file_rotate::{ContentLimit, FileRotate};
use thiserror::Error;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::LoggerConfig;

/// Size used when `maxsize` is zero.
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

/// Timestamp format of backup suffixes. Sorts lexically in time order.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("cannot create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Rotation parameters handed to the appender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_size_bytes: u64,
    /// Backups to keep; 0 keeps all.
    pub max_backups: usize,
    /// Days to keep backups; 0 keeps them forever.
    pub max_age_days: u32,
    pub local_time: bool,
    pub compress: bool,
}

impl RotationPolicy {
    pub fn from_config(config: &LoggerConfig) -> Self {
        let max_size_mb = match config.max_size_mb {
            0 => DEFAULT_MAX_SIZE_MB,
            mb => mb,
        };

        Self {
            max_size_bytes: max_size_mb.saturating_mul(BYTES_PER_MB),
            max_backups: config.max_backups,
            max_age_days: config.max_age_days,
            local_time: config.local_time,
            compress: config.compress,
        }
    }

    fn content_limit(&self) -> ContentLimit {
        let bytes = usize::try_from(self.max_size_bytes).unwrap_or(usize::MAX);
        ContentLimit::BytesSurpassed(bytes.max(1))
    }

    fn compression(&self) -> Compression {
        if self.compress {
            // Every backup is gzipped; only the live file stays plain.
            Compression::OnRotate(0)
        } else {
            Compression::None
        }
    }

    fn suffix_scheme(&self) -> BackupSuffix {
        BackupSuffix {
            local_time: self.local_time,
            max_backups: (self.max_backups > 0).then_some(self.max_backups),
            max_age: (self.max_age_days > 0).then(|| Duration::days(i64::from(self.max_age_days))),
        }
    }
}

/// Names backups after the rotation time and marks stale ones for removal.
#[derive(Debug, Clone, Copy)]
pub struct BackupSuffix {
    local_time: bool,
    max_backups: Option<usize>,
    max_age: Option<Duration>,
}

impl BackupSuffix {
    /// Timestamp of `ago` before now on the configured clock.
    fn stamp(&self, ago: Duration) -> String {
        if self.local_time {
            (Local::now() - ago).format(BACKUP_TIMESTAMP_FORMAT).to_string()
        } else {
            (Utc::now() - ago).format(BACKUP_TIMESTAMP_FORMAT).to_string()
        }
    }
}

impl SuffixScheme for BackupSuffix {
    type Repr = TimestampSuffix;

    fn rotate_file(
        &mut self,
        _basepath: &Path,
        newest_suffix: Option<&TimestampSuffix>,
        suffix: &Option<TimestampSuffix>,
    ) -> io::Result<TimestampSuffix> {
        if suffix.is_some() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "backups are never renamed once written",
            ));
        }

        let timestamp = self.stamp(Duration::zero());
        // Several rotations within one second get a counter.
        let number = newest_suffix
            .filter(|newest| newest.timestamp == timestamp)
            .map(|newest| newest.number.unwrap_or(0) + 1);

        Ok(TimestampSuffix { timestamp, number })
    }

    fn parse(&self, suffix: &str) -> Option<TimestampSuffix> {
        let (timestamp, number) = match suffix.split_once('.') {
            Some((timestamp, number)) => (timestamp, Some(number.parse().ok()?)),
            None => (suffix, None),
        };
        NaiveDateTime::parse_from_str(timestamp, BACKUP_TIMESTAMP_FORMAT).ok()?;

        Some(TimestampSuffix {
            timestamp: timestamp.to_string(),
            number,
        })
    }

    fn too_old(&self, suffix: &TimestampSuffix, file_number: usize) -> bool {
        let over_count = self.max_backups.is_some_and(|max| file_number >= max);
        let over_age = self
            .max_age
            .is_some_and(|age| suffix.timestamp < self.stamp(age));
        over_count || over_age
    }
}

/// Join `file_name` under `log_dir` and clean the result lexically.
///
/// A leading separator on `file_name` does not escape `log_dir`. Redundant
/// separators and `.` segments are removed and `..` segments are resolved;
/// `..` can only survive at the front of a relative path.
pub fn normalize_log_path(log_dir: &Path, file_name: &str) -> PathBuf {
    let relative = file_name.trim_start_matches(path::is_separator);
    let joined = log_dir.join(relative);

    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// A rotating log file. Clones share the underlying appender, so loggers
/// resolving to the same path serialize their writes through one handle.
#[derive(Debug, Clone)]
pub struct RotatingWriter {
    path: PathBuf,
    policy: RotationPolicy,
    appender: Arc<Mutex<FileRotate<BackupSuffix>>>,
}

impl RotatingWriter {
    pub fn open(path: PathBuf, policy: RotationPolicy) -> Result<Self, WriterError> {
        if path.file_name().is_none() {
            return Err(WriterError::Open {
                source: io::Error::new(io::ErrorKind::InvalidInput, "path names no file"),
                path,
            });
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| WriterError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        // The appender swallows open failures; surface them here.
        OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| WriterError::Open {
                path: path.clone(),
                source,
            })?;

        let appender = FileRotate::new(
            &path,
            policy.suffix_scheme(),
            policy.content_limit(),
            policy.compression(),
            None,
        );

        Ok(Self {
            path,
            policy,
            appender: Arc::new(Mutex::new(appender)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Rotated files of this log, oldest first.
    pub fn backups(&self) -> Vec<PathBuf> {
        self.lock().log_paths()
    }

    fn lock(&self) -> MutexGuard<'_, FileRotate<BackupSuffix>> {
        // A panic mid-write leaves the appender usable; keep logging.
        self.appender.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Build the rotating writer for one logger entry.
pub fn build_rotating_writer(
    config: &LoggerConfig,
    log_dir: &Path,
) -> Result<RotatingWriter, WriterError> {
    let path = normalize_log_path(log_dir, &config.file_name);
    RotatingWriter::open(path, RotationPolicy::from_config(config))
}

/// Exclusive access to the appender for the duration of one record.
pub struct RotatingGuard<'a>(MutexGuard<'a, FileRotate<BackupSuffix>>);

impl Write for RotatingGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.0.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingWriter {
    type Writer = RotatingGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingGuard(self.lock())
    }
}
