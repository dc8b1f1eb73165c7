//! Shared utilities for registry integration tests.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use logreg::config::config_path;
use logreg::{ConsoleTargets, ConsoleWriter, LoggerRegistry, ProcessPaths};
use tempfile::TempDir;

/// An in-memory console stream.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn writer(&self) -> ConsoleWriter {
        let capture = self.clone();
        ConsoleWriter::new(move || capture.clone())
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A throwaway process layout: `<root>/etc/conf/logging.json` and `<root>/log`.
pub struct Sandbox {
    pub dir: TempDir,
    pub paths: ProcessPaths,
    pub stdout: Capture,
    pub stderr: Capture,
}

#[allow(dead_code)]
impl Sandbox {
    pub fn new(process_name: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let paths = ProcessPaths::new(dir.path(), dir.path().join("log"), process_name);
        Self {
            dir,
            paths,
            stdout: Capture::default(),
            stderr: Capture::default(),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.paths.log_dir
    }

    pub fn log_file(&self, name: &str) -> PathBuf {
        self.paths.log_dir.join(name)
    }

    pub fn read_log(&self, name: &str) -> String {
        fs::read_to_string(self.log_file(name)).unwrap_or_default()
    }

    pub fn write_config(&self, json: &str) {
        let path = config_path(&self.paths.prefix);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, json).unwrap();
    }

    pub fn console(&self) -> ConsoleTargets {
        ConsoleTargets::new(self.stdout.writer(), self.stderr.writer())
    }

    pub fn build(&self) -> LoggerRegistry {
        LoggerRegistry::builder(&self.paths).console(self.console()).build()
    }
}
