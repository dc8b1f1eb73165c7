//! Core composition.
//!
//! A core is one (encoder, writer, severity filter) triple rendered as a
//! filtered `fmt` layer. A logger stacks its cores on one `Registry`; every
//! per-layer filter is evaluated on its own, so a record lands in each core
//! that accepts it and in none that reject it.
//!
//! ```text
//! record ──▶ file core    (>= configured level)   ──▶ rotating file
//!        ├─▶ stdout core  (= info)                ──▶ stdout   [default only]
//!        └─▶ stderr core  (>= error)              ──▶ stderr   [default only]
//! ```

use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::Metadata;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::Layer;

use crate::config::DEFAULT_LOGGER;
use crate::logging::encoder::{BoxedLayer, Encoder};
use crate::logging::rotation::RotatingWriter;
use crate::logging::severity::{Severity, SeverityFilter};

/// Where a core writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkTarget {
    File(PathBuf),
    Stdout,
    Stderr,
    /// File output that could not be opened.
    Discard,
}

impl fmt::Display for SinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkTarget::File(path) => write!(f, "{}", path.display()),
            SinkTarget::Stdout => f.write_str("stdout"),
            SinkTarget::Stderr => f.write_str("stderr"),
            SinkTarget::Discard => f.write_str("discard"),
        }
    }
}

/// Description of one core of a logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSpec {
    pub target: SinkTarget,
    pub encoder: Encoder,
    pub filter: SeverityFilter,
}

impl CoreSpec {
    pub fn accepts(&self, severity: Severity) -> bool {
        self.filter.accepts(severity)
    }
}

/// A core ready to be stacked into a logger.
pub struct Core {
    pub(crate) spec: CoreSpec,
    pub(crate) layer: BoxedLayer,
}

impl Core {
    pub fn spec(&self) -> &CoreSpec {
        &self.spec
    }
}

impl fmt::Debug for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Core").field("spec", &self.spec).finish_non_exhaustive()
    }
}

/// Build a single filtered core.
pub fn build_core<W>(
    target: SinkTarget,
    writer: W,
    filter: SeverityFilter,
    encoder: Encoder,
    ansi: bool,
) -> Core
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = encoder.layer(writer, ansi).with_filter(filter).boxed();
    Core {
        spec: CoreSpec {
            target,
            encoder,
            filter,
        },
        layer,
    }
}

/// A console stream shareable between loggers.
#[derive(Clone)]
pub struct ConsoleWriter(Arc<BoxMakeWriter>);

impl ConsoleWriter {
    pub fn new<M>(make_writer: M) -> Self
    where
        M: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        Self(Arc::new(BoxMakeWriter::new(make_writer)))
    }
}

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = Box<dyn Write + 'a>;

    fn make_writer(&'a self) -> Self::Writer {
        (*self.0).make_writer()
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        (*self.0).make_writer_for(meta)
    }
}

impl fmt::Debug for ConsoleWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConsoleWriter")
    }
}

/// The process streams diagnostic cores write to.
#[derive(Debug, Clone)]
pub struct ConsoleTargets {
    stdout: ConsoleWriter,
    stderr: ConsoleWriter,
    ansi: bool,
}

impl ConsoleTargets {
    /// The real stdout and stderr; colors only when stdout is a terminal.
    pub fn process() -> Self {
        Self {
            stdout: ConsoleWriter::new(io::stdout),
            stderr: ConsoleWriter::new(io::stderr),
            ansi: io::stdout().is_terminal(),
        }
    }

    /// Custom streams, e.g. in-memory buffers. Never colorized.
    pub fn new(stdout: ConsoleWriter, stderr: ConsoleWriter) -> Self {
        Self {
            stdout,
            stderr,
            ansi: false,
        }
    }
}

impl Default for ConsoleTargets {
    fn default() -> Self {
        Self::process()
    }
}

/// Which loggers fan out to the console streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsolePolicy {
    /// Only the reserved "default" logger.
    #[default]
    DefaultOnly,
    /// Every logger.
    AllLoggers,
}

impl ConsolePolicy {
    pub fn applies_to(&self, name: &str) -> bool {
        match self {
            ConsolePolicy::DefaultOnly => name == DEFAULT_LOGGER,
            ConsolePolicy::AllLoggers => true,
        }
    }
}

/// File output of a logger.
#[derive(Debug)]
pub enum FileSink {
    Rotating(RotatingWriter),
    Discard,
}

/// Composes the cores of each logger.
#[derive(Debug, Clone, Default)]
pub struct CoreComposer {
    console: ConsoleTargets,
    policy: ConsolePolicy,
}

impl CoreComposer {
    pub fn new(console: ConsoleTargets, policy: ConsolePolicy) -> Self {
        Self { console, policy }
    }

    /// Cores for logger `name`: the file core, plus the stdout (exactly
    /// info) and stderr (error and fatal) cores when the console policy
    /// covers `name`.
    pub fn compose(
        &self,
        name: &str,
        file: FileSink,
        level: Severity,
        encoder: Encoder,
    ) -> Vec<Core> {
        let file_filter = SeverityFilter::AtLeast(level);
        let mut cores = vec![match file {
            FileSink::Rotating(writer) => {
                let target = SinkTarget::File(writer.path().to_path_buf());
                build_core(target, writer, file_filter, encoder, false)
            }
            FileSink::Discard => {
                build_core(SinkTarget::Discard, io::sink, file_filter, encoder, false)
            }
        }];

        if self.policy.applies_to(name) {
            cores.push(build_core(
                SinkTarget::Stdout,
                self.console.stdout.clone(),
                SeverityFilter::Exactly(Severity::Info),
                encoder,
                self.console.ansi,
            ));
            cores.push(build_core(
                SinkTarget::Stderr,
                self.console.stderr.clone(),
                SeverityFilter::AtLeast(Severity::Error),
                encoder,
                self.console.ansi,
            ));
        }

        cores
    }
}
