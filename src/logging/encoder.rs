//! Record rendering.
//!
//! # Design Decisions
//! - JSON format for production, human-readable text for development
//! - Rendering is delegated to `tracing-subscriber`'s `fmt` formatters
//! - JSON records carry timestamp, level, target, file and line as fields

use std::fmt;

use serde::Serialize;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{Layer, Registry};

use crate::logging::environment::Environment;

/// A core's type-erased `fmt` layer.
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// How records are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoder {
    /// One JSON object per line.
    Json,
    /// Human-oriented text, colorized on terminals.
    Text,
}

/// Choose the renderer for an environment.
pub fn select_encoder(env: Environment) -> Encoder {
    match env {
        Environment::Prod => Encoder::Json,
        Environment::Dev => Encoder::Text,
    }
}

impl Encoder {
    /// Build a `fmt` layer rendering with this encoder into `writer`.
    ///
    /// `ansi` only affects text output; JSON never carries escapes.
    pub fn layer<W>(self, writer: W, ansi: bool) -> BoxedLayer
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        match self {
            Encoder::Json => tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(writer)
                .boxed(),
            Encoder::Text => tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(ansi)
                .with_writer(writer)
                .boxed(),
        }
    }
}

impl fmt::Display for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoder::Json => f.write_str("json"),
            Encoder::Text => f.write_str("text"),
        }
    }
}
