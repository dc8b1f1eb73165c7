//! Deployment environment of a logger.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Where a logger runs; decides how records are rendered.
///
/// The zero value is `Prod`, and so is empty configuration text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(i8)]
pub enum Environment {
    #[default]
    Prod = 0,
    Dev = 1,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized env: {0}")]
pub struct ParseEnvError(pub String);

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Prod => "prod",
            Environment::Dev => "dev",
        }
    }
}

impl FromStr for Environment {
    type Err = ParseEnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "prod" => Ok(Environment::Prod),
            "dev" => Ok(Environment::Dev),
            _ => Err(ParseEnvError(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a configured environment. Callers choose the fallback on error.
pub fn parse_env(text: &str) -> Result<Environment, ParseEnvError> {
    text.parse()
}
