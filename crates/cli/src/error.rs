//! CLI failures and their process exit codes.
//!
//! clap exits with 2 on bad arguments before `run` starts. Everything after
//! that maps onto 10 (palette could not be built), 11 (request file
//! unreadable), 12 (malformed flag or JSON input) or 13 (output encoding).

use led_palette_core::PaletteError;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Input(String),
    #[error("failed to encode output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Palette(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }

    /// Error body printed to stderr under `--json`.
    pub fn to_json(&self) -> Value {
        let kind = match self {
            CliError::Palette(e) if e.is_configuration() => "configuration",
            CliError::Palette(_) => "palette",
            CliError::Io(_) => "io",
            CliError::Input(_) => "input",
            CliError::Serialization(_) => "serialization",
        };
        json!({
            "error": self.to_string(),
            "kind": kind,
            "exit_code": self.exit_code(),
        })
    }
}
