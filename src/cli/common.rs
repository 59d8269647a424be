//! Shared CLI plumbing: error type, exit codes, and JSON response shapes.

use crate::models::{DeviceFace, Layout, SlotPosition};
use crate::services::LayoutService;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Layout or operation rejected
    Validation = 1,
    /// File could not be read, parsed or written
    Io = 2,
    /// Arguments were well-formed for clap but meaningless
    Usage = 3,
}

impl ExitCode {
    /// Numeric code passed to the OS.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// A failed CLI command.
#[derive(Debug, Clone)]
pub struct CliError {
    /// Exit code for the process
    pub code: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Layout or operation rejected.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// File system or parse failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Io,
            message: message.into(),
        }
    }

    /// Bad argument value.
    pub fn usage(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Usage,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Loads a layout, mapping failures to [`ExitCode::Io`].
pub fn load_layout(path: &Path) -> CliResult<Layout> {
    LayoutService::load(path).map_err(|e| CliError::io(format!("Failed to load layout: {e:#}")))
}

/// Parses an optional `--face` value.
pub fn parse_face(value: Option<&str>, default: DeviceFace) -> CliResult<DeviceFace> {
    value.map_or(Ok(default), |v| {
        v.parse()
            .map_err(|e: anyhow::Error| CliError::usage(e.to_string()))
    })
}

/// Parses an optional `--slot` value.
pub fn parse_slot(value: Option<&str>) -> CliResult<SlotPosition> {
    value.map_or(Ok(SlotPosition::Full), |v| {
        v.parse()
            .map_err(|e: anyhow::Error| CliError::usage(e.to_string()))
    })
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Per-area outcome of `validate`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationChecks {
    /// Device type references
    pub references: String,
    /// Rack bounds
    pub bounds: String,
    /// Rack-level collisions
    pub collisions: String,
    /// Container children
    pub containers: String,
    /// Rack groups
    pub groups: String,
}

impl ValidationChecks {
    /// Every check passed.
    #[must_use]
    pub fn all_passed() -> Self {
        Self {
            references: "passed".to_string(),
            bounds: "passed".to_string(),
            collisions: "passed".to_string(),
            containers: "passed".to_string(),
            groups: "passed".to_string(),
        }
    }
}

/// Where a validation message applies.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationLocation {
    /// Rack name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rack: Option<String>,
    /// Device id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

/// One error or warning.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationMessage {
    /// "error" or "warning"
    pub severity: String,
    /// Human-readable text
    pub message: String,
    /// Optional location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ValidationLocation>,
}

/// JSON body printed by `validate --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResponse {
    /// True if there are no errors
    pub valid: bool,
    /// Errors followed by warnings
    pub errors: Vec<ValidationMessage>,
    /// Per-area outcome
    pub checks: ValidationChecks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::validation("x").code.code(), 1);
        assert_eq!(CliError::io("x").code.code(), 2);
        assert_eq!(CliError::usage("x").code.code(), 3);
        assert_eq!(ExitCode::Success.code(), 0);
    }

    #[test]
    fn test_parse_face_and_slot() {
        assert_eq!(parse_face(None, DeviceFace::Rear).unwrap(), DeviceFace::Rear);
        assert_eq!(parse_face(Some("both"), DeviceFace::Front).unwrap(), DeviceFace::Both);
        assert_eq!(parse_face(Some("side"), DeviceFace::Front).unwrap_err().code, ExitCode::Usage);
        assert_eq!(parse_slot(None).unwrap(), SlotPosition::Full);
        assert_eq!(parse_slot(Some("left")).unwrap(), SlotPosition::Left);
        assert!(parse_slot(Some("middle")).is_err());
    }
}
