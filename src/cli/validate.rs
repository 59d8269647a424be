//! Validation command for layout files.

use crate::cli::common::{
    load_layout, print_json, CliError, CliResult, ValidationChecks, ValidationLocation,
    ValidationMessage, ValidationResponse,
};
use crate::validation::report::ValidationErrorKind;
use crate::validation::LayoutValidator;
use clap::Args;
use std::path::PathBuf;

/// Audit a layout file for errors and warnings
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Path to layout JSON file
    #[arg(short, long, value_name = "FILE")]
    pub layout: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Treat warnings as errors (exit non-zero)
    #[arg(long)]
    pub strict: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> CliResult<()> {
        let layout = load_layout(&self.layout)?;
        let report = LayoutValidator::new(&layout).validate();

        let mut checks = ValidationChecks::all_passed();
        let mut messages = Vec::new();

        for error in &report.errors {
            let check = match error.kind {
                ValidationErrorKind::UnknownDeviceType | ValidationErrorKind::DuplicateId => {
                    &mut checks.references
                }
                ValidationErrorKind::OutOfBounds => &mut checks.bounds,
                ValidationErrorKind::Collision => &mut checks.collisions,
                ValidationErrorKind::ContainerMismatch => &mut checks.containers,
                ValidationErrorKind::GroupMembership
                | ValidationErrorKind::GroupHeightMismatch
                | ValidationErrorKind::GroupTooSmall => &mut checks.groups,
            };
            *check = "failed".to_string();

            let location = (error.rack.is_some() || error.device_id.is_some()).then(|| {
                ValidationLocation {
                    rack: error.rack.clone(),
                    device_id: error.device_id.clone(),
                }
            });

            messages.push(ValidationMessage {
                severity: "error".to_string(),
                message: format!("{}: {}", error.kind, error.message),
                location,
            });
        }

        for warning in &report.warnings {
            messages.push(ValidationMessage {
                severity: "warning".to_string(),
                message: warning.message.clone(),
                location: None,
            });
        }

        let response = ValidationResponse {
            valid: report.is_valid(),
            errors: messages,
            checks,
        };

        if self.json {
            print_json(&response)?;
        } else {
            if response.valid {
                println!("✓ Validation passed: {}", layout.name);
            } else {
                println!("✗ Validation failed: {}", layout.name);
            }

            println!("\nChecks:");
            println!("  References: {}", response.checks.references);
            println!("  Bounds:     {}", response.checks.bounds);
            println!("  Collisions: {}", response.checks.collisions);
            println!("  Containers: {}", response.checks.containers);
            println!("  Groups:     {}", response.checks.groups);

            if !response.errors.is_empty() {
                println!("\nIssues:");
                for msg in &response.errors {
                    let prefix = if msg.severity == "error" { "  ✗" } else { "  ⚠" };
                    match msg.location.as_ref().and_then(|l| l.rack.as_deref()) {
                        Some(rack) => println!("{prefix} [{rack}] {}", msg.message),
                        None => println!("{prefix} {}", msg.message),
                    }
                }
            }
        }

        if !response.valid {
            return Err(CliError::validation("Validation failed"));
        }

        if self.strict && !report.warnings.is_empty() {
            return Err(CliError::validation("Warnings found in strict mode"));
        }

        Ok(())
    }
}
