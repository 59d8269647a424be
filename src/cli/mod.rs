//! CLI command handlers for RackPlan.
//!
//! This module provides headless, scriptable access to the placement engine
//! for automation, testing, and CI/CD integration.

pub mod add_rack;
pub mod common;
pub mod place;
pub mod positions;
pub mod validate;

// Re-export types used by main.rs and tests
pub use add_rack::AddRackArgs;
pub use common::{CliError, CliResult, ExitCode};
pub use place::PlaceArgs;
pub use positions::PositionsArgs;
pub use validate::ValidateArgs;
