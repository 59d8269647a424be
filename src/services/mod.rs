//! Service layer for business logic.
//!
//! This module contains services that encapsulate complex business logic
//! and coordinate between different parts of the application.

pub mod errors;
pub mod layouts;
pub mod raw;
pub mod store;

// Re-export commonly used types and functions
pub use errors::{MutationError, MutationResult};
pub use layouts::LayoutService;
pub use store::LayoutStore;
