//! RackPlan Library
//!
//! This library provides the core of the RackPlan rack elevation editor:
//! a fixed-point rack unit grid, placement validation across faces, half-width
//! slots and nested containers, and an undo/redo command engine wrapped by a
//! layout store.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod history;
pub mod models;
pub mod services;
pub mod units;
pub mod validation;
