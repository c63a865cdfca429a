//! CLI command handlers for TrackFinder.
//!
//! This module provides headless, scriptable access to the catalog
//! operations for automation, testing, and CI/CD integration.

pub mod brand;
pub mod check;
pub mod common;
pub mod config;
pub mod machines;
pub mod products;
pub mod redirect;
pub mod sizes;

// Re-export types used by main.rs and tests
pub use brand::BrandArgs;
pub use check::CheckArgs;
pub use common::{CatalogSource, CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use machines::MachinesArgs;
pub use products::ProductsArgs;
pub use redirect::RedirectArgs;
pub use sizes::{ConvertArgs, FitsArgs, SizesArgs};
