//! CLI argument parsing and command dispatch.

pub mod args;
pub mod costs;
pub mod pricing;
pub mod validate;

pub use args::{Cli, Commands, CostsArgs, OutputFormat, ValidateArgs};
