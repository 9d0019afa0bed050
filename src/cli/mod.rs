//! CLI argument parsing and command dispatch.

pub mod args;
pub mod probe;
pub mod serve;

pub use args::{Cli, Commands, OutputFormat};
