//! Command line interface module
//!
//! This module provides the entry point for parsing command-line arguments
//! and rendering install commands. It includes argument parsing, validation,
//! and the runner that assembles the registry set.

pub mod args;
pub mod runner;

pub use args::Args;
pub use runner::run;
