//! Command implementations for pidstat processor CLI
//!
//! This module contains the command execution logic, progress reporting,
//! and report generation for the CLI interface.

pub mod process;
pub mod shared;

pub use shared::ProcessingStats;

use std::path::Path;

use crate::cli::args::Args;
use crate::{Error, Result};

/// Main command runner for pidstat processor
pub fn run(args: Args) -> Result<ProcessingStats> {
    process::run_process(args)
}

/// Top-level message for a failed run on `input`
pub fn failure_context(error: &Error, input: &Path) -> String {
    if error.is_input_error() {
        format!("Could not read {}", input.display())
    } else {
        format!("Failed to process {}", input.display())
    }
}
