//! Command-line argument definitions for pidstat processor
//!
//! This module defines the CLI interface using the clap derive API.

use crate::app::services::pidstat_parser::parse_reference_date;
use crate::app::services::table_builder::OutputFormat;
use crate::{Error, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the pidstat processor
///
/// Parses a `pidstat -u -r` log into per-process CPU and memory tables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pidstat-processor",
    version,
    about = "Convert pidstat CPU and memory logs into per-process tables",
    long_about = "Parses the output of `pidstat -u -r <interval>` (alternating CPU and memory \
                  snapshots) into two tables keyed by (timestamp, pid) and writes them as \
                  cpu_stats and mem_stats files. Malformed lines are reported as warnings and \
                  never abort the run."
)]
pub struct Args {
    /// pidstat log file to parse
    #[arg(value_name = "FILE")]
    pub file_path: PathBuf,

    /// Directory for the generated tables
    ///
    /// Will be created if it doesn't exist. Defaults to ./outputs.
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        help = "Directory for the generated tables"
    )]
    pub output_dir: Option<PathBuf>,

    /// Parse and report only, without writing tables
    #[arg(long = "no-output", help = "Parse and report without writing tables")]
    pub no_output: bool,

    /// File format for the generated tables
    #[arg(
        long = "format",
        value_enum,
        value_name = "FORMAT",
        help = "Table file format"
    )]
    pub format: Option<OutputFormat>,

    /// Date combined with header times
    ///
    /// Accepts MM/DD/YYYY or YYYY-MM-DD. When omitted, the config file's
    /// date is used, then the date on the log's banner line, then today.
    #[arg(
        short = 'd',
        long = "date",
        value_name = "DATE",
        help = "Reference date (MM/DD/YYYY or YYYY-MM-DD)"
    )]
    pub date: Option<String>,

    /// Upper bound for percentage fields
    ///
    /// %CPU can exceed 100 on multi-core hosts when pidstat runs in Irix mode.
    #[arg(
        long = "max-percent",
        value_name = "PERCENT",
        help = "Upper bound for percentage fields"
    )]
    pub max_percent: Option<f64>,

    /// Keep only the last N rows of each table
    #[arg(long = "tail", value_name = "ROWS", help = "Keep only the last N rows of each table")]
    pub tail: Option<usize>,

    /// Number of warnings to print in the summary
    #[arg(
        long = "show-warnings",
        value_name = "COUNT",
        help = "Number of warnings to print in the summary"
    )]
    pub show_warnings: Option<usize>,

    /// Path to configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.file_path.exists() {
            return Err(Error::file_not_found(self.file_path.display().to_string()));
        }

        if self.file_path.is_dir() {
            return Err(Error::configuration(format!(
                "Input path is a directory, expected a pidstat log file: {}",
                self.file_path.display()
            )));
        }

        if let Some(max) = self.max_percent {
            if !max.is_finite() || max <= 0.0 {
                return Err(Error::configuration(format!(
                    "--max-percent must be a positive number, got: {}",
                    max
                )));
            }
        }

        if self.tail == Some(0) {
            return Err(Error::configuration("--tail must be at least 1"));
        }

        self.reference_date()?;
        Ok(())
    }

    /// Parse the `--date` argument, if given
    pub fn reference_date(&self) -> Result<Option<NaiveDate>> {
        self.date.as_deref().map(parse_reference_date).transpose()
    }

    /// Log level implied by `-v`/`-q`, if either was given
    pub fn get_log_level(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}
