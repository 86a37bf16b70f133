//! Test utilities for pidstat parser testing
//!
//! This module provides sample report content and helpers shared across the
//! parser test modules.

use chrono::{NaiveDate, NaiveDateTime};
use std::io::Write;
use tempfile::NamedTempFile;

use crate::config::ParserConfig;

mod parser_tests;

pub const CPU_HEADER: &str =
    "09:55:46 PM   UID       PID    %usr %system  %guest   %wait    %CPU   CPU  Command";
pub const MEM_HEADER: &str =
    "09:55:46 PM   UID       PID  minflt/s  majflt/s     VSZ     RSS   %MEM  Command";
pub const BANNER: &str =
    "Linux 4.18.0-553.el8_10.x86_64 (monitor-01) \t03/02/2025 \t_x86_64_\t(1 CPU)";

/// CPU snapshot taken from a real pidstat run
pub const SAMPLE_CPU_SECTION: &str = "\
09:55:46 PM   UID       PID    %usr %system  %guest   %wait    %CPU   CPU  Command
09:56:46 PM     0       497    0.02    0.02    0.00    0.02    0.03     0  systemd-journal
09:56:46 PM   993       670    0.17    0.02    0.00    0.00    0.18     0  prometheus";

/// Memory snapshot taken from a real pidstat run
pub const SAMPLE_MEM_SECTION: &str = "\
09:55:46 PM   UID       PID  minflt/s  majflt/s     VSZ     RSS   %MEM  Command
09:56:46 PM     0       497      0.17      0.00  129300    7036   0.89  systemd-journal
09:56:46 PM   993       670      0.05      0.00 2124408   67916   8.61  prometheus";

/// A complete report: banner, one CPU and one memory snapshot, summary block
pub fn create_test_report() -> String {
    format!(
        "{}\n\n{}\n\n{}\n\nAverage:      UID       PID    %usr %system  %guest   %wait    %CPU   CPU  Command\nAverage:        0       497    0.02    0.02    0.00    0.02    0.03     -  systemd-journal\n",
        BANNER, SAMPLE_CPU_SECTION, SAMPLE_MEM_SECTION
    )
}

/// Reference date used across tests
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()
}

/// Timestamp on the test date
pub fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    test_date().and_hms_opt(hour, minute, second).unwrap()
}

/// Parser configuration pinned to the test date
pub fn test_config() -> ParserConfig {
    ParserConfig::default().with_reference_date(test_date())
}

/// Write content to a temporary file
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
