//! Application constants for pidstat processor
//!
//! This module contains the column marker tokens, field layouts, default values
//! and output naming used throughout the pidstat processor.

// =============================================================================
// Header Marker Tokens
// =============================================================================

/// Column markers that must both be present for a line to be a section header
pub mod markers {
    /// User id column marker
    pub const UID: &str = "UID";

    /// Process id column marker
    pub const PID: &str = "PID";

    /// CPU percentage column marker, identifies a CPU section (`pidstat -u`)
    pub const CPU_PERCENT: &str = "%CPU";

    /// Minor fault rate column marker, identifies a memory section (`pidstat -r`)
    pub const MINFLT_RATE: &str = "minflt/s";

    /// Prefix of the system-info banner pidstat prints once at start
    pub const BANNER_PREFIX: &str = "Linux";

    /// Prefix of the per-process mean block pidstat prints on exit
    pub const SUMMARY_PREFIX: &str = "Average:";
}

// =============================================================================
// Row Layouts
// =============================================================================

/// CPU row layout: uid, pid, %usr, %system, %guest, %wait, %CPU, CPU, command
pub mod cpu_fields {
    pub const UID: usize = 0;
    pub const PID: usize = 1;
    pub const USR: usize = 2;
    pub const SYSTEM: usize = 3;
    pub const GUEST: usize = 4;
    pub const WAIT: usize = 5;
    pub const CPU: usize = 6;
    pub const CPU_NUM: usize = 7;

    /// Number of positional fields before the command
    pub const FIXED: usize = 8;

    /// Minimum field count including the command
    pub const MIN_FIELDS: usize = FIXED + 1;
}

/// Memory row layout: uid, pid, minflt/s, majflt/s, VSZ, RSS, %MEM, command
pub mod mem_fields {
    pub const UID: usize = 0;
    pub const PID: usize = 1;
    pub const MINFLT: usize = 2;
    pub const MAJFLT: usize = 3;
    pub const VSZ: usize = 4;
    pub const RSS: usize = 5;
    pub const MEM: usize = 6;

    /// Number of positional fields before the command
    pub const FIXED: usize = 7;

    /// Minimum field count including the command
    pub const MIN_FIELDS: usize = FIXED + 1;
}

// =============================================================================
// Defaults
// =============================================================================

/// Default upper bound for percentage fields
pub const DEFAULT_MAX_PERCENT: f64 = 100.0;

/// Default output directory for generated tables
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Default number of warnings printed by the CLI summary
pub const DEFAULT_WARNINGS_SHOWN: usize = 10;

/// Output file stem for the CPU table
pub const CPU_TABLE_STEM: &str = "cpu_stats";

/// Output file stem for the memory table
pub const MEM_TABLE_STEM: &str = "mem_stats";

/// Timestamp format used when writing CSV tables
pub const CSV_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "PIDSTAT_";
