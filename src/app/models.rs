//! Data models for pidstat processing
//!
//! This module contains the core data structures for representing pidstat
//! sections and the per-process CPU and memory records decoded from them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// =============================================================================
// Sections
// =============================================================================

/// Kind of snapshot a section header introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    /// CPU usage snapshot (`pidstat -u`)
    Cpu,
    /// Memory usage snapshot (`pidstat -r`)
    Memory,
}

impl SectionKind {
    /// Short lowercase name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Cpu => "cpu",
            SectionKind::Memory => "memory",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized section header with its snapshot timestamp
///
/// Valid until the next header line replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHeader {
    pub kind: SectionKind,
    pub timestamp: NaiveDateTime,
}

impl SectionHeader {
    pub fn new(kind: SectionKind, timestamp: NaiveDateTime) -> Self {
        Self { kind, timestamp }
    }
}

/// A single raw input line with its 1-based position in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

impl<'a> LogLine<'a> {
    pub fn new(number: usize, text: &'a str) -> Self {
        Self { number, text }
    }
}

// =============================================================================
// Records
// =============================================================================

/// One process row of a CPU snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuRecord {
    /// Timestamp of the section header this row belongs to
    pub timestamp: NaiveDateTime,

    pub pid: u32,
    pub uid: u32,

    /// Percentage of CPU used at user level
    pub usr_pct: f64,

    /// Percentage of CPU used at system (kernel) level
    pub system_pct: f64,

    /// Percentage of CPU spent running a virtual machine
    pub guest_pct: f64,

    /// Percentage of CPU spent waiting to run
    pub wait_pct: f64,

    /// Total percentage of CPU time used
    pub cpu_pct: f64,

    /// Processor number the task was running on
    pub cpu_num: u32,

    /// Command name, including any arguments pidstat printed
    pub command: String,
}

/// One process row of a memory snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemRecord {
    /// Timestamp of the section header this row belongs to
    pub timestamp: NaiveDateTime,

    pub pid: u32,
    pub uid: u32,

    /// Minor faults per second (no page load from disk)
    pub minflt_per_sec: f64,

    /// Major faults per second (page loaded from disk)
    pub majflt_per_sec: f64,

    /// Virtual size in kilobytes
    pub vsz: u64,

    /// Resident set size in kilobytes
    pub rss: u64,

    /// Share of physical memory in use
    pub mem_pct: f64,

    pub command: String,
}
