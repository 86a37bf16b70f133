//! Parsing statistics and result structures for pidstat processing
//!
//! This module provides the parse result handed to the table builder, the
//! warnings collected along the way and simple counters for reporting.

use chrono::NaiveDate;
use serde::Serialize;

use super::field_parsers::DecodeFailure;
use super::timestamp::TimestampError;
use crate::app::models::{CpuRecord, MemRecord, SectionKind};

/// Parsing result with records, warnings and basic statistics
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// CPU records in input order
    pub cpu_records: Vec<CpuRecord>,

    /// Memory records in input order
    pub mem_records: Vec<MemRecord>,

    /// Non-fatal diagnostics in input order
    pub warnings: Vec<ParseWarning>,

    /// Basic parsing statistics
    pub stats: ParseStats,

    /// Date combined with header times (after any banner override)
    pub reference_date: NaiveDate,
}

impl ParseResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Count warnings matching a predicate on their kind
    pub fn count_warnings(&self, predicate: impl Fn(&WarningKind) -> bool) -> usize {
        self.warnings.iter().filter(|w| predicate(&w.kind)).count()
    }

    /// Total number of decoded records across both sections
    pub fn total_records(&self) -> usize {
        self.cpu_records.len() + self.mem_records.len()
    }
}

/// A skipped or degraded line
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    /// 1-based line number in the input
    pub line_number: usize,

    /// The offending line as read
    pub raw_line: String,

    pub kind: WarningKind,
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: {} [{}]",
            self.line_number,
            self.kind,
            self.raw_line.trim()
        )
    }
}

/// What went wrong with a line
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WarningKind {
    #[error("unknown header format")]
    UnknownHeader,

    #[error("malformed header: {0}")]
    MalformedHeader(TimestampError),

    #[error("data before first header")]
    DataBeforeHeader,

    #[error("data outside an active section")]
    NoActiveSection,

    #[error("could not decode {section} row: {failure}")]
    Decode {
        section: SectionKind,
        failure: DecodeFailure,
    },

    #[error("duplicate pid {pid} in snapshot")]
    DuplicatePid { pid: u32 },
}

impl WarningKind {
    /// Whether the line was dropped (as opposed to kept with a diagnostic)
    pub fn drops_line(&self) -> bool {
        !matches!(self, WarningKind::DuplicatePid { .. })
    }
}

/// Simple parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Total number of lines read
    pub total_lines: usize,

    /// Blank, banner, summary and unknown-header lines
    pub noise_lines: usize,

    /// CPU headers accepted with a valid timestamp
    pub cpu_sections: usize,

    /// Memory headers accepted with a valid timestamp
    pub mem_sections: usize,

    /// Lines classified as data rows
    pub data_lines: usize,

    /// Data rows decoded into records
    pub records_parsed: usize,

    /// Lines dropped with a warning
    pub lines_skipped: usize,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of data rows that became records, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.data_lines == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / self.data_lines as f64) * 100.0
        }
    }

    /// Check if parsing was mostly successful (>90% success rate)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > 90.0
    }

    pub(crate) fn count_section(&mut self, kind: SectionKind) {
        match kind {
            SectionKind::Cpu => self.cpu_sections += 1,
            SectionKind::Memory => self.mem_sections += 1,
        }
    }
}
