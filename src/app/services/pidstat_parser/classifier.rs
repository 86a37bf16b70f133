//! Line classification for pidstat reports
//!
//! Pure predicates deciding whether a raw line is noise, a section header
//! (and which section kind it opens), or a data row.

use super::timestamp::strip_time_prefix;
use crate::app::models::SectionKind;
use crate::constants::markers;

/// Why a line was classified as noise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseKind {
    /// Empty or whitespace-only line
    Blank,
    /// System-info banner (`Linux <kernel> (<host>) <date> ...`)
    Banner,
    /// End-of-run `Average:` block
    Summary,
    /// Leads with the UID/PID markers but has neither section marker
    UnknownHeader,
}

/// Classification of a single input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Noise(NoiseKind),
    Header(SectionKind),
    Data,
}

impl LineClass {
    /// Whether this classification should be reported as a warning
    pub fn is_warning(&self) -> bool {
        matches!(self, LineClass::Noise(NoiseKind::UnknownHeader))
    }
}

/// Classify a raw line
pub fn classify(line: &str) -> LineClass {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return LineClass::Noise(NoiseKind::Blank);
    }
    if is_banner(trimmed) {
        return LineClass::Noise(NoiseKind::Banner);
    }
    if is_summary(trimmed) {
        return LineClass::Noise(NoiseKind::Summary);
    }
    if is_header_line(trimmed) {
        return match section_kind(trimmed) {
            Some(kind) => LineClass::Header(kind),
            None => LineClass::Noise(NoiseKind::UnknownHeader),
        };
    }

    LineClass::Data
}

/// Check if a line is the system-info banner
pub fn is_banner(line: &str) -> bool {
    line.trim_start().starts_with(markers::BANNER_PREFIX)
}

/// Check if a line belongs to the end-of-run summary block
pub fn is_summary(line: &str) -> bool {
    line.trim_start().starts_with(markers::SUMMARY_PREFIX)
}

/// Check if the user-id and process-id column markers follow the time token
///
/// Data rows may mention `UID` or `PID` inside the command, but only a
/// header carries them as its first two columns.
pub fn is_header_line(line: &str) -> bool {
    let mut columns = strip_time_prefix(line).split_whitespace();
    columns.next() == Some(markers::UID) && columns.next() == Some(markers::PID)
}

/// Determine which section a header line opens
///
/// Returns `None` when neither section marker is present, or when both are
/// (a combined layout neither decoder understands).
pub fn section_kind(header_line: &str) -> Option<SectionKind> {
    let cpu = has_token(header_line, markers::CPU_PERCENT);
    let memory = has_token(header_line, markers::MINFLT_RATE);

    match (cpu, memory) {
        (true, false) => Some(SectionKind::Cpu),
        (false, true) => Some(SectionKind::Memory),
        _ => None,
    }
}

fn has_token(line: &str, token: &str) -> bool {
    line.split_whitespace().any(|t| t == token)
}
