//! Core pidstat parser implementation
//!
//! This module provides the section state machine and the file/reader entry
//! points. Lines are consumed one at a time in input order; each header opens
//! a new snapshot and every following data row is decoded against it.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use super::classifier::{LineClass, NoiseKind, classify};
use super::record_parser::RowDecoder;
use super::stats::{ParseResult, ParseStats, ParseWarning, WarningKind};
use super::timestamp::{banner_date, extract_timestamp};
use crate::app::models::{CpuRecord, LogLine, MemRecord, SectionHeader, SectionKind};
use crate::config::ParserConfig;
use crate::{Error, Result};

/// Which section the next data row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    NoSection,
    InCpuSection(NaiveDateTime),
    InMemSection(NaiveDateTime),
}

impl ParserState {
    /// The header currently governing data rows, if any
    pub fn active_header(&self) -> Option<SectionHeader> {
        match *self {
            ParserState::NoSection => None,
            ParserState::InCpuSection(ts) => Some(SectionHeader::new(SectionKind::Cpu, ts)),
            ParserState::InMemSection(ts) => Some(SectionHeader::new(SectionKind::Memory, ts)),
        }
    }
}

impl From<SectionHeader> for ParserState {
    fn from(header: SectionHeader) -> Self {
        match header.kind {
            SectionKind::Cpu => ParserState::InCpuSection(header.timestamp),
            SectionKind::Memory => ParserState::InMemSection(header.timestamp),
        }
    }
}

/// Incremental line consumer
///
/// Feed lines in order with [`SectionParser::feed`] and collect the result
/// with [`SectionParser::finish`].
#[derive(Debug)]
pub struct SectionParser {
    reference_date: NaiveDate,
    prefer_banner_date: bool,
    decoder: RowDecoder,
    state: ParserState,
    header_seen: bool,
    section_pids: HashSet<u32>,
    line_number: usize,
    cpu_records: Vec<CpuRecord>,
    mem_records: Vec<MemRecord>,
    warnings: Vec<ParseWarning>,
    stats: ParseStats,
}

impl SectionParser {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            reference_date: config.effective_date(),
            prefer_banner_date: config.prefer_banner_date,
            decoder: RowDecoder::new(config.max_percent),
            state: ParserState::NoSection,
            header_seen: false,
            section_pids: HashSet::new(),
            line_number: 0,
            cpu_records: Vec::new(),
            mem_records: Vec::new(),
            warnings: Vec::new(),
            stats: ParseStats::new(),
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Consume the next line of input
    pub fn feed(&mut self, text: &str) {
        self.line_number += 1;
        self.stats.total_lines += 1;
        let line = LogLine::new(self.line_number, text);

        match classify(line.text) {
            LineClass::Noise(kind) => self.on_noise(line, kind),
            LineClass::Header(kind) => self.on_header(line, kind),
            LineClass::Data => self.on_data(line),
        }
    }

    /// Finish parsing and return everything collected so far
    pub fn finish(self) -> ParseResult {
        ParseResult {
            cpu_records: self.cpu_records,
            mem_records: self.mem_records,
            warnings: self.warnings,
            stats: self.stats,
            reference_date: self.reference_date,
        }
    }

    fn on_noise(&mut self, line: LogLine<'_>, kind: NoiseKind) {
        self.stats.noise_lines += 1;

        match kind {
            NoiseKind::Banner if self.prefer_banner_date => {
                if let Some(date) = banner_date(line.text) {
                    debug!("Using banner date {} as reference date", date);
                    self.reference_date = date;
                }
            }
            NoiseKind::UnknownHeader => {
                // Rows after an unrecognised header must not be decoded
                // against the previous section's layout.
                self.header_seen = true;
                self.close_section();
                self.warn(line, WarningKind::UnknownHeader);
            }
            _ => {}
        }
    }

    fn on_header(&mut self, line: LogLine<'_>, kind: SectionKind) {
        self.header_seen = true;
        self.close_section();

        match extract_timestamp(line.text, self.reference_date) {
            Ok(timestamp) => {
                debug!(
                    "Line {}: opened {} section at {}",
                    line.number, kind, timestamp
                );
                self.stats.count_section(kind);
                self.state = SectionHeader::new(kind, timestamp).into();
            }
            Err(e) => self.warn(line, WarningKind::MalformedHeader(e)),
        }
    }

    fn on_data(&mut self, line: LogLine<'_>) {
        self.stats.data_lines += 1;

        let state = self.state;
        let (pid, failure) = match state {
            ParserState::NoSection => {
                let kind = if self.header_seen {
                    WarningKind::NoActiveSection
                } else {
                    WarningKind::DataBeforeHeader
                };
                self.warn(line, kind);
                return;
            }
            ParserState::InCpuSection(ts) => match self.decoder.decode_cpu(line.text, ts) {
                Ok(record) => {
                    let pid = record.pid;
                    self.cpu_records.push(record);
                    (pid, None)
                }
                Err(failure) => (0, Some((SectionKind::Cpu, failure))),
            },
            ParserState::InMemSection(ts) => match self.decoder.decode_mem(line.text, ts) {
                Ok(record) => {
                    let pid = record.pid;
                    self.mem_records.push(record);
                    (pid, None)
                }
                Err(failure) => (0, Some((SectionKind::Memory, failure))),
            },
        };

        if let Some((section, failure)) = failure {
            self.warn(line, WarningKind::Decode { section, failure });
            return;
        }

        self.stats.records_parsed += 1;
        if !self.section_pids.insert(pid) {
            self.warn(line, WarningKind::DuplicatePid { pid });
        }
    }

    fn close_section(&mut self) {
        self.state = ParserState::NoSection;
        self.section_pids.clear();
    }

    fn warn(&mut self, line: LogLine<'_>, kind: WarningKind) {
        debug!("Line {}: {}", line.number, kind);
        if kind.drops_line() {
            self.stats.lines_skipped += 1;
        }
        self.warnings.push(ParseWarning {
            line_number: line.number,
            raw_line: line.text.to_string(),
            kind,
        });
    }
}

/// Parse a sequence of lines into records and warnings
pub fn parse_stream<I, S>(lines: I, config: &ParserConfig) -> ParseResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = SectionParser::new(config);
    for line in lines {
        parser.feed(line.as_ref());
    }
    parser.finish()
}

/// Parser for pidstat text reports
///
/// Handles:
/// - CPU (`-u`) and memory (`-r`) sections in any interleaving
/// - 12-hour and 24-hour header times
/// - Banner and `Average:` summary lines
/// - Graceful degradation: bad lines become warnings, never errors
#[derive(Debug, Clone, Default)]
pub struct PidstatParser {
    config: ParserConfig,
}

impl PidstatParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse in-memory report text
    pub fn parse_str(&self, content: &str) -> ParseResult {
        parse_stream(content.lines(), &self.config)
    }

    /// Parse a report from any buffered reader
    ///
    /// `source` names the input in error messages.
    pub fn parse_reader<R: BufRead>(&self, reader: R, source: &str) -> Result<ParseResult> {
        let mut parser = SectionParser::new(&self.config);

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| match e.kind() {
                ErrorKind::InvalidData => Error::invalid_encoding(source, index + 1),
                _ => Error::io(format!("Failed to read {}", source), e),
            })?;
            parser.feed(&line);
        }

        Ok(parser.finish())
    }

    /// Parse a pidstat log file
    pub fn parse_file(&self, path: &Path) -> Result<ParseResult> {
        self.parse_file_with_progress(path, None)
    }

    /// Parse a pidstat log file, advancing `progress` by the bytes read
    ///
    /// The bar's length is set to the file size and the bar is cleared once
    /// reading ends.
    pub fn parse_file_with_progress(
        &self,
        path: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<ParseResult> {
        info!("Parsing pidstat log: {}", path.display());

        let file = open_log(path)?;
        let source = path.display().to_string();

        let result = match progress {
            Some(pb) => {
                let metadata = file
                    .metadata()
                    .map_err(|e| Error::io(format!("Failed to stat {}", source), e))?;
                pb.set_length(metadata.len());
                let result = self.parse_reader(BufReader::new(pb.wrap_read(file)), &source);
                pb.finish_and_clear();
                result?
            }
            None => self.parse_reader(BufReader::new(file), &source)?,
        };

        log_summary(&result);
        Ok(result)
    }
}

/// Open a log file, mapping a missing file to [`Error::FileNotFound`]
pub fn open_log(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::file_not_found(path.display().to_string()),
        _ => Error::io(format!("Failed to open {}", path.display()), e),
    })
}

fn log_summary(result: &ParseResult) {
    info!(
        "Parsed {} CPU and {} memory records from {} lines",
        result.cpu_records.len(),
        result.mem_records.len(),
        result.stats.total_lines
    );

    if result.has_warnings() {
        warn!(
            "{} lines produced warnings ({} skipped)",
            result.warnings.len(),
            result.stats.lines_skipped
        );
    }
}
