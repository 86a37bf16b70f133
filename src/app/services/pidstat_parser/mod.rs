//! Parser for `pidstat -u -r` process-statistics logs
//!
//! pidstat alternates CPU and memory snapshots, each introduced by a header
//! line carrying the sampling time. This module turns that text into two
//! ordered record sequences plus non-fatal warnings.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`parser`] - Section state machine and file/reader entry points
//! - [`classifier`] - Noise, header and data line classification
//! - [`timestamp`] - Header time tokens, banner and reference dates
//! - [`record_parser`] - CPU and memory row decoders
//! - [`field_parsers`] - Positional field splitting and validation
//! - [`stats`] - Parse result, warnings and statistics
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pidstat_processor::app::services::pidstat_parser::PidstatParser;
//! use pidstat_processor::config::ParserConfig;
//!
//! # fn example() -> pidstat_processor::Result<()> {
//! let parser = PidstatParser::new(ParserConfig::default());
//! let result = parser.parse_file(std::path::Path::new("pidstat.log"))?;
//!
//! println!("Parsed {} CPU and {} memory records ({} warnings)",
//!          result.cpu_records.len(),
//!          result.mem_records.len(),
//!          result.warnings.len());
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod field_parsers;
pub mod parser;
pub mod record_parser;
pub mod stats;
pub mod timestamp;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use classifier::{LineClass, NoiseKind, classify};
pub use field_parsers::DecodeFailure;
pub use parser::{ParserState, PidstatParser, SectionParser, open_log, parse_stream};
pub use record_parser::{RowDecoder, decode_cpu, decode_mem};
pub use stats::{ParseResult, ParseStats, ParseWarning, WarningKind};
pub use timestamp::{TimestampError, banner_date, extract_timestamp, parse_reference_date};
