//! Table construction and output for parsed pidstat records
//!
//! Turns the CPU and memory record sequences into polars frames keyed by
//! (timestamp, pid) and writes them as `cpu_stats.*` / `mem_stats.*`.
//!
//! - [`schema`] - Declared column names and types
//! - [`conversion`] - Record-to-frame conversion, summaries and tail
//! - [`writer`] - CSV and Parquet output
//!
//! # Example
//!
//! ```rust,no_run
//! use pidstat_processor::app::services::table_builder::{OutputFormat, ProcessTables, write_tables};
//! use pidstat_processor::{PidstatParser, config::ParserConfig};
//!
//! # fn example() -> pidstat_processor::Result<()> {
//! let result = PidstatParser::new(ParserConfig::default())
//!     .parse_file(std::path::Path::new("pidstat.log"))?;
//! let tables = ProcessTables::from_parse_result(&result)?;
//! write_tables(&tables, std::path::Path::new("outputs"), OutputFormat::Csv)?;
//! # Ok(())
//! # }
//! ```
//!
//! Empty record sequences still produce tables carrying the declared schema.

pub mod conversion;
pub mod schema;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use conversion::{ProcessTables, TableSummary, cpu_table, mem_table, tail};
pub use schema::{cpu_schema, mem_schema, validate_frame};
pub use writer::{OutputFormat, WrittenTable, table_path, write_table, write_tables};
