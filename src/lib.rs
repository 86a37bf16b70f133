//! pidstat Processor Library
//!
//! A Rust library for converting `pidstat` process-statistics logs (alternating
//! CPU and memory snapshots) into typed per-process tables.
//!
//! This library provides tools for:
//! - Classifying log lines into noise, section headers and data rows
//! - Tracking the active section through an explicit state machine
//! - Decoding CPU and memory rows into fixed-shape records
//! - Collecting non-fatal warnings with line numbers instead of aborting
//! - Building polars tables keyed by (timestamp, pid) and writing them out

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod pidstat_parser;
        pub mod table_builder;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{CpuRecord, MemRecord, SectionHeader, SectionKind};
pub use app::services::pidstat_parser::{ParseResult, PidstatParser, parse_stream};
pub use config::Config;

/// Result type alias for the pidstat processor
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error types for pidstat processing operations
///
/// Line-level problems never appear here; they are reported as
/// [`app::services::pidstat_parser::ParseWarning`]s inside the parse result.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Input file does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Input is not valid UTF-8
    #[error("Invalid UTF-8 in '{path}' at line {line_number}")]
    InvalidEncoding { path: String, line_number: usize },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Date parsing error (reference dates supplied by the caller)
    #[error("Date parsing error: {message}")]
    DateParsing {
        message: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    /// Table construction failed
    #[error("Table build error: {message}")]
    TableBuild {
        message: String,
        #[source]
        source: polars::error::PolarsError,
    },

    /// Writing a table to disk failed
    #[error("Table write error for '{path}': {message}")]
    TableWrite {
        path: String,
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an invalid encoding error
    pub fn invalid_encoding(path: impl Into<String>, line_number: usize) -> Self {
        Self::InvalidEncoding {
            path: path.into(),
            line_number,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a date parsing error
    pub fn date_parsing(message: impl Into<String>, source: Option<chrono::ParseError>) -> Self {
        Self::DateParsing {
            message: message.into(),
            source,
        }
    }

    /// Create a table build error
    pub fn table_build(message: impl Into<String>, source: polars::error::PolarsError) -> Self {
        Self::TableBuild {
            message: message.into(),
            source,
        }
    }

    /// Create a table write error
    pub fn table_write(
        path: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::TableWrite {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Whether this error comes from the input stream itself
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::FileNotFound { .. } | Self::InvalidEncoding { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<polars::error::PolarsError> for Error {
    fn from(error: polars::error::PolarsError) -> Self {
        Self::TableBuild {
            message: "Polars operation failed".to_string(),
            source: error,
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateParsing {
            message: "Date parsing failed".to_string(),
            source: Some(error),
        }
    }
}
