//! Table output to CSV or Parquet files

use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::conversion::ProcessTables;
use crate::app::models::SectionKind;
use crate::constants::{CPU_TABLE_STEM, CSV_DATETIME_FORMAT, MEM_TABLE_STEM};
use crate::{Error, Result};

/// File format for written tables
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "parquet" => Ok(OutputFormat::Parquet),
            other => Err(Error::configuration(format!(
                "Unknown output format '{}'. Expected csv or parquet",
                other
            ))),
        }
    }
}

/// A table written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub kind: SectionKind,
    pub path: PathBuf,
    pub rows: usize,
    pub bytes: u64,
}

/// File stem used for a section kind's table
pub fn table_stem(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Cpu => CPU_TABLE_STEM,
        SectionKind::Memory => MEM_TABLE_STEM,
    }
}

/// Path a table will be written to
pub fn table_path(output_dir: &Path, kind: SectionKind, format: OutputFormat) -> PathBuf {
    output_dir.join(format!("{}.{}", table_stem(kind), format.extension()))
}

/// Write both tables into `output_dir`, creating it if needed
pub fn write_tables(
    tables: &ProcessTables,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<Vec<WrittenTable>> {
    std::fs::create_dir_all(output_dir).map_err(|e| {
        Error::io(
            format!("Failed to create output directory {}", output_dir.display()),
            e,
        )
    })?;

    let mut written = Vec::with_capacity(2);
    for kind in [SectionKind::Cpu, SectionKind::Memory] {
        let path = table_path(output_dir, kind, format);
        written.push(write_table(tables.get(kind), kind, &path, format)?);
    }

    info!(
        "Wrote {} tables to {}",
        written.len(),
        output_dir.display()
    );
    Ok(written)
}

/// Write a single table
pub fn write_table(
    df: &DataFrame,
    kind: SectionKind,
    path: &Path,
    format: OutputFormat,
) -> Result<WrittenTable> {
    debug!("Writing {} rows to {}", df.height(), path.display());

    let mut df = df.clone();
    let mut file = File::create(path).map_err(|e| {
        Error::table_write(
            path.display().to_string(),
            "Failed to create file",
            Box::new(e),
        )
    })?;

    let result = match format {
        OutputFormat::Csv => CsvWriter::new(&mut file)
            .include_header(true)
            .with_datetime_format(Some(CSV_DATETIME_FORMAT.to_string()))
            .finish(&mut df),
        OutputFormat::Parquet => ParquetWriter::new(&mut file)
            .with_compression(ParquetCompression::Snappy)
            .finish(&mut df)
            .map(|_| ()),
    };

    result.map_err(|e| {
        Error::table_write(
            path.display().to_string(),
            format!("Failed to write {} table", kind),
            Box::new(e),
        )
    })?;
    drop(file);

    let bytes = std::fs::metadata(path)
        .map_err(|e| Error::io(format!("Failed to stat {}", path.display()), e))?
        .len();

    Ok(WrittenTable {
        kind,
        path: path.to_path_buf(),
        rows: df.height(),
        bytes,
    })
}
