//! Record-to-table conversion
//!
//! Builds one polars frame per section kind. Rows keep input order and
//! duplicate (timestamp, pid) keys are retained.

use chrono::NaiveDateTime;
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::schema::{columns, timestamp_dtype, validate_frame};
use crate::app::models::{CpuRecord, MemRecord, SectionKind};
use crate::app::services::pidstat_parser::ParseResult;
use crate::{Error, Result};

/// The CPU and memory tables of one run
#[derive(Debug, Clone)]
pub struct ProcessTables {
    pub cpu: DataFrame,
    pub memory: DataFrame,
}

impl ProcessTables {
    /// Build both tables from a parse result
    pub fn from_parse_result(result: &ParseResult) -> Result<Self> {
        Ok(Self {
            cpu: cpu_table(&result.cpu_records)?,
            memory: mem_table(&result.mem_records)?,
        })
    }

    /// Keep only the last `rows` rows of each table
    pub fn tail(self, rows: usize) -> Self {
        Self {
            cpu: tail(&self.cpu, rows),
            memory: tail(&self.memory, rows),
        }
    }

    pub fn get(&self, kind: SectionKind) -> &DataFrame {
        match kind {
            SectionKind::Cpu => &self.cpu,
            SectionKind::Memory => &self.memory,
        }
    }

    pub fn summary(&self, kind: SectionKind) -> Result<TableSummary> {
        TableSummary::from_frame(self.get(kind))
    }
}

/// Shape and key cardinality of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: usize,
    pub unique_timestamps: usize,
    pub unique_pids: usize,
}

impl TableSummary {
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        Ok(Self {
            rows: df.height(),
            columns: df.width(),
            unique_timestamps: unique_count(df, columns::TIMESTAMP)?,
            unique_pids: unique_count(df, columns::PID)?,
        })
    }
}

/// Build the CPU table
pub fn cpu_table(records: &[CpuRecord]) -> Result<DataFrame> {
    debug!("Building CPU table from {} records", records.len());

    let df = DataFrame::new(vec![
        timestamp_column(records.iter().map(|r| r.timestamp))?,
        column(columns::PID, records.iter().map(|r| r.pid)),
        column(columns::UID, records.iter().map(|r| r.uid)),
        column(columns::USR, records.iter().map(|r| r.usr_pct)),
        column(columns::SYSTEM, records.iter().map(|r| r.system_pct)),
        column(columns::GUEST, records.iter().map(|r| r.guest_pct)),
        column(columns::WAIT, records.iter().map(|r| r.wait_pct)),
        column(columns::CPU, records.iter().map(|r| r.cpu_pct)),
        column(columns::CPU_NUM, records.iter().map(|r| r.cpu_num)),
        string_column(records.iter().map(|r| r.command.as_str())),
    ])
    .map_err(|e| Error::table_build("Failed to assemble CPU table", e))?;

    validate_frame(&df, SectionKind::Cpu)?;
    Ok(df)
}

/// Build the memory table
pub fn mem_table(records: &[MemRecord]) -> Result<DataFrame> {
    debug!("Building memory table from {} records", records.len());

    let df = DataFrame::new(vec![
        timestamp_column(records.iter().map(|r| r.timestamp))?,
        column(columns::PID, records.iter().map(|r| r.pid)),
        column(columns::UID, records.iter().map(|r| r.uid)),
        column(columns::MINFLT, records.iter().map(|r| r.minflt_per_sec)),
        column(columns::MAJFLT, records.iter().map(|r| r.majflt_per_sec)),
        column(columns::VSZ, records.iter().map(|r| r.vsz)),
        column(columns::RSS, records.iter().map(|r| r.rss)),
        column(columns::MEM_PERCENT, records.iter().map(|r| r.mem_pct)),
        string_column(records.iter().map(|r| r.command.as_str())),
    ])
    .map_err(|e| Error::table_build("Failed to assemble memory table", e))?;

    validate_frame(&df, SectionKind::Memory)?;
    Ok(df)
}

/// Keep only the last `rows` rows
pub fn tail(df: &DataFrame, rows: usize) -> DataFrame {
    df.tail(Some(rows))
}

fn timestamp_column(values: impl Iterator<Item = NaiveDateTime>) -> Result<Column> {
    let millis: Vec<i64> = values.map(|ts| ts.and_utc().timestamp_millis()).collect();
    let series = Series::new(columns::TIMESTAMP.into(), millis)
        .cast(&timestamp_dtype())
        .map_err(|e| Error::table_build("Failed to build timestamp column", e))?;
    Ok(series.into_column())
}

fn column<T, I>(name: &str, values: I) -> Column
where
    I: Iterator<Item = T>,
    Series: NamedFrom<Vec<T>, [T]>,
{
    let values: Vec<T> = values.collect();
    Series::new(name.into(), values).into_column()
}

fn string_column<'a>(values: impl Iterator<Item = &'a str>) -> Column {
    let values: Vec<&str> = values.collect();
    Series::new(columns::COMMAND.into(), values).into_column()
}

fn unique_count(df: &DataFrame, name: &str) -> Result<usize> {
    let column = df
        .column(name)
        .map_err(|e| Error::table_build(format!("Missing column {}", name), e))?;
    column
        .n_unique()
        .map_err(|e| Error::table_build(format!("Failed to count unique {}", name), e))
}
