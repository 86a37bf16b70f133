//! Declared column layouts for the CPU and memory tables
//!
//! Both tables lead with the (timestamp, pid) key. The layouts are declared
//! once here and every built frame is checked against them.

use polars::prelude::*;

use crate::app::models::SectionKind;
use crate::{Error, Result};

/// Column names shared by both tables
pub mod columns {
    pub const TIMESTAMP: &str = "timestamp";
    pub const PID: &str = "pid";
    pub const UID: &str = "uid";
    pub const COMMAND: &str = "command";

    pub const USR: &str = "usr";
    pub const SYSTEM: &str = "system";
    pub const GUEST: &str = "guest";
    pub const WAIT: &str = "wait";
    pub const CPU: &str = "cpu";
    pub const CPU_NUM: &str = "cpu_num";

    pub const MINFLT: &str = "minflt";
    pub const MAJFLT: &str = "majflt";
    pub const VSZ: &str = "vsz";
    pub const RSS: &str = "rss";
    pub const MEM_PERCENT: &str = "mem_percent";
}

/// Key columns, in order
pub const KEY_COLUMNS: [&str; 2] = [columns::TIMESTAMP, columns::PID];

/// Data type of the timestamp column
pub fn timestamp_dtype() -> DataType {
    DataType::Datetime(TimeUnit::Milliseconds, None)
}

/// Schema of the CPU table
pub fn cpu_schema() -> Schema {
    build_schema(&[
        (columns::TIMESTAMP, timestamp_dtype()),
        (columns::PID, DataType::UInt32),
        (columns::UID, DataType::UInt32),
        (columns::USR, DataType::Float64),
        (columns::SYSTEM, DataType::Float64),
        (columns::GUEST, DataType::Float64),
        (columns::WAIT, DataType::Float64),
        (columns::CPU, DataType::Float64),
        (columns::CPU_NUM, DataType::UInt32),
        (columns::COMMAND, DataType::String),
    ])
}

/// Schema of the memory table
pub fn mem_schema() -> Schema {
    build_schema(&[
        (columns::TIMESTAMP, timestamp_dtype()),
        (columns::PID, DataType::UInt32),
        (columns::UID, DataType::UInt32),
        (columns::MINFLT, DataType::Float64),
        (columns::MAJFLT, DataType::Float64),
        (columns::VSZ, DataType::UInt64),
        (columns::RSS, DataType::UInt64),
        (columns::MEM_PERCENT, DataType::Float64),
        (columns::COMMAND, DataType::String),
    ])
}

/// Schema for a section kind
pub fn schema_for(kind: SectionKind) -> Schema {
    match kind {
        SectionKind::Cpu => cpu_schema(),
        SectionKind::Memory => mem_schema(),
    }
}

/// Check that a frame has exactly the declared columns, in order
pub fn validate_frame(df: &DataFrame, kind: SectionKind) -> Result<()> {
    let expected = schema_for(kind);
    let actual: Vec<(&str, &DataType)> = df
        .get_columns()
        .iter()
        .map(|c| (c.name().as_str(), c.dtype()))
        .collect();

    if actual.len() != expected.len() {
        return Err(schema_mismatch(
            kind,
            format!(
                "expected {} columns, found {}",
                expected.len(),
                actual.len()
            ),
        ));
    }

    for ((name, dtype), (actual_name, actual_dtype)) in expected.iter().zip(actual) {
        if name.as_str() != actual_name || dtype != actual_dtype {
            return Err(schema_mismatch(
                kind,
                format!(
                    "expected column {} ({}), found {} ({})",
                    name, dtype, actual_name, actual_dtype
                ),
            ));
        }
    }

    Ok(())
}

fn build_schema(fields: &[(&str, DataType)]) -> Schema {
    Schema::from_iter(
        fields
            .iter()
            .map(|(name, dtype)| (PlSmallStr::from(*name), dtype.clone())),
    )
}

fn schema_mismatch(kind: SectionKind, detail: String) -> Error {
    Error::table_build(
        format!("{} table does not match its schema", kind),
        PolarsError::SchemaMismatch(detail.into()),
    )
}
