//! Unit tests for the table_builder module


use crate::app::models::{CpuRecord, MemRecord};
use chrono::{NaiveDate, NaiveDateTime};

pub fn ts(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 2)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn cpu_record(timestamp: NaiveDateTime, pid: u32, command: &str) -> CpuRecord {
    CpuRecord {
        timestamp,
        pid,
        uid: 1000,
        usr_pct: 1.5,
        system_pct: 0.5,
        guest_pct: 0.0,
        wait_pct: 0.25,
        cpu_pct: 2.0,
        cpu_num: 3,
        command: command.to_string(),
    }
}

pub fn mem_record(timestamp: NaiveDateTime, pid: u32, command: &str) -> MemRecord {
    MemRecord {
        timestamp,
        pid,
        uid: 0,
        minflt_per_sec: 12.0,
        majflt_per_sec: 0.0,
        vsz: 2_124_408,
        rss: 67_916,
        mem_pct: 8.61,
        command: command.to_string(),
    }
}

/// Millisecond epoch values of a datetime column
pub fn epoch_millis(df: &polars::prelude::DataFrame, name: &str) -> Vec<Option<i64>> {
    use polars::prelude::DataType;

    df.column(name)
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}
