//! Row decoders for pidstat CPU and memory sections
//!
//! Each decoder maps the positional fields of one data row onto a fixed
//! record shape. The section timestamp is supplied by the caller; decoders
//! never look at the row's own time prefix.

use chrono::NaiveDateTime;

use super::field_parsers::{DecodeFailure, RowFields, check_percent};
use crate::app::models::{CpuRecord, MemRecord};
use crate::constants::{DEFAULT_MAX_PERCENT, cpu_fields, mem_fields};

/// Decodes data rows with a configurable percentage ceiling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowDecoder {
    max_percent: f64,
}

impl Default for RowDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PERCENT)
    }
}

impl RowDecoder {
    pub fn new(max_percent: f64) -> Self {
        Self { max_percent }
    }

    pub fn max_percent(&self) -> f64 {
        self.max_percent
    }

    /// Decode a CPU row: uid, pid, %usr, %system, %guest, %wait, %CPU, CPU, command
    pub fn decode_cpu(
        &self,
        line: &str,
        timestamp: NaiveDateTime,
    ) -> Result<CpuRecord, DecodeFailure> {
        let row = RowFields::parse(line);
        row.require(cpu_fields::MIN_FIELDS)?;

        let uid = row.parse_field::<u32>(cpu_fields::UID)?;
        let pid = row.parse_field::<u32>(cpu_fields::PID)?;
        let usr_pct = self.percent(&row, cpu_fields::USR, "usr")?;
        let system_pct = self.percent(&row, cpu_fields::SYSTEM, "system")?;
        let guest_pct = self.percent(&row, cpu_fields::GUEST, "guest")?;
        let wait_pct = self.percent(&row, cpu_fields::WAIT, "wait")?;
        let cpu_pct = self.percent(&row, cpu_fields::CPU, "cpu")?;
        let cpu_num = row.parse_field::<u32>(cpu_fields::CPU_NUM)?;

        Ok(CpuRecord {
            timestamp,
            pid,
            uid,
            usr_pct,
            system_pct,
            guest_pct,
            wait_pct,
            cpu_pct,
            cpu_num,
            command: row.remainder(cpu_fields::FIXED).to_string(),
        })
    }

    /// Decode a memory row: uid, pid, minflt/s, majflt/s, VSZ, RSS, %MEM, command
    pub fn decode_mem(
        &self,
        line: &str,
        timestamp: NaiveDateTime,
    ) -> Result<MemRecord, DecodeFailure> {
        let row = RowFields::parse(line);
        row.require(mem_fields::MIN_FIELDS)?;

        let uid = row.parse_field::<u32>(mem_fields::UID)?;
        let pid = row.parse_field::<u32>(mem_fields::PID)?;
        let minflt_per_sec = row.parse_field::<f64>(mem_fields::MINFLT)?;
        let majflt_per_sec = row.parse_field::<f64>(mem_fields::MAJFLT)?;
        let vsz = row.parse_field::<u64>(mem_fields::VSZ)?;
        let rss = row.parse_field::<u64>(mem_fields::RSS)?;
        let mem_pct = self.percent(&row, mem_fields::MEM, "mem_percent")?;

        Ok(MemRecord {
            timestamp,
            pid,
            uid,
            minflt_per_sec,
            majflt_per_sec,
            vsz,
            rss,
            mem_pct,
            command: row.remainder(mem_fields::FIXED).to_string(),
        })
    }

    fn percent(
        &self,
        row: &RowFields<'_>,
        index: usize,
        name: &'static str,
    ) -> Result<f64, DecodeFailure> {
        let value = row.parse_field::<f64>(index)?;
        check_percent(name, value, self.max_percent)
    }
}

/// Decode a CPU row with the default percentage ceiling
pub fn decode_cpu(line: &str, timestamp: NaiveDateTime) -> Result<CpuRecord, DecodeFailure> {
    RowDecoder::default().decode_cpu(line, timestamp)
}

/// Decode a memory row with the default percentage ceiling
pub fn decode_mem(line: &str, timestamp: NaiveDateTime) -> Result<MemRecord, DecodeFailure> {
    RowDecoder::default().decode_mem(line, timestamp)
}
