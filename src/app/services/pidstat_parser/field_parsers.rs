//! Field parsing utilities for pidstat data rows
//!
//! This module splits a data row into positional fields while keeping each
//! field's byte offset, so the trailing command can be recovered verbatim.

use std::str::FromStr;

use super::timestamp::strip_time_prefix;

/// Why a data row could not be decoded
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeFailure {
    #[error("too few fields: expected at least {expected}, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("field {index} has invalid {expected_type} value '{raw}'")]
    BadField {
        index: usize,
        raw: String,
        expected_type: &'static str,
    },

    #[error("{field} value {value} is outside 0..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        max: f64,
    },
}

/// A whitespace-delimited token and where it starts in the row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub start: usize,
    pub text: &'a str,
}

/// Positional fields of one data row
#[derive(Debug, Clone)]
pub struct RowFields<'a> {
    row: &'a str,
    fields: Vec<Field<'a>>,
}

impl<'a> RowFields<'a> {
    /// Split a data row, dropping the sampling-time prefix if present
    pub fn parse(line: &'a str) -> Self {
        let row = strip_time_prefix(line);
        Self {
            row,
            fields: tokenize(row),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw text of the field at `index`
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.fields.get(index).map(|f| f.text)
    }

    /// Fail with `TooFewFields` unless at least `expected` fields are present
    pub fn require(&self, expected: usize) -> Result<(), DecodeFailure> {
        if self.fields.len() < expected {
            return Err(DecodeFailure::TooFewFields {
                expected,
                found: self.fields.len(),
            });
        }
        Ok(())
    }

    /// Parse the field at `index` as `T`
    pub fn parse_field<T: FromStr>(&self, index: usize) -> Result<T, DecodeFailure> {
        let raw = self.get(index).unwrap_or_default();
        raw.parse::<T>().map_err(|_| DecodeFailure::BadField {
            index,
            raw: raw.to_string(),
            expected_type: std::any::type_name::<T>(),
        })
    }

    /// Everything from the field at `index` to the end of the row, verbatim
    pub fn remainder(&self, index: usize) -> &'a str {
        match self.fields.get(index) {
            Some(field) => self.row[field.start..].trim_end(),
            None => "",
        }
    }
}

/// Split a row on runs of whitespace, recording each token's offset
pub fn tokenize(row: &str) -> Vec<Field<'_>> {
    let mut fields = Vec::new();
    let mut start = None;

    for (idx, ch) in row.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                fields.push(Field {
                    start: s,
                    text: &row[s..idx],
                });
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }

    if let Some(s) = start {
        fields.push(Field {
            start: s,
            text: &row[s..],
        });
    }

    fields
}

/// Validate a percentage against `0.0..=max`
pub fn check_percent(field: &'static str, value: f64, max: f64) -> Result<f64, DecodeFailure> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(DecodeFailure::OutOfRange { field, value, max })
    }
}
