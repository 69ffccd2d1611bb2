//! Column-order-free CSV row access.
//!
//! `bins.csv`/`items.csv`/`defects.csv` recognize a fixed set of column
//! names but let the caller order them however they like and omit any
//! column that has a default, so a row is read through a header->index map
//! rather than `csv`'s `Serialize`/`Deserialize` derive (which binds a
//! struct field to a fixed column position).

use anyhow::{Context, Result, bail};
use std::collections::HashMap;

/// One CSV row, addressable by (case-sensitive) column name.
pub(crate) struct Row<'a> {
    header: &'a HashMap<String, usize>,
    record: csv::StringRecord,
    line: u64,
}

impl<'a> Row<'a> {
    pub(crate) fn new(header: &'a HashMap<String, usize>, record: csv::StringRecord, line: u64) -> Self {
        Self { header, record, line }
    }

    fn raw(&self, column: &str) -> Option<&str> {
        self.header.get(column).and_then(|&i| self.record.get(i))
    }

    /// A mandatory column; errors (with the row number) if absent or not
    /// parseable as `f64`.
    pub(crate) fn f64(&self, column: &str) -> Result<f64> {
        let raw = self
            .raw(column)
            .with_context(|| format!("row {}: missing mandatory column '{column}'", self.line))?;
        raw.trim()
            .parse::<f64>()
            .with_context(|| format!("row {}: column '{column}' = {raw:?} is not a number", self.line))
    }

    /// An optional `f64` column, defaulting to `default` when absent or
    /// blank.
    pub(crate) fn f64_or(&self, column: &str, default: f64) -> Result<f64> {
        match self.raw(column) {
            None => Ok(default),
            Some(raw) if raw.trim().is_empty() => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("row {}: column '{column}' = {raw:?} is not a number", self.line)),
        }
    }

    /// An optional `i64` column, defaulting to `default` when absent or
    /// blank.
    pub(crate) fn i64_or(&self, column: &str, default: i64) -> Result<i64> {
        match self.raw(column) {
            None => Ok(default),
            Some(raw) if raw.trim().is_empty() => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("row {}: column '{column}' = {raw:?} is not an integer", self.line)),
        }
    }

    /// A mandatory `i64` column.
    pub(crate) fn i64_req(&self, column: &str) -> Result<i64> {
        let raw = self
            .raw(column)
            .with_context(|| format!("row {}: missing mandatory column '{column}'", self.line))?;
        raw.trim()
            .parse::<i64>()
            .with_context(|| format!("row {}: column '{column}' = {raw:?} is not an integer", self.line))
    }

    /// An optional `u32` column, defaulting to `default`.
    pub(crate) fn u32_or(&self, column: &str, default: u32) -> Result<u32> {
        Ok(self.i64_or(column, i64::from(default))?.max(0) as u32)
    }

    /// An optional string column, defaulting to `default`.
    pub(crate) fn str_or<'b>(&'b self, column: &str, default: &'b str) -> &'b str {
        match self.raw(column) {
            Some(raw) if !raw.trim().is_empty() => raw.trim(),
            _ => default,
        }
    }

    /// Whether the header contains this column at all (used to pick
    /// 2D vs. 3D geometry up front).
    pub(crate) fn has_column(&self, column: &str) -> bool {
        self.header.contains_key(column)
    }

    pub(crate) fn line(&self) -> u64 {
        self.line
    }
}

/// Builds a header name -> column index map from a CSV reader's header
/// record. Column names are taken verbatim (no case-folding): the formats
/// in `spec.md §6` are upper-case (`X`, `Y`, `COPIES_MIN`, ...).
pub(crate) fn header_index(headers: &csv::StringRecord) -> HashMap<String, usize> {
    headers.iter().enumerate().map(|(i, name)| (name.trim().to_string(), i)).collect()
}

/// Opens `path` and returns its header index plus a reader positioned at
/// the first data row. Errors if the file has no header row at all.
pub(crate) fn open_with_header(path: &std::path::Path) -> Result<(csv::Reader<std::fs::File>, HashMap<String, usize>)> {
    let file = std::fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut reader = detect_delimiter(file, path)?;
    let headers = reader
        .headers()
        .with_context(|| format!("{}: read header row", path.display()))?
        .clone();
    if headers.is_empty() {
        bail!("{}: empty header row", path.display());
    }
    Ok((reader, header_index(&headers)))
}

/// `bins.csv`/`items.csv`/`defects.csv`/`parameters.csv` may be comma- or
/// semicolon-separated (spec §6); sniff the first line for a semicolon
/// before any comma to pick the delimiter.
fn detect_delimiter(mut file: std::fs::File, path: &std::path::Path) -> Result<csv::Reader<std::fs::File>> {
    use std::io::{Read, Seek, SeekFrom};
    let mut probe = [0u8; 512];
    let n = file.read(&mut probe).with_context(|| format!("probe {}", path.display()))?;
    file.seek(SeekFrom::Start(0))?;
    let first_line = &probe[..n];
    let first_newline = first_line.iter().position(|&b| b == b'\n').unwrap_or(first_line.len());
    let header_line = &first_line[..first_newline];
    let delimiter = if header_line.contains(&b';') && !header_line.contains(&b',') {
        b';'
    } else {
        b','
    };
    Ok(csv::ReaderBuilder::new().delimiter(delimiter).has_headers(true).from_reader(file))
}
