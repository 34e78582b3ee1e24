//! Loading of the salary dataset.
//!
//! Rows are read with the `csv` crate into [`RawRow`] (all text), then
//! validated field by field into a [`Record`]. A row that fails validation
//! aborts the load; nothing is defaulted.

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::IngestError;
use crate::types::Record;

/// One CSV row before validation.
///
/// Columns are matched by header name; any other column in the file is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    pub rank: String,
    pub discipline: String,
    #[serde(rename = "yrs.since.phd")]
    pub yrs_since_phd: String,
    #[serde(rename = "yrs.service")]
    pub yrs_service: String,
    pub sex: String,
    pub salary: String,
}

/// Load every record from a CSV file on disk
pub fn load_records_from_path(path: impl AsRef<Path>) -> Result<Vec<Record>, IngestError> {
    let path = path.as_ref();
    let reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
    let records = read_all(reader)?;
    log::debug!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Load every record from any CSV source
pub fn load_records_from_reader<R: Read>(source: R) -> Result<Vec<Record>, IngestError> {
    let reader = ReaderBuilder::new().trim(Trim::All).from_reader(source);
    let records = read_all(reader)?;
    log::debug!("loaded {} records", records.len());
    Ok(records)
}

fn read_all<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Record>, IngestError> {
    let headers = reader.headers()?.clone();
    let mut records = Vec::new();

    for result in reader.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawRow = row.deserialize(Some(&headers))?;
        records.push(parse_row(line, &raw)?);
    }

    Ok(records)
}

/// Validate a raw row into a record
///
/// `line` is only used for error reporting.
pub fn parse_row(line: u64, raw: &RawRow) -> Result<Record, IngestError> {
    Ok(Record {
        discipline: raw.discipline.trim().to_string(),
        sex: parse_category(line, "sex", &raw.sex)?,
        rank: parse_category(line, "rank", &raw.rank)?,
        salary: parse_number(line, "salary", &raw.salary)?,
        yrs_service: parse_number(line, "yrs.service", &raw.yrs_service)?,
        yrs_since_phd: parse_number(line, "yrs.since.phd", &raw.yrs_since_phd)?,
    })
}

/// Salaries and year counts are never negative.
fn parse_number(line: u64, field: &'static str, value: &str) -> Result<i64, IngestError> {
    match value.trim().parse::<i64>() {
        Ok(number) if number >= 0 => Ok(number),
        _ => Err(IngestError::InvalidNumber {
            line,
            field,
            value: value.to_string(),
        }),
    }
}

fn parse_category<T>(line: u64, field: &'static str, value: &str) -> Result<T, IngestError>
where
    T: FromStr,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|_| IngestError::UnknownCategory {
            line,
            field,
            value: value.to_string(),
        })
}
