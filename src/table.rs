//! Positional CSV decoding of the TimeZoneDB tables.
//!
//! Neither table has a header row. Columns are addressed by the index
//! constants below and each record is checked for the exact width
//! before it is turned into a typed row.
//!
//! Quoting is strict: a `"` inside an unquoted field, or text after the
//! closing quote of a quoted field, is a parse error. The `csv` reader on
//! its own would keep such quotes as literal text.

use csv::{ReaderBuilder, StringRecord};

use crate::error::{Error, Result};
use crate::model::{Country, Zone};

/// Columns of `country.csv`
pub mod country_column {
    pub const CODE: usize = 0;
    pub const NAME: usize = 1;
    pub const WIDTH: usize = 2;
}

/// Columns of `zone.csv`
///
/// The leading zone id is not used, but it still counts toward the row
/// width, so a row missing it is rejected instead of shifting columns.
pub mod zone_column {
    pub const ID: usize = 0;
    pub const CODE: usize = 1;
    pub const NAME: usize = 2;
    pub const WIDTH: usize = 3;
}

/// One decoded row of `country.csv`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRow {
    pub code: String,
    pub name: String,
}

/// One decoded row of `zone.csv`, minus the unused id column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRow {
    pub code: String,
    pub name: String,
}

impl From<CountryRow> for Country {
    fn from(row: CountryRow) -> Self {
        Country::new(row.code, row.name)
    }
}

impl From<ZoneRow> for Zone {
    fn from(row: ZoneRow) -> Self {
        Zone::new(row.code, row.name)
    }
}

/// Parse `country.csv` into countries with no zones, in file order.
pub fn parse_countries(table: &'static str, input: &[u8]) -> Result<Vec<Country>> {
    read_rows(table, input, country_column::WIDTH, |record| CountryRow {
        code: record[country_column::CODE].to_string(),
        name: record[country_column::NAME].to_string(),
    })
    .map(|rows| rows.into_iter().map(Country::from).collect())
}

/// Parse `zone.csv` into candidate zones, in file order.
pub fn parse_zones(table: &'static str, input: &[u8]) -> Result<Vec<Zone>> {
    read_rows(table, input, zone_column::WIDTH, |record| ZoneRow {
        code: record[zone_column::CODE].to_string(),
        name: record[zone_column::NAME].to_string(),
    })
    .map(|rows| rows.into_iter().map(Zone::from).collect())
}

fn read_rows<T, F>(table: &'static str, input: &[u8], width: usize, decode: F) -> Result<Vec<T>>
where
    F: Fn(&StringRecord) -> T,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        // Width is checked per row below so the error can name the table
        .flexible(true)
        .from_reader(input);

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(|e| csv_error(table, e))?;
        if !more {
            break;
        }

        let line = record.position().map_or(0, |p| p.line());
        let start = record.position().map_or(0, |p| p.byte() as usize);
        let end = (reader.position().byte() as usize).min(input.len());
        if let Some(column) = misplaced_quote(&input[start.min(end)..end]) {
            return Err(Error::Parse {
                table,
                line,
                column: Some(column),
                message: "bare \" in field or extraneous text after quoted field".to_string(),
            });
        }

        if record.len() != width {
            return Err(Error::Parse {
                table,
                line,
                column: Some(record.len().min(width)),
                message: format!("expected {width} columns, found {}", record.len()),
            });
        }
        rows.push(decode(&record));
    }

    Ok(rows)
}

/// Find the first field of a raw record whose quoting is malformed.
///
/// Only opening quotes at the start of a field, doubled quotes inside a
/// quoted field, and a closing quote followed by a delimiter or line end
/// are allowed.
fn misplaced_quote(raw: &[u8]) -> Option<usize> {
    let mut column = 0;
    let mut field_start = true;
    let mut quoted = false;
    let mut i = 0;

    while i < raw.len() {
        let b = raw[i];
        if quoted {
            if b == b'"' {
                if raw.get(i + 1) == Some(&b'"') {
                    i += 2;
                    continue;
                }
                quoted = false;
                if !matches!(raw.get(i + 1), None | Some(b',' | b'\r' | b'\n')) {
                    return Some(column);
                }
            }
        } else {
            match b {
                b',' => {
                    column += 1;
                    field_start = true;
                    i += 1;
                    continue;
                }
                b'"' if field_start => quoted = true,
                b'"' => return Some(column),
                _ => {}
            }
        }
        field_start = false;
        i += 1;
    }

    None
}

fn csv_error(table: &'static str, err: csv::Error) -> Error {
    let line = err.position().map_or(0, |p| p.line());
    let column = match err.kind() {
        csv::ErrorKind::Utf8 { err, .. } => Some(err.field()),
        _ => None,
    };
    Error::Parse {
        table,
        line,
        column,
        message: err.to_string(),
    }
}
