//! Flat-file adapters for the address, distance and parcel tables.
//!
//! Each table is comma separated with optional double-quoted fields. Rows that
//! do not fit the expected shape are logged and skipped; they never fail a
//! load.

use std::path::Path;

use tracing::warn;

use crate::address::{AddressBook, AddressEntry};
use crate::distance::DistanceTable;
use crate::error::LoadError;
use crate::parcel::{Parcel, ParcelId};
use crate::store::ParcelStore;

/// Row counts from one table load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

impl LoadReport {
    fn skip(&mut self, table: &str, line: usize, reason: &str, row: &str) {
        warn!(table, line, reason, row, "skipping row");
        self.skipped += 1;
    }
}

/// Split one record into trimmed fields, honoring `"quoted, fields"` and `""` escapes.
pub fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

fn records(text: &str) -> impl Iterator<Item = (usize, &str, Vec<String>)> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, line, split_record(line)))
}

/// Parse address rows `(id, address, [name], ...)`.
pub fn parse_addresses(text: &str) -> (AddressBook, LoadReport) {
    let mut book = AddressBook::default();
    let mut report = LoadReport::default();

    for (line, raw, fields) in records(text) {
        if fields.len() < 2 {
            report.skip("addresses", line, "expected at least 2 fields", raw);
            continue;
        }
        let Ok(id) = fields[0].parse::<u32>() else {
            report.skip("addresses", line, "unparsable id", raw);
            continue;
        };
        let address = fields[1].clone();
        if address.is_empty() {
            report.skip("addresses", line, "empty address", raw);
            continue;
        }
        let name = fields
            .get(2)
            .filter(|name| !name.is_empty())
            .cloned()
            .unwrap_or_else(|| address.clone());
        book.push(AddressEntry { id, name, address });
        report.loaded += 1;
    }

    (book, report)
}

/// Parse distance rows `(from, to, distance)`.
pub fn parse_distances(text: &str) -> (DistanceTable, LoadReport) {
    let mut table = DistanceTable::new();
    let mut report = LoadReport::default();

    for (line, raw, fields) in records(text) {
        if fields.len() != 3 {
            report.skip("distances", line, "expected 3 fields", raw);
            continue;
        }
        match fields[2].parse::<f64>() {
            Ok(distance) if distance.is_finite() && distance >= 0.0 => {
                table.insert(fields[0].clone(), fields[1].clone(), distance);
                report.loaded += 1;
            }
            _ => report.skip("distances", line, "unparsable distance", raw),
        }
    }

    (table, report)
}

/// Parse a weight such as `"88 Kilos"` or `"2"`.
pub fn parse_weight(text: &str) -> Option<f64> {
    let value: String = text
        .replace("Kilos", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    value.parse::<f64>().ok().filter(|w| w.is_finite() && *w >= 0.0)
}

/// Parse parcel rows `(id, address, city, state, zip, deadline, weight, ...)`
/// into `store`. Every parcel starts at the hub.
pub fn parse_parcels(text: &str, store: &mut ParcelStore) -> LoadReport {
    let mut report = LoadReport::default();

    for (line, raw, fields) in records(text) {
        if fields.len() < 7 {
            report.skip("parcels", line, "expected at least 7 fields", raw);
            continue;
        }
        let Ok(id) = fields[0].parse::<ParcelId>() else {
            report.skip("parcels", line, "unparsable id", raw);
            continue;
        };
        let Some(weight) = parse_weight(&fields[6]) else {
            report.skip("parcels", line, "unparsable weight", raw);
            continue;
        };
        store.insert(
            id,
            Parcel::new(
                id,
                fields[1].clone(),
                fields[2].clone(),
                fields[3].clone(),
                fields[4].clone(),
                fields[5].clone(),
                weight,
            ),
        );
        report.loaded += 1;
    }

    report
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_addresses(path: impl AsRef<Path>) -> Result<(AddressBook, LoadReport), LoadError> {
    Ok(parse_addresses(&read(path.as_ref())?))
}

pub fn read_distances(path: impl AsRef<Path>) -> Result<(DistanceTable, LoadReport), LoadError> {
    Ok(parse_distances(&read(path.as_ref())?))
}

pub fn read_parcels(path: impl AsRef<Path>, store: &mut ParcelStore) -> Result<LoadReport, LoadError> {
    Ok(parse_parcels(&read(path.as_ref())?, store))
}
