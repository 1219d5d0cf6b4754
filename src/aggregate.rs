//! Column-major aggregation of decoded frames, and the top-level
//! `decode`/`read_units` entry points.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::consts::TIME_UNIT;
use crate::context::FileContext;
use crate::error::EdrError;
use crate::iterator::FrameIter;
use crate::names::read_names;
use crate::reader::XdrReader;

/// Column-major decode result: one row per retained frame, one column
/// per energy term plus a leading `Time` column.
#[derive(Debug, Clone)]
pub struct EnergyTable {
    pub column_names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub times: Vec<f64>,
    pub units: HashMap<String, String>,
    pub warnings: Vec<String>,
}

fn open_reader(buf: &[u8]) -> Result<(XdrReader, FileContext, Option<String>), EdrError> {
    let mut reader = XdrReader::new(buf);
    let (names, warning) = read_names(&mut reader)?;
    let context = FileContext::new(names);
    Ok((reader, context, warning))
}

/// Decodes an `.edr` file into a column-major [`EnergyTable`].
///
/// Frames with `nre == 0` are skipped, matching the reference
/// behavior of dropping header-only records with nothing to report.
pub fn decode(path: impl AsRef<Path>) -> Result<EnergyTable, EdrError> {
    let buf = fs::read(path)?;
    let (reader, context, warning) = open_reader(&buf)?;

    let column_names: Vec<String> = std::iter::once("Time".to_owned())
        .chain(context.names.terms.iter().map(|t| t.name.clone()))
        .collect();
    let mut units: HashMap<String, String> = HashMap::new();
    units.insert("Time".to_owned(), TIME_UNIT.to_owned());
    for term in &context.names.terms {
        units.insert(term.name.clone(), term.unit.clone());
    }

    let mut rows = Vec::new();
    let mut times = Vec::new();
    let mut warnings: Vec<String> = warning.into_iter().collect();

    for frame in FrameIter::new(reader, context) {
        let frame = frame?;
        if frame.nre == 0 {
            continue;
        }
        let mut row = Vec::with_capacity(1 + frame.ener.len());
        row.push(frame.t);
        row.extend(frame.ener.iter().map(|e| e.e));
        times.push(frame.t);
        rows.push(row);
    }

    if !warnings.is_empty() {
        for warning in &warnings {
            eprintln!("{warning}");
        }
    }

    Ok(EnergyTable { column_names, rows, times, units, warnings })
}

/// Reads only the name table and returns the unit mapping, without
/// iterating any frames.
pub fn read_units(path: impl AsRef<Path>) -> Result<HashMap<String, String>, EdrError> {
    let buf = fs::read(path)?;
    let mut reader = XdrReader::new(&buf);
    let (names, warning) = read_names(&mut reader)?;

    if let Some(warning) = &warning {
        eprintln!("{warning}");
    }

    let mut units = HashMap::new();
    units.insert("Time".to_owned(), TIME_UNIT.to_owned());
    for term in names.terms {
        units.insert(term.name, term.unit);
    }
    Ok(units)
}
