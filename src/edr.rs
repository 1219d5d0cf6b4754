//! Top-level handle over one `.edr` file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::aggregate::{decode, read_units, EnergyTable};
use crate::context::FileContext;
use crate::error::EdrError;
use crate::frame::Frame;
use crate::iterator::FrameIter;
use crate::names::read_names;

/// A loaded `.edr` file, ready to be iterated frame-by-frame or
/// materialized into an [`EnergyTable`].
///
/// The whole file is read into memory by [`Edr::open`]; nothing further
/// touches the filesystem. Callers who only need the unit dictionary
/// should prefer the free function [`crate::read_units`], which never
/// loads more than the name table.
pub struct Edr {
    buf: Vec<u8>,
    column_names: Vec<String>,
    units: HashMap<String, String>,
    warning: Option<String>,
}

impl Edr {
    /// Opens `path`, loading the whole file and decoding its name table.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EdrError> {
        let buf = fs::read(path)?;
        let mut reader = crate::reader::XdrReader::new(&buf);
        let (names, warning) = read_names(&mut reader)?;

        if let Some(warning) = &warning {
            eprintln!("{warning}");
        }

        let column_names: Vec<String> = std::iter::once("Time".to_owned())
            .chain(names.terms.iter().map(|t| t.name.clone()))
            .collect();
        let mut units = HashMap::new();
        units.insert("Time".to_owned(), crate::consts::TIME_UNIT.to_owned());
        for term in &names.terms {
            units.insert(term.name.clone(), term.unit.clone());
        }

        drop(reader);
        Ok(Self { buf, column_names, units, warning })
    }

    /// Column names in on-disk order, with `"Time"` first.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Physical-unit mapping, keyed by column name.
    pub fn units(&self) -> &HashMap<String, String> {
        &self.units
    }

    /// The version-mismatch warning raised while opening, if any.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Streams frames one at a time without materializing a whole
    /// [`EnergyTable`] up front.
    pub fn frames(&self) -> Result<impl Iterator<Item = Result<Frame, EdrError>> + '_, EdrError> {
        let mut reader = crate::reader::XdrReader::new(&self.buf);
        let (names, _warning) = read_names(&mut reader)?;
        let context = FileContext::new(names);
        Ok(FrameIter::new(reader, context))
    }

    /// Decodes every frame into a column-major [`EnergyTable`].
    pub fn decode(path: impl AsRef<Path>) -> Result<EnergyTable, EdrError> {
        decode(path)
    }

    /// Reads only the name table and returns the unit mapping.
    pub fn read_units(path: impl AsRef<Path>) -> Result<HashMap<String, String>, EdrError> {
        read_units(path)
    }
}
