//! Name-table: file magic, format version, and the `(name, unit)` pairs
//! that give every energy term its column name and physical unit.

use crate::consts::{DEFAULT_UNIT, ENX_VERSION, FILE_MAGIC};
use crate::error::EdrError;
use crate::reader::XdrReader;

/// A single energy term's column name and physical unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermName {
    pub name: String,
    pub unit: String,
}

/// Decoded name-table: resolved file version plus one [`TermName`] per
/// energy term, in on-disk order.
#[derive(Debug, Clone)]
pub struct NameTable {
    pub file_version: i32,
    pub terms: Vec<TermName>,
    /// `true` if the file opened with a positive legacy `nre`
    /// instead of the `-55555` magic (i.e. a version 1 file).
    pub legacy_open: bool,
}

/// Reads the name-table at the start of the buffer.
///
/// Returns the table together with an advisory warning message when the
/// file's version doesn't match [`ENX_VERSION`]; callers decide whether to
/// print it, log it, or ignore it.
pub(crate) fn read_names(r: &mut XdrReader) -> Result<(NameTable, Option<String>), EdrError> {
    let magic = r.read_i32()?;

    let (file_version, nre, legacy_open) = if magic > 0 {
        (1, magic, true)
    } else {
        if magic != FILE_MAGIC {
            return Err(EdrError::BadFileMagic);
        }
        let file_version = r.read_i32()?;
        if file_version > ENX_VERSION {
            return Err(EdrError::UnsupportedVersion { found: file_version });
        }
        let nre = r.read_i32()?;
        (file_version, nre, false)
    };

    let warning = if file_version != ENX_VERSION {
        Some(format!(
            "Note: enx file_version {file_version}, implementation version {ENX_VERSION}"
        ))
    } else {
        None
    };

    let mut terms = Vec::with_capacity(nre.max(0) as usize);
    for _ in 0..nre {
        let name = r.read_string()?;
        let unit = if file_version >= 2 {
            r.read_string()?
        } else {
            DEFAULT_UNIT.to_owned()
        };
        terms.push(TermName { name, unit });
    }

    Ok((
        NameTable {
            file_version,
            terms,
            legacy_open,
        },
        warning,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_string(buf: &mut Vec<u8>, s: &str) {
        buf.extend_from_slice(&(s.len() as u32).to_be_bytes());
        buf.extend_from_slice(s.as_bytes());
        let pad = (4 - s.len() % 4) % 4;
        buf.extend(std::iter::repeat(0u8).take(pad));
    }

    fn modern_name_table(version: i32, terms: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&FILE_MAGIC.to_be_bytes());
        buf.extend_from_slice(&version.to_be_bytes());
        buf.extend_from_slice(&(terms.len() as i32).to_be_bytes());
        for (name, unit) in terms {
            write_string(&mut buf, name);
            if version >= 2 {
                write_string(&mut buf, unit);
            }
        }
        buf
    }

    #[test]
    fn reads_version_5_terms_and_units() {
        let buf = modern_name_table(5, &[("DUMMY1", "UNIT1"), ("DUMMY2", "UNIT2")]);
        let mut r = XdrReader::new(&buf);
        let (table, warning) = read_names(&mut r).unwrap();
        assert_eq!(table.file_version, 5);
        assert!(!table.legacy_open);
        assert!(warning.is_none());
        assert_eq!(
            table.terms,
            vec![
                TermName { name: "DUMMY1".into(), unit: "UNIT1".into() },
                TermName { name: "DUMMY2".into(), unit: "UNIT2".into() },
            ]
        );
    }

    #[test]
    fn warns_on_version_mismatch() {
        let buf = modern_name_table(4, &[("E1", "kJ/mol")]);
        let mut r = XdrReader::new(&buf);
        let (_, warning) = read_names(&mut r).unwrap();
        assert_eq!(
            warning.unwrap(),
            "Note: enx file_version 4, implementation version 5"
        );
    }

    #[test]
    fn version_1_defaults_unit_and_sets_legacy_open() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&2i32.to_be_bytes()); // positive magic == nre
        write_string(&mut buf, "Etot");
        write_string(&mut buf, "Epot");

        let mut r = XdrReader::new(&buf);
        let (table, warning) = read_names(&mut r).unwrap();
        assert_eq!(table.file_version, 1);
        assert!(table.legacy_open);
        assert!(warning.is_some());
        assert_eq!(table.terms[0].unit, DEFAULT_UNIT);
    }

    #[test]
    fn rejects_bad_magic() {
        // Negative, but not the -55555 file magic: must not be mistaken
        // for a legacy positive nre either.
        let mut buf = Vec::new();
        buf.extend_from_slice(&(-1_234_5678i32).to_be_bytes());
        let mut r = XdrReader::new(&buf);
        match read_names(&mut r) {
            Err(EdrError::BadFileMagic) => {}
            other => panic!("expected BadFileMagic, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&FILE_MAGIC.to_be_bytes());
        buf.extend_from_slice(&1_000_000_000i32.to_be_bytes());
        let mut r = XdrReader::new(&buf);
        match read_names(&mut r) {
            Err(EdrError::UnsupportedVersion { found: 1_000_000_000 }) => {}
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }
}
