//! Errors raised while decoding an EDR energy file.

use std::fmt;

use crate::consts::ENX_VERSION;

/// Errors that can occur while decoding an `.edr` file.
#[derive(Debug)]
pub enum EdrError {
    /// IO error, raised while loading the file into memory.
    IoError(std::io::Error),
    /// Name-table magic number is neither a positive legacy `nre`
    /// nor the modern sentinel `-55555`.
    BadFileMagic,
    /// A modern frame header did not start with the frame magic `-7777777`.
    BadFrameMagic,
    /// File or frame declares a format version newer than `ENX_VERSION`.
    UnsupportedVersion { found: i32 },
    /// A non-legacy file produced a `first_real` above the legacy sentinel.
    UnexpectedFirstReal { first_real: f64 },
    /// `ndisre != 0` in a version >= 4 file.
    OldStyleInNewFile,
    /// A v1 frame reported an implausible time or a negative step.
    BadLegacyHeader,
    /// Sanity predicate failed for a decoded frame
    /// (negative step, or no energies and no populated blocks).
    CorruptFrame,
    /// Sub-block type code outside `0..=5`.
    UnknownBlockType { type_code: i32 },
    /// Genuine end-of-buffer. Normal when encountered before the first
    /// numeric read of a frame header; fatal truncation otherwise.
    Eof,
    /// Header read failed partway through, after at least one frame
    /// was already decoded successfully.
    HeaderRead {
        last_frame: usize,
        last_time: f64,
        source: Box<EdrError>,
    },
}

impl std::error::Error for EdrError {}

impl fmt::Display for EdrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdrError::IoError(err) => write!(f, "IO error: {err}"),
            EdrError::BadFileMagic => {
                write!(f, "Energy names magic number mismatch, this is not a GROMACS edr file")
            }
            EdrError::BadFrameMagic => {
                write!(f, "Energy header magic number mismatch, this is not a GROMACS edr file")
            }
            EdrError::UnsupportedVersion { found } => write!(
                f,
                "Reading file version {found} with version {ENX_VERSION} implementation"
            ),
            EdrError::UnexpectedFirstReal { first_real } => write!(
                f,
                "Unexpected first real {first_real} in non-legacy energy header"
            ),
            EdrError::OldStyleInNewFile => {
                write!(f, "Distance restraint blocks in old style in new style file")
            }
            EdrError::BadLegacyHeader => write!(
                f,
                "edr file with negative step number or unreasonable time (and without version number)"
            ),
            EdrError::CorruptFrame => write!(f, "Something went wrong"),
            EdrError::UnknownBlockType { type_code } => write!(
                f,
                "Reading unknown block data type: this file is corrupted or from the future ({type_code})"
            ),
            EdrError::Eof => write!(f, "Unexpected end of data"),
            EdrError::HeaderRead { last_frame, last_time, source } => write!(
                f,
                "Failed reading header. Last energy frame read {last_frame} time {last_time:.3}: {source}"
            ),
        }
    }
}

impl From<std::io::Error> for EdrError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => EdrError::Eof,
            _ => EdrError::IoError(err),
        }
    }
}

impl From<binrw::Error> for EdrError {
    fn from(err: binrw::Error) -> Self {
        match err {
            binrw::Error::Io(io_err) => EdrError::from(io_err),
            other => EdrError::IoError(std::io::Error::other(other)),
        }
    }
}

impl From<EdrError> for std::io::Error {
    fn from(err: EdrError) -> Self {
        std::io::Error::other(err)
    }
}
