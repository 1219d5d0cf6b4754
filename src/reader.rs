//! Byte-level cursor over an in-memory XDR buffer.

use std::io::{Cursor, Seek, SeekFrom};

use binrw::BinReaderExt;

use crate::error::EdrError;

/// A cursor over an immutable, fully buffered XDR byte stream.
///
/// Everything needed to decode an `.edr` file is read into memory once;
/// `XdrReader` never touches the filesystem itself, it only tracks a
/// position into the buffer it was handed.
pub(crate) struct XdrReader<'a> {
    cursor: Cursor<&'a [u8]>,
    /// Selects 64- vs 32-bit floats for [`XdrReader::read_real`].
    pub(crate) double_mode: bool,
}

impl<'a> XdrReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(buf),
            double_mode: false,
        }
    }

    /// Current absolute byte offset.
    pub(crate) fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Seek to an absolute byte offset.
    pub(crate) fn seek(&mut self, offset: u64) -> Result<(), EdrError> {
        self.cursor.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    fn len(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    fn require(&self, n_bytes: u64) -> Result<(), EdrError> {
        if self.position() + n_bytes > self.len() {
            return Err(EdrError::Eof);
        }
        Ok(())
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32, EdrError> {
        self.require(4)?;
        Ok(self.cursor.read_be::<i32>()?)
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64, EdrError> {
        self.require(8)?;
        Ok(self.cursor.read_be::<i64>()?)
    }

    pub(crate) fn read_f32(&mut self) -> Result<f32, EdrError> {
        self.require(4)?;
        Ok(self.cursor.read_be::<f32>()?)
    }

    pub(crate) fn read_f64(&mut self) -> Result<f64, EdrError> {
        self.require(8)?;
        Ok(self.cursor.read_be::<f64>()?)
    }

    /// Read a native real: f64 if `double_mode`, else f32 widened to f64.
    pub(crate) fn read_real(&mut self) -> Result<f64, EdrError> {
        if self.double_mode {
            self.read_f64()
        } else {
            Ok(self.read_f32()? as f64)
        }
    }

    /// Read an XDR opaque string: u32 length, then that many bytes,
    /// padded to a 4-byte boundary.
    pub(crate) fn read_string(&mut self) -> Result<String, EdrError> {
        let len = self.read_i32()? as u32 as usize;
        self.require(len as u64)?;
        let start = self.position() as usize;
        let buf = *self.cursor.get_ref();
        let bytes = &buf[start..start + len];
        let s = bytes.iter().map(|b| *b as char).collect();
        let pad = (4 - len % 4) % 4;
        self.cursor.seek(SeekFrom::Current((len + pad) as i64))?;
        Ok(s)
    }

    /// Skip `n` bytes without decoding them.
    pub(crate) fn skip(&mut self, n: i64) -> Result<(), EdrError> {
        if n >= 0 {
            self.require(n as u64)?;
        }
        self.cursor.seek(SeekFrom::Current(n))?;
        Ok(())
    }

}
