//! Drives frame-header and frame-payload reads to end of stream.

use crate::context::FileContext;
use crate::error::EdrError;
use crate::frame::{read_frame_header, read_frame_payload, Frame};
use crate::reader::XdrReader;

/// Yields successfully decoded [`Frame`]s until the header read signals
/// a clean end of stream; after that it yields nothing further.
///
/// Holds the byte buffer's reader and file context for the lifetime of
/// the decode; `last_frame`/`last_time` are tracked so a mid-header
/// failure can be wrapped with the position of the last good frame.
pub(crate) struct FrameIter<'a> {
    reader: XdrReader<'a>,
    context: FileContext,
    last_frame: usize,
    last_time: f64,
    done: bool,
}

impl<'a> FrameIter<'a> {
    pub(crate) fn new(reader: XdrReader<'a>, context: FileContext) -> Self {
        Self { reader, context, last_frame: 0, last_time: 0.0, done: false }
    }
}

impl Iterator for FrameIter<'_> {
    type Item = Result<Frame, EdrError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let header = match read_frame_header(&mut self.reader, &mut self.context) {
            Ok(Some(header)) => header,
            Ok(None) => {
                self.done = true;
                return None;
            }
            Err(source) => {
                self.done = true;
                return Some(Err(EdrError::HeaderRead {
                    last_frame: self.last_frame,
                    last_time: self.last_time,
                    source: Box::new(source),
                }));
            }
        };

        match read_frame_payload(&mut self.reader, &mut self.context, header) {
            Ok(frame) => {
                self.last_frame += 1;
                self.last_time = frame.t;
                Some(Ok(frame))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
