//! src/decryptor/read.rs
//! Raw byte source with stream-offset tracking

use crate::error::HermesError;
use std::io::{ErrorKind, Read};

/// Pull-based raw byte reader that remembers how far into the stream it is.
///
/// End of stream is `Ok(None)`; every other failure of the underlying reader is an
/// [`HermesError::Io`], so an abandoned stream never looks like a clean end.
#[derive(Debug)]
pub struct ByteSource<R> {
    reader: R,
    offset: u64,
}

impl<R: Read> ByteSource<R> {
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self { reader, offset: 0 }
    }

    /// Read one raw byte.
    #[inline]
    pub fn read_byte(&mut self) -> Result<Option<u8>, HermesError> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.offset += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HermesError::Io(e)),
            }
        }
    }

    /// Discard up to `count` raw delimiter bytes. Returns how many were present.
    ///
    /// Delimiters carry no protocol meaning, so running out of stream here is not an error.
    pub fn discard(&mut self, count: usize) -> Result<usize, HermesError> {
        for skipped in 0..count {
            if self.read_byte()?.is_none() {
                return Ok(skipped);
            }
        }
        Ok(count)
    }

    /// Raw bytes consumed so far.
    #[inline(always)]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn tracks_offset_and_end() {
        let mut source = ByteSource::new(Cursor::new(vec![1u8, 2]));
        assert_eq!(source.read_byte().unwrap(), Some(1));
        assert_eq!(source.read_byte().unwrap(), Some(2));
        assert_eq!(source.read_byte().unwrap(), None);
        assert_eq!(source.offset(), 2);
    }

    #[test]
    fn discard_tolerates_short_stream() {
        let mut source = ByteSource::new(Cursor::new(vec![0x12u8]));
        assert_eq!(source.discard(2).unwrap(), 1);
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn reader_failure_is_io_error_not_end() {
        let mut source = ByteSource::new(Broken);
        assert!(matches!(source.read_byte(), Err(HermesError::Io(_))));
    }
}
