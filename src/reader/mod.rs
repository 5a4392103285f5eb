#![doc = r#"
Byte cursor used by every decoder in this crate.

All multi-byte integers in a project file are little-endian. The reader never
copies: slices handed out borrow from the underlying buffer, and the position
is only advanced once a read has fully succeeded.
"#]

mod error;
pub use error::*;

use byteorder::{ByteOrder, LittleEndian};

use crate::vlq;

/// A forward-only reader over a borrowed byte buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader starting at the first byte of `buf`.
    pub const fn from_byte_slice(buf: &'a [u8]) -> Self {
        Self { buf, position: 0 }
    }

    /// The offset of the next unread byte.
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    /// Number of unread bytes.
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.position
    }

    /// True once every byte has been consumed.
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn truncated(&self, needed: usize) -> ReaderError {
        ReaderError::new(
            self.position,
            ReaderErrorKind::truncated(needed, self.remaining()),
        )
    }

    /// Reads exactly `len` bytes.
    pub fn read_exact(&mut self, len: usize) -> ReadResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.truncated(len));
        }
        let start = self.position;
        self.position += len;
        Ok(&self.buf[start..self.position])
    }

    /// Reads a fixed number of bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut out = [0; N];
        out.copy_from_slice(self.read_exact(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> ReadResult<u8> {
        Ok(self.read_exact(1)?[0])
    }

    pub fn read_u16(&mut self) -> ReadResult<u16> {
        Ok(LittleEndian::read_u16(self.read_exact(2)?))
    }

    pub fn read_u32(&mut self) -> ReadResult<u32> {
        Ok(LittleEndian::read_u32(self.read_exact(4)?))
    }

    /// Reads a variable-length quantity (see [`vlq`]).
    pub fn read_vlq(&mut self) -> ReadResult<u64> {
        let (value, consumed) = vlq::decode(self.buf, self.position)?;
        self.position += consumed;
        Ok(value)
    }
}
