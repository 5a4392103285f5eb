#![doc = r#"
Variable-length quantities

Event payload lengths are stored as unsigned integers split into 7-bit groups,
least significant group first. Every byte except the last has its high bit
(`0x80`) set:

```text
0          -> 00
127        -> 7F
128        -> 80 01
200        -> C8 01
16_383     -> FF 7F
16_384     -> 80 80 01
```

Note that this is the reverse group order of the quantities used in standard
MIDI files.
"#]

use crate::reader::{ReadResult, ReaderError, ReaderErrorKind};

const CONTINUE: u8 = 0x80;
const GROUP: u8 = 0x7F;

/// The longest encoding a `u64` can have.
pub const MAX_LEN: usize = 10;

/// Decodes a quantity starting at `offset` in `buffer`.
///
/// Returns the value and the number of bytes consumed.
///
/// # Errors
/// [`ReaderErrorKind::TruncatedInput`] if the buffer ends before a byte with a
/// clear high bit is found. Groups past the 64th bit are discarded.
pub fn decode(buffer: &[u8], offset: usize) -> ReadResult<(u64, usize)> {
    let bytes = buffer.get(offset..).unwrap_or_default();
    let mut value = 0u64;
    let mut shift = 0u32;

    for (i, &byte) in bytes.iter().enumerate() {
        if shift < u64::BITS {
            value |= u64::from(byte & GROUP) << shift;
        }
        shift += 7;
        if byte & CONTINUE == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(ReaderError::new(
        offset,
        ReaderErrorKind::truncated(bytes.len() + 1, bytes.len()),
    ))
}

/// Number of bytes [`encode`] emits for `value`.
pub const fn encoded_len(value: u64) -> usize {
    let mut n = value >> 7;
    let mut len = 1;
    while n != 0 {
        n >>= 7;
        len += 1;
    }
    len
}

/// Appends the minimal encoding of `value` to `out`.
pub fn write(value: u64, out: &mut Vec<u8>) {
    let mut n = value;
    loop {
        let group = (n & GROUP as u64) as u8;
        n >>= 7;
        if n == 0 {
            out.push(group);
            return;
        }
        out.push(group | CONTINUE);
    }
}

/// Encodes `value` with the fewest 7-bit groups.
pub fn encode(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(value));
    write(value, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_encodings() {
        assert_eq!(encode(0), [0x00]);
        assert_eq!(encode(127), [0x7F]);
        assert_eq!(encode(128), [0x80, 0x01]);
        assert_eq!(encode(200), [0xC8, 0x01]);
        assert_eq!(encode(16_383), [0xFF, 0x7F]);
        assert_eq!(encode(16_384), [0x80, 0x80, 0x01]);
        assert_eq!(encode(u64::MAX).len(), MAX_LEN);
    }

    #[test]
    fn decode_at_offset() {
        let buf = [0xAA, 0xC8, 0x01, 0xBB];
        assert_eq!(decode(&buf, 1).unwrap(), (200, 2));
    }

    #[test]
    fn decode_truncated() {
        let err = decode(&[0x80, 0x80], 0).unwrap_err();
        assert!(err.is_truncated());

        let err = decode(&[0x01], 1).unwrap_err();
        assert!(err.is_truncated());
        assert_eq!(err.position(), 1);
    }
}
