#![doc = r#"
Contains types for project file chunks

# Overview

A project file is a plain sequence of chunks, each identified by a 4-character
ASCII tag followed by a 32-bit little-endian length and then that many bytes of
payload. The length never includes the 8 byte tag and length header.

## [`ProjectHeader`]

The header chunk (tagged `FLhd`) holds a few global settings: the project
format kind, the number of channels and the time base. It is always 6 bytes.

## Data chunk

The data chunk (tagged `FLdt`) holds the actual project as an
[`EventStream`](crate::prelude::EventStream). Its events must fill the chunk
exactly.

## Unknown chunks

Any other tag is kept as an opaque payload and written back byte for byte.

# Example Structure

```text
[Header Chunk: "FLhd"]
[Data Chunk: "FLdt"]
[Optional Unknown Chunks]
```
"#]

mod chunk;
pub use chunk::*;

mod error;
pub use error::*;

use crate::{
    prelude::*,
    reader::{ReadResult, Reader},
};

/// A parsed project file: its chunks, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    chunks: Vec<Chunk>,
}

impl Project {
    /// Create a project from a list of chunks
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// Parse a set of bytes into a project.
    ///
    /// Every byte of the buffer must belong to a chunk.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let mut chunks = Vec::new();

        while !reader.is_empty() {
            let index = chunks.len();
            let chunk = Chunk::read(&mut reader).map_err(|e| e.in_chunk(index))?;
            tracing::debug!(chunk = index, tag = %chunk.tag(), "read chunk");
            chunks.push(chunk);
        }

        Ok(Self { chunks })
    }

    /// Serializes every chunk, recomputing all length fields.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WriteError> {
        let mut out = Vec::with_capacity(self.encoded_len());
        for chunk in &self.chunks {
            chunk.write(&mut out)?;
        }
        Ok(out)
    }

    /// Serialized size of the whole project
    pub fn encoded_len(&self) -> usize {
        self.chunks
            .iter()
            .map(|c| CHUNK_HEADER_LEN + c.payload().encoded_len())
            .sum()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunks_mut(&mut self) -> &mut [Chunk] {
        &mut self.chunks
    }

    /// Returns the first header record, if any
    pub fn header(&self) -> Option<&ProjectHeader> {
        self.chunks.iter().find_map(|c| match c.payload() {
            ChunkPayload::Header(h) => Some(h),
            _ => None,
        })
    }

    /// Iterates over the event streams of all data chunks, with their chunk index.
    pub fn event_streams(&self) -> impl Iterator<Item = (usize, &EventStream)> {
        self.chunks
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.events().map(|e| (i, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{ContainerFault, ReaderErrorKind};
    use pretty_assertions::assert_eq;

    fn header_bytes() -> Vec<u8> {
        let mut bytes = b"FLhd".to_vec();
        bytes.extend_from_slice(&6u32.to_le_bytes());
        bytes.extend_from_slice(&[0x00, 0x00, 0x10, 0x00, 0x60, 0x00]);
        bytes
    }

    #[test]
    fn parse_header() {
        let project = Project::parse(&header_bytes()).unwrap();
        assert_eq!(
            project.header(),
            Some(&ProjectHeader {
                format_kind: 0,
                channel_count: 16,
                time_base: 96,
            })
        );
        assert_eq!(project.to_bytes().unwrap(), header_bytes());
    }

    #[test]
    fn empty_file() {
        let project = Project::parse(&[]).unwrap();
        assert!(project.chunks().is_empty());
        assert!(project.to_bytes().unwrap().is_empty());
    }

    #[test]
    fn overrun_reports_chunk() {
        let mut bytes = header_bytes();
        bytes.extend_from_slice(b"FLdt");
        bytes.extend_from_slice(&10u32.to_le_bytes());
        bytes.extend_from_slice(&[0x01, 0x02]);

        let err = Project::parse(&bytes).unwrap_err();
        assert_eq!(err.location().chunk, Some(1));
        assert_eq!(err.position(), 14);
        assert_eq!(
            err.error_kind(),
            &ReaderErrorKind::MalformedContainer(ContainerFault::LengthOverrun {
                tag: ChunkTag::DATA,
                declared: 10,
                remaining: 2,
            })
        );
    }

    #[test]
    fn trailing_garbage() {
        let mut bytes = header_bytes();
        bytes.extend_from_slice(b"FL");
        let err = Project::parse(&bytes).unwrap_err();
        assert_eq!(
            err.error_kind(),
            &ReaderErrorKind::MalformedContainer(ContainerFault::ShortChunkHeader)
        );
    }

    #[test]
    fn bad_header_length() {
        let mut bytes = b"FLhd".to_vec();
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(&[0; 4]);
        let err = Project::parse(&bytes).unwrap_err();
        assert_eq!(
            err.error_kind(),
            &ReaderErrorKind::MalformedContainer(ContainerFault::HeaderLength(4))
        );
    }

    #[test]
    fn stream_error_positions_are_absolute() {
        let mut bytes = header_bytes();
        bytes.extend_from_slice(b"FLdt");
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&[0x01, 0x05, 0x42]);

        let err = Project::parse(&bytes).unwrap_err();
        assert_eq!(err.error_kind(), &ReaderErrorKind::MalformedStream);
        assert_eq!(err.location().chunk, Some(1));
        assert_eq!(err.location().event, Some(1));
        assert_eq!(err.position(), 14 + 8 + 2);
    }
}
