use core::fmt;

use byteorder::{ByteOrder, LittleEndian};

use crate::{
    prelude::*,
    reader::{ContainerFault, ReadResult, Reader, ReaderError, ReaderErrorKind},
};

/// Size of a chunk's tag and length fields.
pub const CHUNK_HEADER_LEN: usize = 8;

/// The four ASCII bytes identifying a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkTag(pub [u8; 4]);

impl ChunkTag {
    /// Project header, see [`ProjectHeader`]
    pub const HEADER: Self = Self(*b"FLhd");
    /// Project data, an [`EventStream`]
    pub const DATA: Self = Self(*b"FLdt");

    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

#[doc = r#"
Global project settings, stored in the `FLhd` chunk.

The chunk is always six bytes long.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectHeader {
    pub format_kind: u16,
    pub channel_count: u16,
    /// Pulses per quarter note
    pub time_base: u16,
}

impl ProjectHeader {
    /// Size of the header chunk's payload
    pub const LEN: usize = 6;

    fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        Ok(Self {
            format_kind: reader.read_u16()?,
            channel_count: reader.read_u16()?,
            time_base: reader.read_u16()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        let mut buf = [0; Self::LEN];
        LittleEndian::write_u16(&mut buf[0..2], self.format_kind);
        LittleEndian::write_u16(&mut buf[2..4], self.channel_count);
        LittleEndian::write_u16(&mut buf[4..6], self.time_base);
        out.extend_from_slice(&buf);
    }
}

/// The parsed body of a chunk, selected by its tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkPayload {
    /// `FLhd`
    Header(ProjectHeader),
    /// `FLdt`
    Events(EventStream),
    /// Any other tag, kept byte for byte
    Opaque(Vec<u8>),
}

impl ChunkPayload {
    /// Decodes a payload of `declared` bytes according to `tag`.
    ///
    /// Positions in returned errors are relative to the start of `bytes`.
    pub fn decode(tag: ChunkTag, declared: u32, bytes: &[u8]) -> ReadResult<Self> {
        match tag {
            ChunkTag::HEADER => {
                if declared as usize != ProjectHeader::LEN {
                    return Err(ReaderError::new(
                        0,
                        ReaderErrorKind::MalformedContainer(ContainerFault::HeaderLength(declared)),
                    ));
                }
                let mut reader = Reader::from_byte_slice(bytes);
                Ok(Self::Header(ProjectHeader::read(&mut reader)?))
            }
            ChunkTag::DATA => Ok(Self::Events(EventStream::decode(bytes)?)),
            _ => Ok(Self::Opaque(Self::read_opaque(declared, bytes)?)),
        }
    }

    fn read_opaque(declared: u32, bytes: &[u8]) -> ReadResult<Vec<u8>> {
        let mut reader = Reader::from_byte_slice(bytes);
        Ok(reader.read_exact(declared as usize)?.to_vec())
    }

    /// Serialized length of the payload
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Header(_) => ProjectHeader::LEN,
            Self::Events(events) => events.encoded_len(),
            Self::Opaque(bytes) => bytes.len(),
        }
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Header(header) => header.write(out),
            Self::Events(events) => events.write(out),
            Self::Opaque(bytes) => out.extend_from_slice(bytes),
        }
    }
}

#[doc = r#"
A tagged, length-prefixed block of a project file.

The length written to disk is never stored: it is computed from the payload
every time the chunk is written, so edits to the payload can not leave a stale
length behind.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    tag: ChunkTag,
    payload: ChunkPayload,
}

impl Chunk {
    /// Create a chunk
    pub fn new(tag: ChunkTag, payload: ChunkPayload) -> Self {
        Self { tag, payload }
    }

    pub fn tag(&self) -> ChunkTag {
        self.tag
    }

    pub fn payload(&self) -> &ChunkPayload {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut ChunkPayload {
        &mut self.payload
    }

    /// The events of an `FLdt` chunk
    pub fn events(&self) -> Option<&EventStream> {
        match &self.payload {
            ChunkPayload::Events(events) => Some(events),
            _ => None,
        }
    }

    pub fn events_mut(&mut self) -> Option<&mut EventStream> {
        match &mut self.payload {
            ChunkPayload::Events(events) => Some(events),
            _ => None,
        }
    }

    /// The length field this chunk will be written with.
    ///
    /// # Errors
    /// [`WriteError::ChunkTooLarge`] if the payload does not fit a `u32`.
    pub fn declared_len(&self) -> Result<u32, WriteError> {
        let len = self.payload.encoded_len();
        u32::try_from(len).map_err(|_| WriteError::ChunkTooLarge { tag: self.tag, len })
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let start = reader.buffer_position();
        if reader.remaining() < CHUNK_HEADER_LEN {
            return Err(ReaderError::new(
                start,
                ReaderErrorKind::MalformedContainer(ContainerFault::ShortChunkHeader),
            ));
        }
        let tag = ChunkTag(reader.read_array()?);
        let declared = reader.read_u32()?;

        let remaining = reader.remaining();
        if declared as usize > remaining {
            return Err(ReaderError::new(
                start,
                ReaderErrorKind::MalformedContainer(ContainerFault::LengthOverrun {
                    tag,
                    declared,
                    remaining,
                }),
            ));
        }

        let payload_start = reader.buffer_position();
        let bytes = reader.read_exact(declared as usize)?;
        let payload = ChunkPayload::decode(tag, declared, bytes)
            .map_err(|e| e.offset_by(payload_start))?;

        Ok(Self { tag, payload })
    }

    /// Appends tag, recomputed length and payload to `out`.
    pub fn write(&self, out: &mut Vec<u8>) -> Result<(), WriteError> {
        let declared = self.declared_len()?;
        let mut len = [0; 4];
        LittleEndian::write_u32(&mut len, declared);

        out.reserve(CHUNK_HEADER_LEN + declared as usize);
        out.extend_from_slice(self.tag.as_bytes());
        out.extend_from_slice(&len);
        self.payload.write(out);
        Ok(())
    }
}
