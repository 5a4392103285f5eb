use core::fmt;
use thiserror::Error;

use crate::prelude::{ChunkTag, EventId};

#[doc = r#"
Where in the container a read error occurred.

Chunk and event indices are zero-based and counted in file order. Either may
be absent when the failure happened outside of a chunk or event.
"#]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    /// Index of the chunk being decoded
    pub chunk: Option<usize>,
    /// Index of the event inside the chunk's event stream
    pub event: Option<usize>,
}

impl Location {
    /// Location pointing at a chunk
    pub const fn chunk(chunk: usize) -> Self {
        Self {
            chunk: Some(chunk),
            event: None,
        }
    }
    /// Location pointing at an event of a chunk
    pub const fn event(chunk: usize, event: usize) -> Self {
        Self {
            chunk: Some(chunk),
            event: Some(event),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.chunk, self.event) {
            (Some(c), Some(e)) => write!(f, "chunk 0x{c:02x}, event 0x{e:08x}"),
            (Some(c), None) => write!(f, "chunk 0x{c:02x}"),
            (None, Some(e)) => write!(f, "event 0x{e:08x}"),
            (None, None) => f.write_str("top level"),
        }
    }
}

#[doc = r#"
A set of errors that can occur while reading a project into its rusty representation
"#]
#[derive(Debug, Error)]
#[error("Reading at position {position} ({location}), {kind}")]
pub struct ReaderError {
    position: usize,
    location: Location,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReaderErrorKind {
    /// A fixed or variable width field claims more bytes than remain.
    #[error("truncated input: needed {needed} bytes, {remaining} remain")]
    TruncatedInput {
        /// Bytes the field required
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },
    /// An event would overrun the payload of its chunk.
    #[error("malformed event stream")]
    MalformedStream,
    /// A chunk length overruns the remaining container.
    #[error("malformed container: {0}")]
    MalformedContainer(ContainerFault),
    /// A playlist payload is not a whole number of records.
    #[error("malformed playlist record array of {len} bytes")]
    MalformedRecordArray {
        /// Length of the offending payload
        len: usize,
    },
    /// The project carries an event from an older, unsupported layout.
    #[error("unsupported format: event {event} indicates a project that is too old")]
    UnsupportedFormat {
        /// The offending event id
        event: EventId,
    },
}

/// Why a container failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerFault {
    /// The 8-byte chunk header itself is cut short
    ShortChunkHeader,
    /// The declared length runs past the end of the buffer
    LengthOverrun {
        /// The chunk's tag
        tag: ChunkTag,
        /// Declared payload length
        declared: u32,
        /// Bytes left after the chunk header
        remaining: usize,
    },
    /// A header chunk whose payload is not exactly 6 bytes
    HeaderLength(u32),
}

impl fmt::Display for ContainerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortChunkHeader => f.write_str("chunk header is cut short"),
            Self::LengthOverrun {
                tag,
                declared,
                remaining,
            } => write!(
                f,
                "{tag} chunk declares {declared} bytes but only {remaining} remain"
            ),
            Self::HeaderLength(len) => write!(f, "header chunk has length {len}, expected 6"),
        }
    }
}

impl ReaderErrorKind {
    pub(crate) const fn truncated(needed: usize, remaining: usize) -> Self {
        Self::TruncatedInput { needed, remaining }
    }
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self {
            position,
            location: Location {
                chunk: None,
                event: None,
            },
            kind,
        }
    }

    /// Attaches a location to the error.
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Fills in the chunk index if not already known.
    pub(crate) fn in_chunk(mut self, chunk: usize) -> Self {
        if self.location.chunk.is_none() {
            self.location.chunk = Some(chunk);
        }
        self
    }

    /// Moves the position by `base`, for errors raised on a sub-slice.
    pub(crate) fn offset_by(mut self, base: usize) -> Self {
        self.position += base;
        self
    }

    /// True if a field ran past the end of its buffer
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::TruncatedInput { .. })
    }
    /// True if the project uses an unsupported, older layout
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::UnsupportedFormat { .. })
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }
    /// Returns the chunk/event the error occurred in.
    pub fn location(&self) -> Location {
        self.location
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
