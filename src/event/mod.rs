#![doc = r#"
Project events

The data chunk of a project is a flat list of events. Each event starts with a
one byte id whose top two bits select how its value is stored:

```text
 id bits   value
 00xxxxxx  1 byte
 01xxxxxx  2 bytes, little-endian
 10xxxxxx  4 bytes, little-endian
 11xxxxxx  variable-length quantity N, then N raw bytes
```

The low six bits tell events of the same width apart. Apart from the few ids
in [`KnownEvent`], this crate does not interpret them.
"#]

mod stream;
pub use stream::*;

use core::fmt;

use byteorder::{ByteOrder, LittleEndian};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
    vlq,
};

const WIDTH_SHIFT: u8 = 6;
const KIND_MASK: u8 = 0x3F;

/// The full one byte id of an event, width bits included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventId(pub u8);

impl EventId {
    /// The value encoding selected by the top two bits.
    pub const fn width(self) -> EventWidth {
        match self.0 >> WIDTH_SHIFT {
            0 => EventWidth::Byte,
            1 => EventWidth::Word,
            2 => EventWidth::Dword,
            _ => EventWidth::Data,
        }
    }

    /// The low six bits.
    pub const fn kind(self) -> u8 {
        self.0 & KIND_MASK
    }

    /// Returns the id if it is one this crate gives meaning to.
    pub fn known(self) -> Option<KnownEvent> {
        KnownEvent::try_from(self.0).ok()
    }
}

impl From<u8> for EventId {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<KnownEvent> for EventId {
    fn from(value: KnownEvent) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}

/// How an event's value is stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventWidth {
    /// One byte
    Byte,
    /// Two bytes
    Word,
    /// Four bytes
    Dword,
    /// A length prefixed blob
    Data,
}

impl EventWidth {
    const fn bits(self) -> u8 {
        (match self {
            Self::Byte => 0,
            Self::Word => 1,
            Self::Dword => 2,
            Self::Data => 3,
        }) << WIDTH_SHIFT
    }
}

/// Event ids with a meaning to the splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum KnownEvent {
    /// Playlist layout of projects saved by older versions.
    ///
    /// Projects containing it are refused.
    LegacyPlaylist = 129,
    /// The playlist: a packed array of [`PlaylistItem`](crate::prelude::PlaylistItem)s.
    PlaylistItems = 233,
}

/// The value carried by an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValue {
    Byte(u8),
    Word(u16),
    Dword(u32),
    Data(Vec<u8>),
}

impl EventValue {
    /// The width the value is stored with
    pub const fn width(&self) -> EventWidth {
        match self {
            Self::Byte(_) => EventWidth::Byte,
            Self::Word(_) => EventWidth::Word,
            Self::Dword(_) => EventWidth::Dword,
            Self::Data(_) => EventWidth::Data,
        }
    }
}

#[doc = r#"
A single project event.

Only the low six bits of the id are stored; the width bits are always derived
from the value, so an event can never be written with an id that disagrees
with its payload.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: u8,
    value: EventValue,
}

impl Event {
    /// Create an event. The width bits of `id` are replaced by those of `value`.
    pub fn new(id: EventId, value: EventValue) -> Self {
        Self {
            kind: id.kind(),
            value,
        }
    }

    /// The event's id, as written to disk.
    pub const fn id(&self) -> EventId {
        EventId(self.value.width().bits() | self.kind)
    }

    /// See [`EventId::known`]
    pub fn known(&self) -> Option<KnownEvent> {
        self.id().known()
    }

    pub fn value(&self) -> &EventValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut EventValue {
        &mut self.value
    }

    /// The payload of a variable-length event
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            EventValue::Data(data) => Some(data),
            _ => None,
        }
    }

    /// Swaps out the payload of a variable-length event, returning the old one.
    ///
    /// Returns `None` and leaves the event untouched if it is not a
    /// variable-length event.
    pub fn replace_data(&mut self, data: Vec<u8>) -> Option<Vec<u8>> {
        match &mut self.value {
            EventValue::Data(old) => Some(core::mem::replace(old, data)),
            _ => None,
        }
    }

    /// Decodes one event from the front of `buffer`.
    ///
    /// Returns the event and the number of bytes it occupied.
    pub fn decode(buffer: &[u8]) -> ReadResult<(Self, usize)> {
        let mut reader = Reader::from_byte_slice(buffer);
        let event = Self::read(&mut reader)?;
        Ok((event, reader.buffer_position()))
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let id = EventId(reader.read_u8()?);
        let value = match id.width() {
            EventWidth::Byte => EventValue::Byte(reader.read_u8()?),
            EventWidth::Word => EventValue::Word(reader.read_u16()?),
            EventWidth::Dword => EventValue::Dword(reader.read_u32()?),
            EventWidth::Data => {
                let pos = reader.buffer_position();
                let len = reader.read_vlq()?;
                let len = usize::try_from(len).map_err(|_| {
                    ReaderError::new(pos, ReaderErrorKind::truncated(usize::MAX, reader.remaining()))
                })?;
                EventValue::Data(reader.read_exact(len)?.to_vec())
            }
        };
        Ok(Self {
            kind: id.kind(),
            value,
        })
    }

    /// Bytes this event occupies once written.
    pub fn encoded_len(&self) -> usize {
        1 + match &self.value {
            EventValue::Byte(_) => 1,
            EventValue::Word(_) => 2,
            EventValue::Dword(_) => 4,
            EventValue::Data(data) => vlq::encoded_len(data.len() as u64) + data.len(),
        }
    }

    /// Appends the event to `out`.
    ///
    /// The length prefix of a variable-length event is always taken from the
    /// current payload.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.push(self.id().0);
        match &self.value {
            EventValue::Byte(v) => out.push(*v),
            EventValue::Word(v) => {
                let mut buf = [0; 2];
                LittleEndian::write_u16(&mut buf, *v);
                out.extend_from_slice(&buf);
            }
            EventValue::Dword(v) => {
                let mut buf = [0; 4];
                LittleEndian::write_u32(&mut buf, *v);
                out.extend_from_slice(&buf);
            }
            EventValue::Data(data) => {
                vlq::write(data.len() as u64, out);
                out.extend_from_slice(data);
            }
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write(&mut out);
        out
    }
}
