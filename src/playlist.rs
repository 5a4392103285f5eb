#![doc = r#"
Playlist items

The payload of a [`KnownEvent::PlaylistItems`](crate::prelude::KnownEvent::PlaylistItems)
event is a packed array of 32-byte records, one per clip placed on the
playlist:

```text
offset  size  field
0       4     start time
4       2     pattern base
6       2     pattern id
8       4     length
12      4     track (stored inverted, see TrackNumber)
16      2     reserved
18      2     reserved
20      4     reserved
24      4     reserved
28      4     reserved
```

There is no count or padding; a payload that is not a multiple of 32 bytes
is rejected.
"#]

use core::fmt;

use byteorder::{ByteOrder, LittleEndian};

use crate::reader::{ReadResult, Reader, ReaderError, ReaderErrorKind};

/// Track numbers are stored as `TRACK_BASE - track`.
pub const TRACK_BASE: i64 = 500;

#[doc = r#"
The playlist track a user sees in the interface.

Records store the track inverted; the visible number is `500 - raw`.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackNumber(i64);

impl TrackNumber {
    /// Create a track number as shown to the user
    pub const fn new(number: i64) -> Self {
        Self(number)
    }
    /// The track number of a raw, stored, value
    pub const fn from_raw(raw: u32) -> Self {
        Self(TRACK_BASE - raw as i64)
    }
    /// The number shown to the user
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TrackNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// One clip on the playlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaylistItem {
    pub start_time: u32,
    pub pattern_base: u16,
    pub pattern_id: u16,
    pub length: u32,
    /// Raw, inverted, track value. See [`PlaylistItem::track_number`].
    pub track: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    pub reserved3: u32,
    pub reserved4: u32,
    pub reserved5: u32,
}

impl PlaylistItem {
    /// Size of one record on disk
    pub const SIZE: usize = 32;

    /// The track this item sits on
    pub const fn track_number(&self) -> TrackNumber {
        TrackNumber::from_raw(self.track)
    }

    fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        Ok(Self {
            start_time: reader.read_u32()?,
            pattern_base: reader.read_u16()?,
            pattern_id: reader.read_u16()?,
            length: reader.read_u32()?,
            track: reader.read_u32()?,
            reserved1: reader.read_u16()?,
            reserved2: reader.read_u16()?,
            reserved3: reader.read_u32()?,
            reserved4: reader.read_u32()?,
            reserved5: reader.read_u32()?,
        })
    }

    /// Appends the 32-byte record to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        let mut buf = [0; Self::SIZE];
        LittleEndian::write_u32(&mut buf[0..4], self.start_time);
        LittleEndian::write_u16(&mut buf[4..6], self.pattern_base);
        LittleEndian::write_u16(&mut buf[6..8], self.pattern_id);
        LittleEndian::write_u32(&mut buf[8..12], self.length);
        LittleEndian::write_u32(&mut buf[12..16], self.track);
        LittleEndian::write_u16(&mut buf[16..18], self.reserved1);
        LittleEndian::write_u16(&mut buf[18..20], self.reserved2);
        LittleEndian::write_u32(&mut buf[20..24], self.reserved3);
        LittleEndian::write_u32(&mut buf[24..28], self.reserved4);
        LittleEndian::write_u32(&mut buf[28..32], self.reserved5);
        out.extend_from_slice(&buf);
    }
}

/// The decoded payload of a playlist items event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistItems {
    items: Vec<PlaylistItem>,
}

impl PlaylistItems {
    pub fn new(items: Vec<PlaylistItem>) -> Self {
        Self { items }
    }

    /// Decodes a packed record array.
    ///
    /// # Errors
    /// [`ReaderErrorKind::MalformedRecordArray`] if `buffer` is not a whole
    /// number of records.
    pub fn decode(buffer: &[u8]) -> ReadResult<Self> {
        if buffer.len() % PlaylistItem::SIZE != 0 {
            return Err(ReaderError::new(
                buffer.len() - buffer.len() % PlaylistItem::SIZE,
                ReaderErrorKind::MalformedRecordArray { len: buffer.len() },
            ));
        }

        let mut reader = Reader::from_byte_slice(buffer);
        let mut items = Vec::with_capacity(buffer.len() / PlaylistItem::SIZE);
        while !reader.is_empty() {
            items.push(PlaylistItem::read(&mut reader)?);
        }
        Ok(Self { items })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.items.len() * PlaylistItem::SIZE);
        for item in &self.items {
            item.write(&mut out);
        }
        out
    }

    /// Drops every item that is not on `track`, keeping the order of the rest.
    pub fn retain_track(&mut self, track: TrackNumber) {
        self.items.retain(|item| item.track_number() == track);
    }

    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, PlaylistItem> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(start_time: u32, track: u32) -> PlaylistItem {
        PlaylistItem {
            start_time,
            pattern_base: 20480,
            pattern_id: 3,
            length: 384,
            track,
            reserved1: 120,
            reserved2: 64,
            reserved3: 0xFFFF_FFFF,
            reserved4: 0xFFFF_FFFF,
            reserved5: 0,
        }
    }

    #[test]
    fn track_number_is_inverted() {
        assert_eq!(TrackNumber::from_raw(499).get(), 1);
        assert_eq!(TrackNumber::from_raw(10).get(), 490);
        assert_eq!(TrackNumber::from_raw(501).get(), -1);
        assert_eq!(TrackNumber::new(7).to_string(), "007");
    }

    #[test]
    fn layout() {
        let mut bytes = Vec::new();
        item(0x0102_0304, 499).write(&mut bytes);
        assert_eq!(bytes.len(), PlaylistItem::SIZE);
        assert_eq!(&bytes[0..4], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[12..16], &[0xF3, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn decode_keeps_order() {
        let items = PlaylistItems::new(vec![item(0, 10), item(96, 20), item(192, 10)]);
        let bytes = items.to_bytes();
        assert_eq!(bytes.len(), 96);

        let decoded = PlaylistItems::decode(&bytes).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn partial_record_is_rejected() {
        let err = PlaylistItems::decode(&[0; 40]).unwrap_err();
        assert_eq!(
            err.error_kind(),
            &ReaderErrorKind::MalformedRecordArray { len: 40 }
        );
        assert_eq!(err.position(), 32);
    }

    #[test]
    fn retain_track_filters() {
        let mut items = PlaylistItems::new(vec![item(0, 10), item(96, 20), item(192, 10)]);
        items.retain_track(TrackNumber::new(490));
        assert_eq!(items.items(), &[item(0, 10), item(192, 10)]);

        items.retain_track(TrackNumber::new(1));
        assert!(items.is_empty());
        assert!(items.to_bytes().is_empty());
    }
}
