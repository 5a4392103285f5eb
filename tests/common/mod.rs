#![allow(dead_code)]

use flpsplit::prelude::*;

/// Builds raw project bytes by hand, independently of the crate's writer.
#[derive(Default)]
pub struct RawProject {
    bytes: Vec<u8>,
}

impl RawProject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk(mut self, tag: &[u8; 4], payload: &[u8]) -> Self {
        self.bytes.extend_from_slice(tag);
        self.bytes
            .extend_from_slice(&(payload.len() as u32).to_le_bytes());
        self.bytes.extend_from_slice(payload);
        self
    }

    pub fn header(self, format_kind: u16, channels: u16, time_base: u16) -> Self {
        let mut payload = Vec::new();
        payload.extend_from_slice(&format_kind.to_le_bytes());
        payload.extend_from_slice(&channels.to_le_bytes());
        payload.extend_from_slice(&time_base.to_le_bytes());
        self.chunk(b"FLhd", &payload)
    }

    pub fn data(self, events: &RawEvents) -> Self {
        self.chunk(b"FLdt", &events.bytes)
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Raw event stream bytes.
#[derive(Default)]
pub struct RawEvents {
    pub bytes: Vec<u8>,
}

impl RawEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn byte(mut self, id: u8, v: u8) -> Self {
        self.bytes.extend_from_slice(&[id, v]);
        self
    }

    pub fn word(mut self, id: u8, v: u16) -> Self {
        self.bytes.push(id);
        self.bytes.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn dword(mut self, id: u8, v: u32) -> Self {
        self.bytes.push(id);
        self.bytes.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn data(mut self, id: u8, payload: &[u8]) -> Self {
        self.bytes.push(id);
        let mut n = payload.len();
        loop {
            let group = (n & 0x7F) as u8;
            n >>= 7;
            if n == 0 {
                self.bytes.push(group);
                break;
            }
            self.bytes.push(group | 0x80);
        }
        self.bytes.extend_from_slice(payload);
        self
    }

    pub fn text(self, id: u8, text: &str) -> Self {
        let mut payload = text.as_bytes().to_vec();
        payload.push(0);
        self.data(id, &payload)
    }

    pub fn playlist(self, raw_tracks: &[u32]) -> Self {
        let items: Vec<_> = raw_tracks
            .iter()
            .enumerate()
            .map(|(i, &track)| item(i as u32 * 96, track))
            .collect();
        self.data(233, &raw_items(&items))
    }
}

pub fn item(start_time: u32, track: u32) -> PlaylistItem {
    PlaylistItem {
        start_time,
        pattern_base: 20480,
        pattern_id: 1,
        length: 96,
        track,
        reserved1: 120,
        reserved2: 64,
        reserved3: 0xFFFF_FFFF,
        reserved4: 0xFFFF_FFFF,
        reserved5: 0,
    }
}

/// Packs records field by field.
pub fn raw_items(items: &[PlaylistItem]) -> Vec<u8> {
    let mut out = Vec::new();
    for i in items {
        out.extend_from_slice(&i.start_time.to_le_bytes());
        out.extend_from_slice(&i.pattern_base.to_le_bytes());
        out.extend_from_slice(&i.pattern_id.to_le_bytes());
        out.extend_from_slice(&i.length.to_le_bytes());
        out.extend_from_slice(&i.track.to_le_bytes());
        out.extend_from_slice(&i.reserved1.to_le_bytes());
        out.extend_from_slice(&i.reserved2.to_le_bytes());
        out.extend_from_slice(&i.reserved3.to_le_bytes());
        out.extend_from_slice(&i.reserved4.to_le_bytes());
        out.extend_from_slice(&i.reserved5.to_le_bytes());
    }
    out
}

/// A small but realistic project: header, a data chunk with some settings,
/// a name, a playlist on raw tracks 10, 20, 10, and an unknown trailing chunk.
pub fn sample_project() -> Vec<u8> {
    let events = RawEvents::new()
        .byte(0x0B, 1)
        .word(0x42, 140)
        .dword(0x9C, 140_000)
        .text(0xC7, "20.8.4.2576")
        .data(0xD4, &[0xAB; 200])
        .playlist(&[10, 20, 10])
        .byte(0x1D, 0);

    RawProject::new()
        .header(0, 16, 96)
        .data(&events)
        .chunk(b"XTRA", &[9, 8, 7, 6, 5])
        .build()
}

pub fn playlist_items(project: &Project) -> Vec<PlaylistItems> {
    project
        .event_streams()
        .flat_map(|(_, events)| events.iter())
        .filter(|e| e.known() == Some(KnownEvent::PlaylistItems))
        .map(|e| PlaylistItems::decode(e.data().unwrap()).unwrap())
        .collect()
}
