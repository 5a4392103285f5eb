use crate::{
    prelude::*,
    reader::{Location, ReadResult, Reader, ReaderError, ReaderErrorKind},
};

#[doc = r#"
The events making up one data chunk, in file order.

A stream must be filled exactly by its events: an event whose value would
run past the end of the chunk makes the whole stream malformed.
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStream {
    events: Vec<Event>,
}

impl EventStream {
    /// Create a stream from a list of events
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Decodes every event in `buffer`.
    ///
    /// # Errors
    /// [`ReaderErrorKind::MalformedStream`] if the last event overruns the
    /// buffer. The error's location carries the index of that event.
    pub fn decode(buffer: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(buffer);
        let mut events = Vec::new();

        while !reader.is_empty() {
            let start = reader.buffer_position();
            match Event::read(&mut reader) {
                Ok(event) => events.push(event),
                Err(e) if e.is_truncated() => {
                    return Err(ReaderError::new(start, ReaderErrorKind::MalformedStream).at(
                        Location {
                            chunk: None,
                            event: Some(events.len()),
                        },
                    ));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Self { events })
    }

    /// Serialized length of the stream
    pub fn encoded_len(&self) -> usize {
        self.events.iter().map(Event::encoded_len).sum()
    }

    /// Appends every event, in order.
    pub fn write(&self, out: &mut Vec<u8>) {
        for event in &self.events {
            event.write(out);
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write(&mut out);
        out
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut [Event] {
        &mut self.events
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<'a> IntoIterator for &'a EventStream {
    type Item = &'a Event;
    type IntoIter = core::slice::Iter<'a, Event>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl FromIterator<Event> for EventStream {
    fn from_iter<T: IntoIterator<Item = Event>>(iter: T) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decode_exact_fill() {
        let bytes = [0x01, 0x05, 0x42, 0x34, 0x12, 0xC7, 0x01, 0xFF];
        let stream = EventStream::decode(&bytes).unwrap();
        assert_eq!(stream.len(), 3);
        assert_eq!(stream.encoded_len(), bytes.len());
        assert_eq!(stream.to_bytes(), bytes);
    }

    #[test]
    fn empty_stream() {
        let stream = EventStream::decode(&[]).unwrap();
        assert!(stream.is_empty());
        assert!(stream.to_bytes().is_empty());
    }

    #[test]
    fn overrun_is_malformed() {
        // second event claims 4 bytes, only 2 remain
        let err = EventStream::decode(&[0x01, 0x05, 0xC7, 0x04, 0xAA, 0xBB]).unwrap_err();
        assert_eq!(err.error_kind(), &ReaderErrorKind::MalformedStream);
        assert_eq!(err.location().event, Some(1));
        assert_eq!(err.position(), 2);

        // a lone id byte
        let err = EventStream::decode(&[0x01, 0x05, 0x85]).unwrap_err();
        assert_eq!(err.error_kind(), &ReaderErrorKind::MalformedStream);
    }
}
