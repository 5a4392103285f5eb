use std::{collections::BTreeMap, io, sync::Mutex};

use crate::prelude::*;

#[doc = r#"
Receives the serialized project of each track.

Sinks are shared between the workers of a parallel split, so `write` may be
called from several threads at once, in any track order.

Any `Fn(TrackNumber, Vec<u8>) -> io::Result<()>` closure is a sink.
"#]
pub trait ProjectSink: Sync {
    /// Persist the project filtered down to `track`.
    fn write(&self, track: TrackNumber, bytes: Vec<u8>) -> io::Result<()>;
}

impl<F> ProjectSink for F
where
    F: Fn(TrackNumber, Vec<u8>) -> io::Result<()> + Sync,
{
    fn write(&self, track: TrackNumber, bytes: Vec<u8>) -> io::Result<()> {
        self(track, bytes)
    }
}

/// A sink keeping every output in memory, keyed by track.
#[derive(Debug, Default)]
pub struct MemorySink {
    outputs: Mutex<BTreeMap<TrackNumber, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the collected outputs, in ascending track order.
    pub fn into_outputs(self) -> BTreeMap<TrackNumber, Vec<u8>> {
        self.outputs
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProjectSink for MemorySink {
    fn write(&self, track: TrackNumber, bytes: Vec<u8>) -> io::Result<()> {
        let mut outputs = self
            .outputs
            .lock()
            .map_err(|_| io::Error::other("memory sink poisoned"))?;
        outputs.insert(track, bytes);
        Ok(())
    }
}
