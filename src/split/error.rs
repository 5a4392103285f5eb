use thiserror::Error;

use crate::{prelude::*, reader::ReaderError};

/// Errors that can stop a split.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The input could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The project could not be decoded or is of an unsupported variant
    #[error(transparent)]
    Read(#[from] ReaderError),
    /// A filtered project could not be serialized
    #[error(transparent)]
    Write(#[from] WriteError),
    /// The sink refused the output for a track
    #[error("writing output for track {track}: {source}")]
    Sink {
        track: TrackNumber,
        #[source]
        source: std::io::Error,
    },
}

impl SplitError {
    /// True if the project was refused for being too old.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Read(e) if e.is_unsupported())
    }
}
