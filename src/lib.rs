#![warn(missing_debug_implementations)]
#![doc = r#"
Split FL Studio projects by playlist track

An FL Studio project (`.flp`) is a chunked container: a header chunk, a data
chunk holding the project as a stream of typed events, and possibly chunks this
crate knows nothing about. One of those events lists every clip placed on the
playlist, along with the playlist track it sits on.

This crate reads a project losslessly, finds the tracks its playlist uses and
writes one copy of the project per track, each keeping only that track's
clips. Everything else, unknown chunks included, is written back exactly as it
was read.

# Layout
- [`vlq`]: variable-length quantities used for event lengths
- [`event`]: single events and the event stream of a data chunk
- [`playlist`]: the packed playlist item records
- [`project`]: chunks and the container as a whole
- [`split`]: track discovery and per-track filtering
- [`io`]: reading inputs and writing outputs to disk
"#]

pub mod event;
pub mod io;
pub mod playlist;
pub mod project;
pub mod reader;
pub mod split;
pub mod vlq;

/// Commonly used types
pub mod prelude {
    pub use crate::{
        event::*,
        playlist::*,
        project::*,
        reader::{Location, ReadResult, ReaderError, ReaderErrorKind},
        split::*,
    };
}
