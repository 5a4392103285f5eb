#![doc = r#"
Splitting a project into one project per playlist track

Splitting runs in two phases over a parsed [`Project`]:

1. **Discovery** walks every playlist items event once and collects the
   distinct [`TrackNumber`]s its records sit on. A project containing a
   [`KnownEvent::LegacyPlaylist`] event is refused here, before anything is
   written.
2. **Filtering** produces, for each discovered track, a deep copy of the
   project whose playlist events only keep that track's records. Nothing else
   in the copy is touched; a playlist event left without records stays in
   place with an empty payload.

The base project is only ever borrowed, so tracks can be filtered in
parallel.

```no_run
use flpsplit::prelude::*;

let bytes = std::fs::read("song.flp")?;
let project = Project::parse(&bytes)?;
let sink = MemorySink::new();
let report = Splitter::new(&project, SplitOptions::default()).run(&sink)?;
println!("wrote {} tracks", report.outputs.len());
# Ok::<(), Box<dyn std::error::Error>>(())
```
"#]

mod error;
pub use error::*;

mod sink;
pub use sink::*;

use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::{
    prelude::*,
    reader::{Location, ReadResult, ReaderError, ReaderErrorKind},
};

/// Settings for a [`Splitter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitOptions {
    /// Filter and write tracks on the rayon thread pool.
    pub parallel: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// A project filtered down to one track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredProject {
    pub track: TrackNumber,
    pub project: Project,
    /// Playlist items kept across all playlist events
    pub retained: usize,
}

/// What was handed to the sink for one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackOutput {
    pub track: TrackNumber,
    /// Size of the serialized project
    pub len: usize,
    /// Playlist items kept
    pub retained: usize,
}

/// Outcome of [`Splitter::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// One entry per track, in ascending track order
    pub outputs: Vec<TrackOutput>,
}

/// Collects the distinct tracks used by the project's playlist, ascending.
///
/// # Errors
/// - [`ReaderErrorKind::UnsupportedFormat`] if any event is a
///   [`KnownEvent::LegacyPlaylist`].
/// - [`ReaderErrorKind::MalformedRecordArray`] if a playlist payload is not
///   a whole number of records.
pub fn discover_tracks(project: &Project) -> ReadResult<Vec<TrackNumber>> {
    let mut tracks = BTreeSet::new();

    for (chunk, events) in project.event_streams() {
        debug!(chunk, events = events.len(), "reading events");
        for (event_index, event) in events.iter().enumerate() {
            let location = Location::event(chunk, event_index);
            match event.known() {
                Some(KnownEvent::LegacyPlaylist) => {
                    return Err(ReaderError::new(
                        0,
                        ReaderErrorKind::UnsupportedFormat { event: event.id() },
                    )
                    .at(location));
                }
                Some(KnownEvent::PlaylistItems) => {
                    debug!(chunk, event = event_index, "parsing playlist event");
                    let items = decode_playlist(event, location)?;
                    tracks.extend(items.iter().map(PlaylistItem::track_number));
                }
                None => {}
            }
        }
    }

    info!("found {} distinct playlist tracks", tracks.len());
    Ok(tracks.into_iter().collect())
}

fn decode_playlist(event: &Event, location: Location) -> ReadResult<PlaylistItems> {
    PlaylistItems::decode(event.data().unwrap_or_default()).map_err(|e| e.at(location))
}

/// Deep-copies `project` and drops every playlist item not on `track`.
///
/// The base project is left untouched.
pub fn filter_track(project: &Project, track: TrackNumber) -> ReadResult<FilteredProject> {
    let mut filtered = project.clone();
    let mut retained = 0;

    debug!(%track, "making project");
    for (chunk, c) in filtered.chunks_mut().iter_mut().enumerate() {
        let tag = c.tag();
        let Some(events) = c.events_mut() else {
            continue;
        };
        let before = events.encoded_len();
        let mut touched = false;

        for (event_index, event) in events.events_mut().iter_mut().enumerate() {
            if event.known() != Some(KnownEvent::PlaylistItems) {
                continue;
            }
            let mut items = decode_playlist(event, Location::event(chunk, event_index))?;
            let old_len = event.data().map_or(0, <[u8]>::len);

            items.retain_track(track);
            for item in items.iter() {
                trace!(chunk, event = event_index, start = item.start_time, %track, "keeping playlist item");
            }
            retained += items.len();

            let bytes = items.to_bytes();
            let new_len = bytes.len();
            event.replace_data(bytes);
            touched = true;
            debug!(chunk, event = event_index, old_len, new_len, "fixed up playlist event length");
        }

        if touched {
            debug!(chunk, %tag, old_len = before, new_len = events.encoded_len(), "fixed up chunk length");
        }
    }

    Ok(FilteredProject {
        track,
        project: filtered,
        retained,
    })
}

/// Drives discovery and per-track filtering of one project.
#[derive(Debug, Clone, Copy)]
pub struct Splitter<'a> {
    project: &'a Project,
    options: SplitOptions,
}

impl<'a> Splitter<'a> {
    pub fn new(project: &'a Project, options: SplitOptions) -> Self {
        Self { project, options }
    }

    /// See [`discover_tracks`]
    pub fn discover(&self) -> ReadResult<Vec<TrackNumber>> {
        discover_tracks(self.project)
    }

    /// Filters the project once per discovered track and hands each result to `sink`.
    ///
    /// Discovery completes before any output is produced, so a refused or
    /// malformed playlist never reaches the sink. Once filtering starts, the
    /// first error stops the run; outputs already written stay written.
    pub fn run<S: ProjectSink>(&self, sink: &S) -> Result<SplitReport, SplitError> {
        let tracks = self.discover()?;

        let split_one = |&track: &TrackNumber| -> Result<TrackOutput, SplitError> {
            let filtered = filter_track(self.project, track)?;
            let bytes = filtered.project.to_bytes()?;
            let output = TrackOutput {
                track,
                len: bytes.len(),
                retained: filtered.retained,
            };
            sink.write(track, bytes)
                .map_err(|source| SplitError::Sink { track, source })?;
            info!(%track, bytes = output.len, items = output.retained, "wrote track");
            Ok(output)
        };

        let outputs = if self.options.parallel {
            tracks.par_iter().map(split_one).collect::<Result<Vec<_>, _>>()?
        } else {
            tracks.iter().map(split_one).collect::<Result<Vec<_>, _>>()?
        };

        Ok(SplitReport { outputs })
    }
}
