use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::prelude::*;

/// Extension used when the input file has none.
pub const DEFAULT_EXTENSION: &str = "flp";

/// Reads and parses a project file.
///
/// # Errors
/// - [`SplitError::Io`] if the file cannot be read
/// - [`SplitError::Read`] if it is not a valid project
pub fn read_project<P: AsRef<Path>>(path: P) -> Result<Project, SplitError> {
    let bytes = fs::read(path)?;
    Ok(Project::parse(&bytes)?)
}

/// The name of the output for `track`: `<stem>-<track>.<ext>`, next to `input`
/// unless `dir` is given.
///
/// ```
/// use flpsplit::{io::output_file_name, prelude::TrackNumber};
/// use std::path::Path;
///
/// let name = output_file_name(Path::new("music/song.flp"), None, TrackNumber::new(3));
/// assert_eq!(name, Path::new("music/song-003.flp"));
/// ```
pub fn output_file_name(input: &Path, dir: Option<&Path>, track: TrackNumber) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let ext = input
        .extension()
        .map(|s| s.to_string_lossy())
        .unwrap_or(DEFAULT_EXTENSION.into());
    let name = format!("{stem}-{track}.{ext}");

    match dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Writes each track's project to a file named by [`output_file_name`].
///
/// # Examples
///
/// ```no_run
/// use flpsplit::{io::{read_project, FileSink}, prelude::*};
///
/// let project = read_project("song.flp")?;
/// let sink = FileSink::new("song.flp");
/// Splitter::new(&project, SplitOptions::default()).run(&sink)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileSink {
    input: PathBuf,
    dir: Option<PathBuf>,
}

impl FileSink {
    /// Outputs are placed next to `input`.
    pub fn new<P: AsRef<Path>>(input: P) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            dir: None,
        }
    }

    /// Place outputs in `dir` instead.
    pub fn with_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Where the output for `track` goes.
    pub fn path_for(&self, track: TrackNumber) -> PathBuf {
        output_file_name(&self.input, self.dir.as_deref(), track)
    }
}

impl ProjectSink for FileSink {
    fn write(&self, track: TrackNumber, bytes: Vec<u8>) -> io::Result<()> {
        let path = self.path_for(track);
        tracing::info!(%track, path = %path.display(), "writing project");
        fs::write(path, bytes)
    }
}
