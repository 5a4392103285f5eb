use thiserror::Error;

use super::ChunkTag;

/// Errors that can occur while serializing a project.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// A payload grew beyond what a chunk's 32-bit length field can describe.
    #[error("{tag} chunk payload of {len} bytes does not fit a 32-bit length")]
    ChunkTooLarge {
        /// The chunk's tag
        tag: ChunkTag,
        /// Payload length in bytes
        len: usize,
    },
}
