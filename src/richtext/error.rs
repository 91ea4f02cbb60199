// Editing Errors
// Precondition violations raised by commands, transforms and dispatch

use thiserror::Error;

use super::surface::SurfaceId;

/// Result of an editing operation
pub type EditResult<T = ()> = Result<T, EditError>;

/// Errors that can occur while editing a surface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("node index {index} is out of bounds (surface has {len} nodes)")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("offset {offset} is out of bounds for node {index} (length {len})")]
    OffsetOutOfBounds {
        index: usize,
        offset: usize,
        len: usize,
    },
    #[error("node {index} is not a text node")]
    NotTextNode { index: usize },
    #[error("unknown surface {0}")]
    UnknownSurface(SurfaceId),
    #[error("no visual container for node {index} of surface {surface}")]
    MissingContainer { surface: SurfaceId, index: usize },
    #[error("cannot reconcile input: {0}")]
    UnreconcilableInput(String),
    #[error("surface {0} is already nested; editable regions nest at most two levels")]
    NestingTooDeep(SurfaceId),
    #[error("command was inverted or reapplied out of order")]
    StaleCommand,
    #[error("cannot build node: {0}")]
    NodeConstruction(String),
}
