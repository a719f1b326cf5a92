//! Completion status taxonomy shared by the pipeline and its collaborators.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of failures an asynchronous pipeline operation can report.
///
/// Collaborators return these from demuxer operations, and the pipeline hands
/// them to the caller's completion callbacks.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineError {
    /// The demuxer could not parse the container or find a usable stream.
    #[error("demuxer initialization failed")]
    DemuxerInitError,

    /// The operation is not valid in the pipeline's current state
    /// (e.g. `seek` before `start` has created the player).
    #[error("operation not valid in the current pipeline state")]
    InvalidState,

    /// The platform player failed to decode, or a stream's configuration
    /// cannot be expressed in the player's format.
    #[error("decode error")]
    DecodeError,

    /// Propagated from the demuxer's data source.
    #[error("network error")]
    NetworkError,

    /// A stream read was aborted, typically by a concurrent seek or stop.
    #[error("operation aborted")]
    Aborted,
}

/// Outcome of an asynchronous pipeline operation.
pub type PipelineStatus = Result<(), PipelineError>;

/// Buffering milestones reported through the buffering-state callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferingState {
    /// Stream metadata is known; the player is about to be created.
    HaveMetadata,
    /// Enough data is decoded after a seek to start presenting.
    PrerollCompleted,
}
