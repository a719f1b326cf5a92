//! # Playback Error Types
//!
//! Reasons the pipeline rejects work internally. None of these reach the
//! caller's callbacks directly: rejections are logged and dropped, defects are
//! logged and asserted in debug builds. Caller-visible failures use
//! [`PipelineError`](bridge_traits::status::PipelineError).

use bridge_traits::player::{SampleId, Ticket};
use thiserror::Error;

use crate::state::PipelineState;

/// Errors that can occur inside the playback pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    // ========================================================================
    // Rejections
    // ========================================================================
    /// A notification belongs to a superseded epoch.
    #[error("Stale ticket: expected {expected}, received {received}")]
    StaleTicket { expected: Ticket, received: Ticket },

    /// The operation is not valid in the pipeline's current state.
    #[error("Cannot {operation} while {state}")]
    InvalidState {
        state: PipelineState,
        operation: &'static str,
    },

    /// The platform player is not created yet or already destroyed.
    #[error("Platform player unavailable")]
    PlayerUnavailable,

    /// A stream's decoder configuration cannot be expressed for the player.
    #[error("Unsupported decoder configuration: {0}")]
    UnsupportedConfig(String),

    // ========================================================================
    // Retention defects
    // ========================================================================
    /// A sample payload was submitted while an earlier submission of the same
    /// payload is still held by the player.
    #[error("Sample {0} is already retained")]
    DuplicateSample(SampleId),

    /// The player released a sample the pipeline never submitted.
    #[error("Sample {0} is not retained")]
    UnknownSample(SampleId),

    // ========================================================================
    // Setup
    // ========================================================================
    /// `Pipeline::new` was called outside a Tokio runtime.
    #[error("No async runtime available: {0}")]
    NoRuntime(String),
}

impl PlaybackError {
    /// Returns `true` for broken invariants, as opposed to expected rejections.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            PlaybackError::DuplicateSample(_) | PlaybackError::UnknownSample(_)
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
