//! Explicit pipeline state machine.
//!
//! ```text
//! Created ─> DemuxerInitializing ─> PlayerCreated ─> Seeking ─> Prerolling ─> Presenting ─> EndOfStream
//!                                                      ^            │              │             │
//!                                                      └────────────┴──────────────┴─────────────┘
//! any ─> Error        any ─> Stopped (terminal)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PlaybackError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineState {
    /// Constructed; no demuxer attached.
    Created,
    /// `start` attached a demuxer which is parsing the container.
    DemuxerInitializing,
    /// The platform player exists and has not reported `Initialized` yet.
    PlayerCreated,
    /// A seek is repositioning the demuxer (or about to reposition the player).
    Seeking,
    /// The player was seeked and is buffering towards presentation.
    Prerolling,
    Presenting,
    /// The player presented the last frame of every stream.
    EndOfStream,
    /// A failure was surfaced; only `stop` remains valid.
    Error,
    /// `stop` was called. Terminal.
    Stopped,
}

impl PipelineState {
    /// Whether a transition from `self` to `next` is part of the machine.
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        use PipelineState::*;

        match (self, next) {
            (Stopped, _) => false,
            (_, Stopped) => true,
            (Error, _) => false,
            (_, Error) => true,
            (Created, DemuxerInitializing)
            | (DemuxerInitializing, PlayerCreated)
            | (PlayerCreated, Seeking)
            | (Seeking, Prerolling)
            | (Prerolling, Presenting)
            | (Prerolling | Presenting, EndOfStream) => true,
            (Prerolling | Presenting | EndOfStream, Seeking) => true,
            _ => false,
        }
    }

    /// Moves to `next`, or explains why the machine cannot.
    pub fn transition(self, next: PipelineState, operation: &'static str) -> Result<PipelineState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(PlaybackError::InvalidState {
                state: self,
                operation,
            })
        }
    }

    /// States in which a caller's seek may begin, provided no other seek is
    /// unresolved.
    pub fn accepts_seek(self) -> bool {
        matches!(
            self,
            PipelineState::Prerolling | PipelineState::Presenting | PipelineState::EndOfStream
        )
    }

    /// States in which the player's demand for data is served.
    pub fn accepts_reads(self) -> bool {
        matches!(self, PipelineState::Prerolling | PipelineState::Presenting)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Stopped)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PipelineState::Created => "Created",
            PipelineState::DemuxerInitializing => "DemuxerInitializing",
            PipelineState::PlayerCreated => "PlayerCreated",
            PipelineState::Seeking => "Seeking",
            PipelineState::Prerolling => "Prerolling",
            PipelineState::Presenting => "Presenting",
            PipelineState::EndOfStream => "EndOfStream",
            PipelineState::Error => "Error",
            PipelineState::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
