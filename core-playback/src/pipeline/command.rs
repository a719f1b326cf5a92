//! Messages processed by the pipeline's home task.
//!
//! Public entry points and collaborator notifications alike are turned into a
//! [`Command`] and queued, so state is only ever touched by one task.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::demuxer::{Demuxer, StreamReadResult};
use bridge_traits::media::StreamType;
use bridge_traits::player::{DecoderState, PlayerState, SampleId, Ticket};
use bridge_traits::status::{PipelineError, PipelineStatus};
use core_async::sync::{mpsc, oneshot};
use tracing::trace;

use super::callbacks::{SeekCallback, StartCallbacks, StopCallback};

/// Data-source progress reported through `DemuxerHost`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum HostEvent {
    TotalBytes(u64),
    BufferedByteRange { start: u64, end: u64 },
    BufferedTimeRange { start: Duration, end: Duration },
    Duration(Duration),
    Error(PipelineError),
}

pub(crate) enum Command {
    // Caller requests
    Start {
        demuxer: Arc<dyn Demuxer>,
        callbacks: StartCallbacks,
    },
    Seek {
        time: Duration,
        callback: SeekCallback,
    },
    Stop {
        callback: StopCallback,
    },
    SetPlaybackRate(f32),
    SetVolume(f32),
    Barrier(oneshot::Sender<()>),

    // Demuxer completions
    DemuxerInitialized(PipelineStatus),
    DemuxerSeeked {
        ticket: Ticket,
        status: PipelineStatus,
    },
    DemuxerStopped,
    StreamRead {
        stream: StreamType,
        ticket: Ticket,
        result: StreamReadResult,
    },
    Host(HostEvent),

    // Player notifications
    DecoderStatus {
        stream: StreamType,
        state: DecoderState,
        ticket: Ticket,
    },
    PlayerStatus {
        state: PlayerState,
        ticket: Ticket,
    },
    DeallocateSample(SampleId),
}

impl Command {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Command::Start { .. } => "start",
            Command::Seek { .. } => "seek",
            Command::Stop { .. } => "stop",
            Command::SetPlaybackRate(_) => "set_playback_rate",
            Command::SetVolume(_) => "set_volume",
            Command::Barrier(_) => "barrier",
            Command::DemuxerInitialized(_) => "demuxer_initialized",
            Command::DemuxerSeeked { .. } => "demuxer_seeked",
            Command::DemuxerStopped => "demuxer_stopped",
            Command::StreamRead { .. } => "stream_read",
            Command::Host(_) => "host",
            Command::DecoderStatus { .. } => "decoder_status",
            Command::PlayerStatus { .. } => "player_status",
            Command::DeallocateSample(_) => "deallocate_sample",
        }
    }

    /// Resolves the callbacks a command carries when it can no longer be
    /// handled.
    pub(crate) fn reject(self) {
        match self {
            Command::Start { callbacks, .. } => (callbacks.error)(Err(PipelineError::InvalidState)),
            Command::Seek { callback, .. } => callback(Err(PipelineError::InvalidState)),
            Command::Stop { callback } => callback(),
            _ => {}
        }
    }
}

/// Queues `command` from a collaborator; dropped once the pipeline is gone.
pub(crate) fn post(commands: &mpsc::WeakUnboundedSender<Command>, command: Command) {
    let Some(sender) = commands.upgrade() else {
        trace!(command = command.name(), "Pipeline gone; dropping notification");
        return;
    };
    if let Err(mpsc::error::SendError(command)) = sender.send(command) {
        trace!(command = command.name(), "Pipeline gone; dropping notification");
    }
}
