//! Collaborator-facing handles.
//!
//! The demuxer and the platform player call these from their own threads.
//! Each call only queues a [`Command`] for the home task. The handles hold a
//! weak sender so a collaborator outliving the pipeline keeps nothing alive.

use std::time::Duration;

use bridge_traits::demuxer::DemuxerHost;
use bridge_traits::media::StreamType;
use bridge_traits::player::{DecoderState, PlayerEventSink, PlayerState, SampleId, Ticket};
use bridge_traits::status::PipelineError;
use core_async::sync::mpsc::WeakUnboundedSender;

use super::command::{post, Command, HostEvent};

pub(crate) struct HostDispatcher {
    commands: WeakUnboundedSender<Command>,
}

impl HostDispatcher {
    pub(crate) fn new(commands: WeakUnboundedSender<Command>) -> Self {
        Self { commands }
    }

    fn post(&self, event: HostEvent) {
        post(&self.commands, Command::Host(event));
    }
}

impl DemuxerHost for HostDispatcher {
    fn set_total_bytes(&self, total_bytes: u64) {
        self.post(HostEvent::TotalBytes(total_bytes));
    }

    fn add_buffered_byte_range(&self, start: u64, end: u64) {
        self.post(HostEvent::BufferedByteRange { start, end });
    }

    fn add_buffered_time_range(&self, start: Duration, end: Duration) {
        self.post(HostEvent::BufferedTimeRange { start, end });
    }

    fn set_duration(&self, duration: Duration) {
        self.post(HostEvent::Duration(duration));
    }

    fn on_demuxer_error(&self, error: PipelineError) {
        self.post(HostEvent::Error(error));
    }
}

pub(crate) struct PlayerEventDispatcher {
    commands: WeakUnboundedSender<Command>,
}

impl PlayerEventDispatcher {
    pub(crate) fn new(commands: WeakUnboundedSender<Command>) -> Self {
        Self { commands }
    }
}

impl PlayerEventSink for PlayerEventDispatcher {
    fn on_decoder_status(&self, stream: StreamType, state: DecoderState, ticket: Ticket) {
        post(
            &self.commands,
            Command::DecoderStatus {
                stream,
                state,
                ticket,
            },
        );
    }

    fn on_player_status(&self, state: PlayerState, ticket: Ticket) {
        post(&self.commands, Command::PlayerStatus { state, ticket });
    }

    fn on_deallocate_sample(&self, id: SampleId) {
        post(&self.commands, Command::DeallocateSample(id));
    }
}
