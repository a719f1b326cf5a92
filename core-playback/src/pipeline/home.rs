//! The pipeline's home task.
//!
//! [`PipelineCore`] owns every piece of mutable playback state and is driven
//! exclusively by the [`Command`]s drained in [`PipelineCore::run`]. Fields
//! readable from other threads are mirrored into [`Shared`] under its lock.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::demuxer::{Demuxer, DemuxerHost, DemuxerStream, StreamReadResult};
use bridge_traits::media::{AudioDecoderConfig, DecoderBuffer, StreamType, VideoDecoderConfig};
use bridge_traits::player::{
    DecoderState, PlatformPlayer, PlayerEventSink, PlayerState, SampleData, SampleId, Ticket,
    VideoSampleInfo,
};
use bridge_traits::status::{BufferingState, PipelineError, PipelineStatus};
use core_async::sync::mpsc::{UnboundedReceiver, WeakUnboundedSender};
use core_async::sync::oneshot;
use core_async::task;
use core_runtime::config::PipelineConfig;
use core_runtime::events::MediaEvent;
use parking_lot::Mutex;
use tracing::{debug, error, info, instrument, trace, warn};

use super::callbacks::{
    BufferingStateCallback, DurationChangeCallback, SeekCallback, StartCallbacks, StatusCallback,
    StopCallback,
};
use super::command::{post, Command, HostEvent};
use super::dispatch::{HostDispatcher, PlayerEventDispatcher};
use super::Shared;
use crate::error::PlaybackError;
use crate::player_config;
use crate::retention::BufferRetentionMap;
use crate::scheduler::{ReadDecision, ReadScheduler};
use crate::state::PipelineState;
use crate::ticket::TicketCounter;

/// Callbacks that stay registered for the pipeline's lifetime.
struct Callbacks {
    ended: StatusCallback,
    error: StatusCallback,
    buffering_state: BufferingStateCallback,
    duration_change: DurationChangeCallback,
}

/// The unresolved seek, including the initial preroll started by `start`.
struct PendingSeek {
    time: Duration,
    callback: SeekCallback,
}

enum StopProgress {
    NotRequested,
    /// `Demuxer::stop` is running; these callers wait for it.
    Stopping {
        waiting: Vec<StopCallback>,
        /// Fires once `Demuxer::stop` returned, even if the queue is closed.
        done: oneshot::Receiver<()>,
    },
    Stopped,
}

pub(crate) struct PipelineCore {
    config: PipelineConfig,
    shared: Arc<Mutex<Shared>>,
    commands: WeakUnboundedSender<Command>,

    state: PipelineState,
    tickets: TicketCounter,
    scheduler: ReadScheduler,
    retention: BufferRetentionMap,

    demuxer: Option<Arc<dyn Demuxer>>,
    player: Option<Arc<dyn PlatformPlayer>>,
    audio_config: Option<AudioDecoderConfig>,
    video_config: Option<VideoDecoderConfig>,

    callbacks: Option<Callbacks>,
    pending_seek: Option<PendingSeek>,
    stop: StopProgress,
}

impl PipelineCore {
    pub(crate) fn new(
        config: PipelineConfig,
        shared: Arc<Mutex<Shared>>,
        commands: WeakUnboundedSender<Command>,
    ) -> Self {
        Self {
            config,
            shared,
            commands,
            state: PipelineState::Created,
            tickets: TicketCounter::new(),
            scheduler: ReadScheduler::new(),
            retention: BufferRetentionMap::new(),
            demuxer: None,
            player: None,
            audio_config: None,
            video_config: None,
            callbacks: None,
            pending_seek: None,
            stop: StopProgress::NotRequested,
        }
    }

    /// Drains the queue until every `Pipeline` handle is dropped.
    pub(crate) async fn run(mut self, mut commands: UnboundedReceiver<Command>) {
        while let Some(command) = commands.recv().await {
            self.handle(command);
        }
        self.shutdown();
    }

    fn handle(&mut self, command: Command) {
        trace!(command = command.name(), state = %self.state, "Handling command");

        match command {
            Command::Start { demuxer, callbacks } => self.start(demuxer, callbacks),
            Command::Seek { time, callback } => self.seek(time, callback),
            Command::Stop { callback } => self.stop(callback),
            Command::SetPlaybackRate(rate) => {
                if let Some(player) = &self.player {
                    player.set_pause(rate == 0.0);
                }
            }
            Command::SetVolume(volume) => {
                if let Some(player) = &self.player {
                    player.set_volume(volume);
                }
            }
            Command::Barrier(done) => {
                let _ = done.send(());
            }
            Command::DemuxerInitialized(status) => self.on_demuxer_initialized(status),
            Command::DemuxerSeeked { ticket, status } => self.on_demuxer_seeked(ticket, status),
            Command::DemuxerStopped => self.on_demuxer_stopped(),
            Command::StreamRead {
                stream,
                ticket,
                result,
            } => self.on_stream_read(stream, ticket, result),
            Command::Host(event) => self.on_host_event(event),
            Command::DecoderStatus {
                stream,
                state,
                ticket,
            } => self.on_decoder_status(stream, state, ticket),
            Command::PlayerStatus { state, ticket } => self.on_player_status(state, ticket),
            Command::DeallocateSample(id) => self.on_deallocate_sample(id),
        }
    }

    // ========================================================================
    // Caller requests
    // ========================================================================

    #[instrument(skip_all)]
    fn start(&mut self, demuxer: Arc<dyn Demuxer>, callbacks: StartCallbacks) {
        if let Err(err) = self
            .state
            .transition(PipelineState::DemuxerInitializing, "start")
        {
            warn!(error = %err, "Start rejected");
            (callbacks.error)(Err(PipelineError::InvalidState));
            return;
        }

        let StartCallbacks {
            ended,
            error,
            seek,
            buffering_state,
            duration_change,
        } = callbacks;
        self.callbacks = Some(Callbacks {
            ended,
            error,
            buffering_state,
            duration_change,
        });
        self.set_pending_seek(Duration::ZERO, seek);
        self.demuxer = Some(Arc::clone(&demuxer));
        self.enter(PipelineState::DemuxerInitializing, "start");

        let host: Arc<dyn DemuxerHost> = Arc::new(HostDispatcher::new(self.commands.clone()));
        let commands = self.commands.clone();
        task::spawn(async move {
            let status = demuxer.initialize(host).await;
            post(&commands, Command::DemuxerInitialized(status));
        });
    }

    #[instrument(skip(self, callback))]
    fn seek(&mut self, time: Duration, callback: SeekCallback) {
        let rejection = if self.pending_seek.is_some() {
            Some(PlaybackError::InvalidState {
                state: self.state,
                operation: "seek while another seek is pending",
            })
        } else if self.player.is_none() {
            Some(PlaybackError::PlayerUnavailable)
        } else if !self.state.accepts_seek() {
            Some(PlaybackError::InvalidState {
                state: self.state,
                operation: "seek",
            })
        } else {
            None
        };

        let demuxer = match (rejection, self.demuxer.clone()) {
            (None, Some(demuxer)) => demuxer,
            (rejection, _) => {
                let reason = rejection.unwrap_or(PlaybackError::InvalidState {
                    state: self.state,
                    operation: "seek without a demuxer",
                });
                warn!(error = %reason, "Seek rejected");
                callback(Err(PipelineError::InvalidState));
                return;
            }
        };

        self.enter(PipelineState::Seeking, "seek");
        let ticket = self.advance_ticket();
        self.set_pending_seek(time, callback);
        self.config.log_event(MediaEvent::SeekRequested { time });
        info!(%ticket, "Seeking demuxer");

        let commands = self.commands.clone();
        task::spawn(async move {
            let status = demuxer.seek(time).await;
            post(&commands, Command::DemuxerSeeked { ticket, status });
        });
    }

    #[instrument(skip_all)]
    fn stop(&mut self, callback: StopCallback) {
        match &mut self.stop {
            StopProgress::Stopped => {
                debug!("Already stopped");
                callback();
                return;
            }
            StopProgress::Stopping { waiting, .. } => {
                debug!("Stop already in progress");
                waiting.push(callback);
                return;
            }
            StopProgress::NotRequested => {}
        }

        // An unresolved seek is abandoned, never resolved.
        if self.pending_seek.take().is_some() {
            debug!("Abandoning pending seek");
        }
        self.shared.lock().seek_time = None;

        self.destroy_player();
        self.enter(PipelineState::Stopped, "stop");

        match self.demuxer.clone() {
            Some(demuxer) => {
                let (stopped, done) = oneshot::channel();
                self.stop = StopProgress::Stopping {
                    waiting: vec![callback],
                    done,
                };
                let commands = self.commands.clone();
                task::spawn(async move {
                    demuxer.stop().await;
                    let _ = stopped.send(());
                    post(&commands, Command::DemuxerStopped);
                });
            }
            None => {
                self.stop = StopProgress::Stopped;
                self.config.log_event(MediaEvent::Stopped);
                info!("Pipeline stopped without a demuxer");
                callback();
            }
        }
    }

    // ========================================================================
    // Demuxer completions
    // ========================================================================

    fn on_demuxer_initialized(&mut self, status: PipelineStatus) {
        if self.state != PipelineState::DemuxerInitializing {
            debug!(state = %self.state, "Ignoring demuxer initialization");
            return;
        }

        if let Err(error) = status {
            warn!(%error, "Demuxer initialization failed");
            self.fail(error);
            return;
        }

        let Some(demuxer) = self.demuxer.clone() else {
            self.fail(PipelineError::InvalidState);
            return;
        };

        let audio = demuxer.stream(StreamType::Audio);
        let video = demuxer.stream(StreamType::Video);
        {
            let mut shared = self.shared.lock();
            shared.has_audio = audio.is_some();
            shared.has_video = video.is_some();
        }
        info!(
            has_audio = audio.is_some(),
            has_video = video.is_some(),
            "Demuxer initialized"
        );

        let Some(audio) = audio else {
            error!("Media has no audio stream");
            self.fail(PipelineError::DemuxerInitError);
            return;
        };

        self.audio_config = audio.audio_decoder_config();
        self.video_config = video.as_ref().and_then(|stream| stream.video_decoder_config());
        if video.is_some() && self.video_config.is_none() {
            error!("Video stream has no decoder configuration");
            self.fail(PipelineError::DecodeError);
            return;
        }
        if let Some(config) = &self.video_config {
            self.shared.lock().natural_size = config.natural_size;
        }

        self.notify_buffering_state(BufferingState::HaveMetadata);
        self.create_player();
    }

    fn create_player(&mut self) {
        let Some(audio_config) = self.audio_config.as_ref() else {
            error!("Audio stream has no decoder configuration");
            self.fail(PipelineError::DecodeError);
            return;
        };

        let duration_hint = self.config.duration_hint.or_else(|| {
            let duration = self.shared.lock().duration;
            (!duration.is_zero()).then_some(duration)
        });

        let params = match player_config::create_params(
            audio_config,
            self.video_config.as_ref(),
            duration_hint,
            self.config.drm_system.clone(),
        ) {
            Ok(params) => params,
            Err(err) => {
                error!(error = %err, "Cannot describe streams to the platform player");
                self.fail(PipelineError::DecodeError);
                return;
            }
        };

        let events: Arc<dyn PlayerEventSink> =
            Arc::new(PlayerEventDispatcher::new(self.commands.clone()));
        let player = match self.config.player_factory.create(params, events) {
            Ok(player) => player,
            Err(err) => {
                error!(error = %err, "Platform player creation failed");
                self.fail(PipelineError::DecodeError);
                return;
            }
        };

        let (paused, volume) = {
            let mut shared = self.shared.lock();
            shared.player = Some(Arc::clone(&player));
            (shared.playback_rate == 0.0, shared.volume)
        };
        player.set_pause(paused);
        player.set_volume(volume);
        self.player = Some(player);

        self.enter(PipelineState::PlayerCreated, "create player");
    }

    fn on_demuxer_seeked(&mut self, ticket: Ticket, status: PipelineStatus) {
        if let Err(err) = self.tickets.check(ticket) {
            debug!(error = %err, "Ignoring stale demuxer seek");
            return;
        }
        if self.state != PipelineState::Seeking {
            debug!(state = %self.state, "Ignoring demuxer seek completion");
            return;
        }

        if let Err(error) = status {
            warn!(%error, "Demuxer seek failed");
            let pending = self.take_pending_seek();
            self.enter(PipelineState::Error, "demuxer seek");
            self.config.log_event(MediaEvent::Error(error));
            if let Some(pending) = pending {
                (pending.callback)(Err(error));
            }
            return;
        }

        let Some(player) = self.player.clone() else {
            return;
        };
        let time = self
            .pending_seek
            .as_ref()
            .map(|pending| pending.time)
            .unwrap_or_default();
        let ticket = self.advance_ticket();
        self.enter(PipelineState::Prerolling, "seek player");
        info!(%ticket, ?time, "Seeking platform player");
        player.seek(time, ticket);
    }

    fn on_demuxer_stopped(&mut self) {
        let waiting = match std::mem::replace(&mut self.stop, StopProgress::Stopped) {
            StopProgress::Stopping { waiting, .. } => waiting,
            _ => {
                warn!("Demuxer stop confirmed without a stop request");
                Vec::new()
            }
        };

        self.demuxer = None;
        info!(waiting = waiting.len(), "Demuxer stopped");
        self.config.log_event(MediaEvent::Stopped);

        for callback in waiting {
            callback();
        }
    }

    fn on_stream_read(&mut self, stream: StreamType, ticket: Ticket, result: StreamReadResult) {
        // Configuration is not epoch scoped; refresh it even for stale reads.
        if matches!(result, StreamReadResult::ConfigChanged) {
            self.refresh_decoder_config(stream);
        }

        if let Err(err) = self.tickets.check(ticket) {
            debug!(%stream, error = %err, "Ignoring stale read");
            if self.scheduler.complete(stream) {
                self.on_needs_data(stream);
            }
            return;
        }

        if self.player.is_none() || !self.state.accepts_reads() {
            debug!(%stream, state = %self.state, "Discarding read");
            self.scheduler.complete(stream);
            return;
        }

        match result {
            StreamReadResult::ConfigChanged => {
                // The player has no reconfiguration entry point.
                warn!(%stream, "Decoder configuration changed; not forwarded to the player");
                match self.demuxer_stream(stream) {
                    Some(demuxer_stream) => self.spawn_read(stream, demuxer_stream, ticket),
                    None => {
                        self.scheduler.complete(stream);
                    }
                }
            }
            StreamReadResult::Aborted => {
                self.scheduler.complete(stream);
                debug!(%stream, "Read aborted");
                if let Some(pending) = self.take_pending_seek() {
                    self.notify_buffering_state(BufferingState::PrerollCompleted);
                    (pending.callback)(Ok(()));
                }
            }
            StreamReadResult::Ok(buffer) => {
                self.scheduler.complete(stream);
                self.submit(stream, buffer);
            }
        }
    }

    fn on_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::TotalBytes(total_bytes) => {
                self.shared.lock().total_bytes = total_bytes;
            }
            HostEvent::BufferedByteRange { start, end } => {
                let mut shared = self.shared.lock();
                shared.buffered_byte_ranges.add(start, end);
                shared.did_loading_progress = true;
            }
            HostEvent::BufferedTimeRange { start, end } => {
                let mut shared = self.shared.lock();
                shared.buffered_time_ranges.add(start, end);
                shared.did_loading_progress = true;
            }
            HostEvent::Duration(duration) => {
                self.shared.lock().duration = duration;
                debug!(?duration, "Duration changed");
                self.config.log_event(MediaEvent::DurationChanged(duration));
                if let Some(callbacks) = &self.callbacks {
                    (callbacks.duration_change)();
                }
            }
            HostEvent::Error(error) => {
                error!(%error, "Demuxer reported an error");
                self.fail(error);
            }
        }
    }

    // ========================================================================
    // Player notifications
    // ========================================================================

    fn on_decoder_status(&mut self, stream: StreamType, state: DecoderState, ticket: Ticket) {
        if self.player.is_none() {
            return;
        }
        if let Err(err) = self.tickets.check(ticket) {
            trace!(%stream, error = %err, "Ignoring stale decoder status");
            return;
        }

        match state {
            DecoderState::NeedsData => self.on_needs_data(stream),
            DecoderState::BufferFull | DecoderState::Destroyed => {
                trace!(%stream, ?state, "Decoder status");
            }
        }
    }

    fn on_player_status(&mut self, state: PlayerState, ticket: Ticket) {
        let Some(player) = self.player.clone() else {
            return;
        };
        if let Err(err) = self.tickets.check(ticket) {
            debug!(?state, error = %err, "Ignoring stale player status");
            return;
        }

        match state {
            PlayerState::Initialized => {
                if !self.enter(PipelineState::Seeking, "seek to start") {
                    return;
                }
                let ticket = self.advance_ticket();
                self.enter(PipelineState::Prerolling, "preroll");
                info!(%ticket, "Player initialized; seeking to start");
                player.seek(Duration::ZERO, ticket);
            }
            PlayerState::Prerolling => debug!("Player prerolling"),
            PlayerState::Presenting => {
                if self.state != PipelineState::Presenting
                    && !self.enter(PipelineState::Presenting, "present")
                {
                    return;
                }
                self.notify_buffering_state(BufferingState::PrerollCompleted);
                if let Some(pending) = self.take_pending_seek() {
                    (pending.callback)(Ok(()));
                }
            }
            PlayerState::EndOfStream => {
                if !self.enter(PipelineState::EndOfStream, "end of stream") {
                    return;
                }
                info!("Playback ended");
                self.config.log_event(MediaEvent::Ended);
                if let Some(callbacks) = &self.callbacks {
                    (callbacks.ended)(Ok(()));
                }
            }
            PlayerState::Destroyed => debug!("Player destroyed"),
            PlayerState::Error => {
                error!("Platform player reported a decode error");
                self.fail(PipelineError::DecodeError);
            }
        }
    }

    fn on_deallocate_sample(&mut self, id: SampleId) {
        match self.retention.release(id) {
            Ok(_) => trace!(sample = %id, retained = self.retention.len(), "Sample released"),
            Err(err) if self.player.is_none() => {
                debug!(error = %err, "Deallocation after player teardown");
            }
            Err(err) => report_defect(&err),
        }
    }

    // ========================================================================
    // Reads and submission
    // ========================================================================

    fn on_needs_data(&mut self, stream: StreamType) {
        if !self.state.accepts_reads() {
            debug!(%stream, state = %self.state, "Ignoring demand for data");
            return;
        }

        match self.scheduler.request(stream) {
            ReadDecision::Issue => match self.demuxer_stream(stream) {
                Some(demuxer_stream) => {
                    let ticket = self.tickets.current();
                    self.spawn_read(stream, demuxer_stream, ticket);
                }
                None => {
                    warn!(%stream, "Player asked for a stream the demuxer does not have");
                    self.scheduler.complete(stream);
                }
            },
            ReadDecision::Suppressed => trace!(%stream, "Read already in flight"),
            ReadDecision::Exhausted => trace!(%stream, "Stream already ended"),
        }
    }

    fn demuxer_stream(&self, stream: StreamType) -> Option<Arc<dyn DemuxerStream>> {
        self.demuxer.as_ref().and_then(|demuxer| demuxer.stream(stream))
    }

    fn spawn_read(&self, stream: StreamType, demuxer_stream: Arc<dyn DemuxerStream>, ticket: Ticket) {
        trace!(%stream, %ticket, "Reading");
        let commands = self.commands.clone();
        task::spawn(async move {
            let result = demuxer_stream.read().await;
            post(
                &commands,
                Command::StreamRead {
                    stream,
                    ticket,
                    result,
                },
            );
        });
    }

    fn refresh_decoder_config(&mut self, stream: StreamType) {
        let Some(demuxer_stream) = self.demuxer_stream(stream) else {
            return;
        };

        match stream {
            StreamType::Audio => {
                if let Some(config) = demuxer_stream.audio_decoder_config() {
                    debug!(codec = ?config.codec, "Audio configuration refreshed");
                    self.audio_config = Some(config);
                }
            }
            StreamType::Video => {
                if let Some(config) = demuxer_stream.video_decoder_config() {
                    debug!(codec = ?config.codec, "Video configuration refreshed");
                    self.shared.lock().natural_size = config.natural_size;
                    self.video_config = Some(config);
                }
            }
        }
    }

    fn submit(&mut self, stream: StreamType, buffer: DecoderBuffer) {
        let Some(player) = self.player.clone() else {
            return;
        };

        if buffer.is_end_of_stream() {
            self.scheduler.mark_end_of_stream(stream);
            info!(%stream, "End of stream");
            player.write_end_of_stream(stream);
            return;
        }

        let video_info = match stream {
            StreamType::Audio => None,
            StreamType::Video => {
                let size = self
                    .video_config
                    .as_ref()
                    .map(|config| config.coded_size)
                    .unwrap_or_default();
                Some(VideoSampleInfo {
                    is_key_frame: buffer.is_key_frame(),
                    frame_width: size.width,
                    frame_height: size.height,
                })
            }
        };

        let id = match self.retention.retain(buffer.clone()) {
            Ok(id) => id,
            Err(err) => {
                report_defect(&err);
                // The slot is free again; keep the stream fed.
                self.on_needs_data(stream);
                return;
            }
        };
        self.shared
            .lock()
            .statistics
            .record_submission(stream, buffer.data_size());

        let sample = SampleData {
            id,
            data: buffer.data(),
            timestamp: buffer.timestamp(),
            video_info,
            drm_info: buffer.decrypt_config(),
        };
        trace!(%stream, sample = %id, timestamp = ?sample.timestamp, "Writing sample");
        player.write_sample(stream, &sample);
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Moves the state machine, mirroring the new state for readers.
    fn enter(&mut self, next: PipelineState, operation: &'static str) -> bool {
        match self.state.transition(next, operation) {
            Ok(next) => {
                let previous = self.state;
                self.state = next;
                self.shared.lock().state = next;
                info!(from = %previous, to = %next, "Pipeline state changed");
                self.config.log_event(MediaEvent::StateChanged {
                    from: previous.to_string(),
                    to: next.to_string(),
                });
                true
            }
            Err(err) => {
                debug!(error = %err, "Transition rejected");
                false
            }
        }
    }

    /// Starts a new epoch. Outstanding requests become stale.
    fn advance_ticket(&mut self) -> Ticket {
        let ticket = self.tickets.bump();
        self.scheduler.reset();
        self.shared.lock().ticket = ticket;
        debug!(%ticket, "Ticket advanced");
        self.config.log_event(MediaEvent::TicketAdvanced { ticket });
        ticket
    }

    fn set_pending_seek(&mut self, time: Duration, callback: SeekCallback) {
        self.pending_seek = Some(PendingSeek { time, callback });
        self.shared.lock().seek_time = Some(time);
    }

    fn take_pending_seek(&mut self) -> Option<PendingSeek> {
        let pending = self.pending_seek.take();
        if pending.is_some() {
            self.shared.lock().seek_time = None;
        }
        pending
    }

    fn notify_buffering_state(&self, state: BufferingState) {
        debug!(?state, "Buffering state");
        self.config
            .log_event(MediaEvent::BufferingStateChanged(state));
        if let Some(callbacks) = &self.callbacks {
            (callbacks.buffering_state)(state);
        }
    }

    /// Surfaces `error` once and parks the machine in `Error`.
    fn fail(&mut self, error: PipelineError) {
        if !self.enter(PipelineState::Error, "fail") {
            debug!(%error, state = %self.state, "Error not surfaced");
            return;
        }
        self.config.log_event(MediaEvent::Error(error));
        if let Some(callbacks) = &self.callbacks {
            (callbacks.error)(Err(error));
        }
    }

    fn destroy_player(&mut self) {
        let Some(player) = self.player.take() else {
            return;
        };
        self.shared.lock().player = None;
        player.destroy();
        let released = self.retention.clear();
        info!(released, "Platform player destroyed");
    }

    /// Releases collaborators once every handle is gone.
    ///
    /// A demuxer that was never stopped is stopped here. Callers still waiting
    /// on an earlier `stop` are resolved once the demuxer confirms.
    fn shutdown(&mut self) {
        debug!(state = %self.state, "Pipeline task exiting");
        self.pending_seek = None;
        self.destroy_player();

        match std::mem::replace(&mut self.stop, StopProgress::Stopped) {
            StopProgress::NotRequested => {
                if let Some(demuxer) = self.demuxer.take() {
                    info!("Stopping demuxer of a dropped pipeline");
                    task::spawn(async move {
                        demuxer.stop().await;
                    });
                }
            }
            StopProgress::Stopping { waiting, done } => {
                self.demuxer = None;
                task::spawn(async move {
                    let _ = done.await;
                    debug!(waiting = waiting.len(), "Demuxer stopped after pipeline exit");
                    for callback in waiting {
                        callback();
                    }
                });
            }
            StopProgress::Stopped => {}
        }
    }
}

fn report_defect(err: &PlaybackError) {
    error!(error = %err, "Sample retention invariant violated");
    debug_assert!(!err.is_defect(), "{}", err);
}
