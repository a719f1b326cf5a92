//! Controllable fakes for pipeline integration tests.
//!
//! Every collaborator reports what the pipeline did with it through a channel,
//! and every asynchronous completion is driven by the test.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::demuxer::{Demuxer, DemuxerHost, DemuxerStream, StreamReadResult};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::media::{
    AudioCodec, AudioDecoderConfig, ChannelLayout, DecoderBuffer, StreamType, VideoCodec,
    VideoDecoderConfig, VideoSize,
};
use bridge_traits::player::{
    PlatformPlayer, PlayerCreateParams, PlayerEventSink, PlayerFactory, PlayerInfo, PlayerState,
    SampleData, SampleId, Ticket, VideoSampleInfo,
};
use bridge_traits::status::{BufferingState, PipelineStatus};
use core_async::sync::{mpsc, oneshot};
use core_async::time::timeout;
use core_playback::pipeline::{Pipeline, StartCallbacks};
use core_runtime::config::PipelineConfig;
use core_runtime::events::EventBus;
use parking_lot::Mutex;

pub const TIMEOUT: Duration = Duration::from_secs(2);

// ============================================================================
// Platform player
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCall {
    Created(PlayerCreateParams),
    WriteSample {
        stream: StreamType,
        id: SampleId,
        size: usize,
        timestamp: Duration,
        video_info: Option<VideoSampleInfo>,
        encrypted: bool,
    },
    WriteEndOfStream(StreamType),
    Seek {
        time: Duration,
        ticket: Ticket,
    },
    SetPause(bool),
    SetVolume(f32),
    Destroy,
}

pub struct FakePlayer {
    calls: mpsc::UnboundedSender<PlayerCall>,
    info: Mutex<PlayerInfo>,
    destroyed: AtomicBool,
    used_after_destroy: AtomicBool,
}

impl FakePlayer {
    fn new(calls: mpsc::UnboundedSender<PlayerCall>) -> Self {
        Self {
            calls,
            info: Mutex::new(PlayerInfo::default()),
            destroyed: AtomicBool::new(false),
            used_after_destroy: AtomicBool::new(false),
        }
    }

    fn record(&self, call: PlayerCall) {
        if self.destroyed.load(Ordering::SeqCst) {
            self.used_after_destroy.store(true, Ordering::SeqCst);
        }
        let _ = self.calls.send(call);
    }

    pub fn set_info(&self, info: PlayerInfo) {
        *self.info.lock() = info;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub fn used_after_destroy(&self) -> bool {
        self.used_after_destroy.load(Ordering::SeqCst)
    }
}

impl PlatformPlayer for FakePlayer {
    fn write_sample(&self, stream_type: StreamType, sample: &SampleData<'_>) {
        self.record(PlayerCall::WriteSample {
            stream: stream_type,
            id: sample.id,
            size: sample.data.len(),
            timestamp: sample.timestamp,
            video_info: sample.video_info,
            encrypted: sample.drm_info.is_some(),
        });
    }

    fn write_end_of_stream(&self, stream_type: StreamType) {
        self.record(PlayerCall::WriteEndOfStream(stream_type));
    }

    fn seek(&self, time: Duration, ticket: Ticket) {
        self.record(PlayerCall::Seek { time, ticket });
    }

    fn set_pause(&self, paused: bool) {
        self.record(PlayerCall::SetPause(paused));
    }

    fn set_volume(&self, volume: f32) {
        self.record(PlayerCall::SetVolume(volume));
    }

    fn info(&self) -> PlayerInfo {
        if self.destroyed.load(Ordering::SeqCst) {
            self.used_after_destroy.store(true, Ordering::SeqCst);
        }
        *self.info.lock()
    }

    fn destroy(&self) {
        self.record(PlayerCall::Destroy);
        self.destroyed.store(true, Ordering::SeqCst);
    }
}

pub struct FakeFactory {
    player: Arc<FakePlayer>,
    calls: mpsc::UnboundedSender<PlayerCall>,
    events: Mutex<Option<Arc<dyn PlayerEventSink>>>,
    creations: AtomicUsize,
}

impl FakeFactory {
    pub fn creations(&self) -> usize {
        self.creations.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Arc<dyn PlayerEventSink> {
        self.events
            .lock()
            .clone()
            .expect("player has not been created")
    }
}

impl PlayerFactory for FakeFactory {
    fn create(
        &self,
        params: PlayerCreateParams,
        events: Arc<dyn PlayerEventSink>,
    ) -> BridgeResult<Arc<dyn PlatformPlayer>> {
        self.creations.fetch_add(1, Ordering::SeqCst);
        *self.events.lock() = Some(events);
        let _ = self.calls.send(PlayerCall::Created(params));
        let player: Arc<dyn PlatformPlayer> = self.player.clone();
        Ok(player)
    }
}

// ============================================================================
// Demuxer
// ============================================================================

/// A read the pipeline issued; the test decides how it completes.
pub struct PendingRead {
    pub stream: StreamType,
    responder: oneshot::Sender<StreamReadResult>,
}

impl PendingRead {
    pub fn respond(self, result: StreamReadResult) {
        let _ = self.responder.send(result);
    }

    pub fn buffer(self, buffer: DecoderBuffer) {
        self.respond(StreamReadResult::Ok(buffer));
    }
}

pub struct FakeStream {
    stream_type: StreamType,
    audio_config: Mutex<Option<AudioDecoderConfig>>,
    video_config: Mutex<Option<VideoDecoderConfig>>,
    reads: mpsc::UnboundedSender<PendingRead>,
    read_count: AtomicUsize,
}

impl FakeStream {
    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    pub fn set_video_config(&self, config: VideoDecoderConfig) {
        *self.video_config.lock() = Some(config);
    }
}

#[async_trait]
impl DemuxerStream for FakeStream {
    fn stream_type(&self) -> StreamType {
        self.stream_type
    }

    async fn read(&self) -> StreamReadResult {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        let (responder, result) = oneshot::channel();
        let pending = PendingRead {
            stream: self.stream_type,
            responder,
        };
        if self.reads.send(pending).is_err() {
            return StreamReadResult::Aborted;
        }
        result.await.unwrap_or(StreamReadResult::Aborted)
    }

    fn audio_decoder_config(&self) -> Option<AudioDecoderConfig> {
        self.audio_config.lock().clone()
    }

    fn video_decoder_config(&self) -> Option<VideoDecoderConfig> {
        self.video_config.lock().clone()
    }
}

pub struct FakeDemuxer {
    audio: Option<Arc<FakeStream>>,
    video: Option<Arc<FakeStream>>,
    init_status: PipelineStatus,
    seek_status: Mutex<PipelineStatus>,
    host: Mutex<Option<Arc<dyn DemuxerHost>>>,
    seeks: Mutex<Vec<Duration>>,
    stop_count: AtomicUsize,
    stop_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl FakeDemuxer {
    pub fn audio(&self) -> Arc<FakeStream> {
        self.audio.clone().expect("no audio stream")
    }

    pub fn video(&self) -> Arc<FakeStream> {
        self.video.clone().expect("no video stream")
    }

    pub fn host(&self) -> Arc<dyn DemuxerHost> {
        self.host.lock().clone().expect("demuxer not initialized")
    }

    pub fn fail_seeks_with(&self, status: PipelineStatus) {
        *self.seek_status.lock() = status;
    }

    pub fn seeks(&self) -> Vec<Duration> {
        self.seeks.lock().clone()
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count.load(Ordering::SeqCst)
    }

    /// `stop` completes only once the returned sender fires.
    pub fn hold_stop(&self) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        *self.stop_gate.lock() = Some(gate);
        release
    }
}

#[async_trait]
impl Demuxer for FakeDemuxer {
    async fn initialize(&self, host: Arc<dyn DemuxerHost>) -> PipelineStatus {
        *self.host.lock() = Some(host);
        self.init_status
    }

    async fn seek(&self, time: Duration) -> PipelineStatus {
        self.seeks.lock().push(time);
        *self.seek_status.lock()
    }

    async fn stop(&self) {
        self.stop_count.fetch_add(1, Ordering::SeqCst);
        let gate = self.stop_gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    fn stream(&self, stream_type: StreamType) -> Option<Arc<dyn DemuxerStream>> {
        let stream = match stream_type {
            StreamType::Audio => self.audio.clone(),
            StreamType::Video => self.video.clone(),
        };
        stream.map(|stream| stream as Arc<dyn DemuxerStream>)
    }
}

// ============================================================================
// Harness
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CallbackEvent {
    Ended(PipelineStatus),
    Error(PipelineStatus),
    Seek(PipelineStatus),
    BufferingState(BufferingState),
    DurationChanged,
}

pub fn aac_stereo() -> AudioDecoderConfig {
    AudioDecoderConfig::new(AudioCodec::Aac, ChannelLayout::Stereo, 48_000, 16)
}

pub fn h264_1080p() -> VideoDecoderConfig {
    VideoDecoderConfig::new(
        VideoCodec::H264,
        VideoSize::new(1920, 1088),
        VideoSize::new(1920, 1080),
    )
}

/// A freshly allocated sample, so every call yields a distinct identity.
pub fn sample(len: usize, timestamp_ms: u64) -> DecoderBuffer {
    DecoderBuffer::new(vec![0xab; len], Duration::from_millis(timestamp_ms))
}

pub struct HarnessBuilder {
    audio: Option<AudioDecoderConfig>,
    video: Option<VideoDecoderConfig>,
    init_status: PipelineStatus,
    media_log: Option<Arc<EventBus>>,
    factory: Option<Arc<dyn PlayerFactory>>,
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self {
            audio: Some(aac_stereo()),
            video: None,
            init_status: Ok(()),
            media_log: None,
            factory: None,
        }
    }
}

impl HarnessBuilder {
    pub fn audio(mut self, config: Option<AudioDecoderConfig>) -> Self {
        self.audio = config;
        self
    }

    pub fn video(mut self, config: VideoDecoderConfig) -> Self {
        self.video = Some(config);
        self
    }

    pub fn init_status(mut self, status: PipelineStatus) -> Self {
        self.init_status = status;
        self
    }

    pub fn media_log(mut self, bus: Arc<EventBus>) -> Self {
        self.media_log = Some(bus);
        self
    }

    /// Creates players with `factory` instead of the recording fake.
    pub fn factory(mut self, factory: Arc<dyn PlayerFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn build(self) -> Harness {
        let (calls_tx, calls) = mpsc::unbounded_channel();
        let (reads_tx, reads) = mpsc::unbounded_channel();
        let (callbacks_tx, callbacks) = mpsc::unbounded_channel();

        let player = Arc::new(FakePlayer::new(calls_tx.clone()));
        let factory = Arc::new(FakeFactory {
            player: Arc::clone(&player),
            calls: calls_tx,
            events: Mutex::new(None),
            creations: AtomicUsize::new(0),
        });

        let audio = self.audio.map(|config| {
            Arc::new(FakeStream {
                stream_type: StreamType::Audio,
                audio_config: Mutex::new(Some(config)),
                video_config: Mutex::new(None),
                reads: reads_tx.clone(),
                read_count: AtomicUsize::new(0),
            })
        });
        let video = self.video.map(|config| {
            Arc::new(FakeStream {
                stream_type: StreamType::Video,
                audio_config: Mutex::new(None),
                video_config: Mutex::new(Some(config)),
                reads: reads_tx.clone(),
                read_count: AtomicUsize::new(0),
            })
        });
        let demuxer = Arc::new(FakeDemuxer {
            audio,
            video,
            init_status: self.init_status,
            seek_status: Mutex::new(Ok(())),
            host: Mutex::new(None),
            seeks: Mutex::new(Vec::new()),
            stop_count: AtomicUsize::new(0),
            stop_gate: Mutex::new(None),
        });

        let player_factory: Arc<dyn PlayerFactory> = match self.factory {
            Some(factory) => factory,
            None => factory.clone() as Arc<dyn PlayerFactory>,
        };
        let mut config = PipelineConfig::builder().player_factory(player_factory);
        if let Some(bus) = self.media_log {
            config = config.media_log(bus);
        }
        let pipeline = Pipeline::new(config.build().expect("valid config"))
            .expect("inside a runtime");

        Harness {
            pipeline,
            demuxer,
            factory,
            player,
            calls,
            reads,
            callbacks_tx,
            callbacks,
        }
    }
}

pub struct Harness {
    pub pipeline: Pipeline,
    pub demuxer: Arc<FakeDemuxer>,
    pub factory: Arc<FakeFactory>,
    pub player: Arc<FakePlayer>,
    calls: mpsc::UnboundedReceiver<PlayerCall>,
    reads: mpsc::UnboundedReceiver<PendingRead>,
    callbacks_tx: mpsc::UnboundedSender<CallbackEvent>,
    callbacks: mpsc::UnboundedReceiver<CallbackEvent>,
}

impl Harness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Callbacks reporting into this harness.
    pub fn start_callbacks(&self) -> StartCallbacks {
        let seek = self.callbacks_tx.clone();
        let ended = self.callbacks_tx.clone();
        let error = self.callbacks_tx.clone();
        let buffering = self.callbacks_tx.clone();
        let duration = self.callbacks_tx.clone();

        StartCallbacks::new(move |status| {
            let _ = seek.send(CallbackEvent::Seek(status));
        })
        .on_ended(move |status| {
            let _ = ended.send(CallbackEvent::Ended(status));
        })
        .on_error(move |status| {
            let _ = error.send(CallbackEvent::Error(status));
        })
        .on_buffering_state(move |state| {
            let _ = buffering.send(CallbackEvent::BufferingState(state));
        })
        .on_duration_change(move || {
            let _ = duration.send(CallbackEvent::DurationChanged);
        })
    }

    pub fn start(&self) {
        let demuxer: Arc<dyn Demuxer> = self.demuxer.clone();
        self.pipeline.start(demuxer, self.start_callbacks());
    }

    /// A seek whose outcome is reported as [`CallbackEvent::Seek`].
    pub fn seek(&self, time: Duration) {
        let seek = self.callbacks_tx.clone();
        self.pipeline.seek(time, move |status| {
            let _ = seek.send(CallbackEvent::Seek(status));
        });
    }

    /// A stop resolving the returned receiver.
    pub fn stop(&self) -> oneshot::Receiver<()> {
        let (done, stopped) = oneshot::channel();
        self.pipeline.stop(move || {
            let _ = done.send(());
        });
        stopped
    }

    pub fn events(&self) -> Arc<dyn PlayerEventSink> {
        self.factory.events()
    }

    pub async fn next_call(&mut self) -> PlayerCall {
        timeout(TIMEOUT, self.calls.recv())
            .await
            .expect("timed out waiting for a player call")
            .expect("player call channel closed")
    }

    pub async fn next_read(&mut self) -> PendingRead {
        timeout(TIMEOUT, self.reads.recv())
            .await
            .expect("timed out waiting for a demuxer read")
            .expect("read channel closed")
    }

    pub async fn next_callback(&mut self) -> CallbackEvent {
        timeout(TIMEOUT, self.callbacks.recv())
            .await
            .expect("timed out waiting for a callback")
            .expect("callback channel closed")
    }

    /// Lets queued commands and the tasks they spawned run.
    pub async fn settle(&self) {
        self.pipeline.barrier().await;
        for _ in 0..8 {
            core_async::task::yield_now().await;
        }
        self.pipeline.barrier().await;
    }

    pub async fn assert_no_calls(&mut self) {
        self.settle().await;
        if let Ok(call) = self.calls.try_recv() {
            panic!("unexpected player call: {:?}", call);
        }
    }

    pub async fn assert_no_reads(&mut self) {
        self.settle().await;
        if let Ok(read) = self.reads.try_recv() {
            panic!("unexpected {} read", read.stream);
        }
    }

    pub async fn assert_no_callbacks(&mut self) {
        self.settle().await;
        if let Ok(event) = self.callbacks.try_recv() {
            panic!("unexpected callback: {:?}", event);
        }
    }

    /// Starts the pipeline and waits for the player to be created.
    pub async fn start_and_create_player(&mut self) -> PlayerCreateParams {
        self.start();
        assert_eq!(
            self.next_callback().await,
            CallbackEvent::BufferingState(BufferingState::HaveMetadata)
        );

        let params = match self.next_call().await {
            PlayerCall::Created(params) => params,
            other => panic!("expected player creation, got {:?}", other),
        };
        assert_eq!(self.next_call().await, PlayerCall::SetPause(true));
        assert_eq!(self.next_call().await, PlayerCall::SetVolume(1.0));
        params
    }

    /// Runs the pipeline up to its first `Presenting`, with ticket 1.
    pub async fn start_and_preroll(&mut self) {
        self.start_and_create_player().await;

        self.events()
            .on_player_status(PlayerState::Initialized, Ticket::INITIAL);
        assert_eq!(
            self.next_call().await,
            PlayerCall::Seek {
                time: Duration::ZERO,
                ticket: Ticket::new(1),
            }
        );

        self.events()
            .on_player_status(PlayerState::Presenting, Ticket::new(1));
        assert_eq!(
            self.next_callback().await,
            CallbackEvent::BufferingState(BufferingState::PrerollCompleted)
        );
        assert_eq!(self.next_callback().await, CallbackEvent::Seek(Ok(())));
    }

    /// Seeks to `time` and waits for the player seek, returning its ticket.
    pub async fn seek_to(&mut self, time: Duration) -> Ticket {
        self.seek(time);
        match self.next_call().await {
            PlayerCall::Seek { time: sought, ticket } => {
                assert_eq!(sought, time);
                ticket
            }
            other => panic!("expected player seek, got {:?}", other),
        }
    }

    /// Reads for `stream` until the player receives a sample, returning the
    /// written sample's call.
    pub async fn feed(&mut self, stream: StreamType, ticket: Ticket, buffer: DecoderBuffer) -> PlayerCall {
        self.events()
            .on_decoder_status(stream, bridge_traits::player::DecoderState::NeedsData, ticket);
        let read = self.next_read().await;
        assert_eq!(read.stream, stream);
        read.buffer(buffer);
        self.next_call().await
    }
}
