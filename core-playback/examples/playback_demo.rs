//! # Pipeline Usage Example
//!
//! Plays a synthetic audio-only stream through a console "platform player"
//! that echoes every call and answers with the notifications a real decoder
//! would send.
//!
//! Run with: `cargo run --example playback_demo --package core-playback`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::demuxer::{Demuxer, DemuxerHost, DemuxerStream, StreamReadResult};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::logging::LogLevel;
use bridge_traits::media::{
    AudioCodec, AudioDecoderConfig, ChannelLayout, DecoderBuffer, StreamType, VideoDecoderConfig,
};
use bridge_traits::player::{
    DecoderState, PlatformPlayer, PlayerCreateParams, PlayerEventSink, PlayerFactory, PlayerInfo,
    PlayerState, SampleData, Ticket,
};
use bridge_traits::status::PipelineStatus;
use core_async::sync::oneshot;
use core_playback::{Pipeline, StartCallbacks};
use core_runtime::config::PipelineConfig;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use parking_lot::Mutex;

const SAMPLE_COUNT: u64 = 8;
const SAMPLE_DURATION: Duration = Duration::from_millis(20);

// ============================================================================
// Synthetic demuxer
// ============================================================================

struct ToneStream {
    next: Mutex<u64>,
}

#[async_trait]
impl DemuxerStream for ToneStream {
    fn stream_type(&self) -> StreamType {
        StreamType::Audio
    }

    async fn read(&self) -> StreamReadResult {
        let index = {
            let mut next = self.next.lock();
            let index = *next;
            *next += 1;
            index
        };

        if index >= SAMPLE_COUNT {
            return StreamReadResult::Ok(DecoderBuffer::end_of_stream());
        }
        let timestamp = SAMPLE_DURATION * index as u32;
        StreamReadResult::Ok(
            DecoderBuffer::new(vec![0u8; 512], timestamp).with_duration(SAMPLE_DURATION),
        )
    }

    fn audio_decoder_config(&self) -> Option<AudioDecoderConfig> {
        Some(AudioDecoderConfig::new(
            AudioCodec::Aac,
            ChannelLayout::Stereo,
            48_000,
            16,
        ))
    }

    fn video_decoder_config(&self) -> Option<VideoDecoderConfig> {
        None
    }
}

struct ToneDemuxer {
    audio: Arc<ToneStream>,
}

#[async_trait]
impl Demuxer for ToneDemuxer {
    async fn initialize(&self, host: Arc<dyn DemuxerHost>) -> PipelineStatus {
        host.set_duration(SAMPLE_DURATION * SAMPLE_COUNT as u32);
        Ok(())
    }

    async fn seek(&self, time: Duration) -> PipelineStatus {
        let index = time.as_millis() / SAMPLE_DURATION.as_millis();
        *self.audio.next.lock() = index as u64;
        Ok(())
    }

    async fn stop(&self) {}

    fn stream(&self, stream_type: StreamType) -> Option<Arc<dyn DemuxerStream>> {
        match stream_type {
            StreamType::Audio => Some(self.audio.clone()),
            StreamType::Video => None,
        }
    }
}

// ============================================================================
// Console player
// ============================================================================

struct ConsolePlayer {
    events: Arc<dyn PlayerEventSink>,
    ticket: Mutex<Ticket>,
    position: Mutex<Duration>,
    /// Whether `Presenting` was announced since the last seek.
    presenting: Mutex<bool>,
}

impl PlatformPlayer for ConsolePlayer {
    fn write_sample(&self, stream_type: StreamType, sample: &SampleData<'_>) {
        println!(
            "  {} sample at {:?} ({} bytes)",
            stream_type,
            sample.timestamp,
            sample.data.len()
        );
        *self.position.lock() = sample.timestamp;

        let ticket = *self.ticket.lock();
        self.events.on_deallocate_sample(sample.id);
        if !std::mem::replace(&mut *self.presenting.lock(), true) {
            self.events.on_player_status(PlayerState::Presenting, ticket);
        }
        self.events
            .on_decoder_status(stream_type, DecoderState::NeedsData, ticket);
    }

    fn write_end_of_stream(&self, stream_type: StreamType) {
        println!("  {} end of stream", stream_type);
        let ticket = *self.ticket.lock();
        self.events.on_player_status(PlayerState::EndOfStream, ticket);
    }

    fn seek(&self, time: Duration, ticket: Ticket) {
        println!("  seek to {:?} ({})", time, ticket);
        *self.ticket.lock() = ticket;
        *self.position.lock() = time;
        *self.presenting.lock() = false;
        self.events
            .on_decoder_status(StreamType::Audio, DecoderState::NeedsData, ticket);
    }

    fn set_pause(&self, paused: bool) {
        println!("  paused: {}", paused);
    }

    fn set_volume(&self, volume: f32) {
        println!("  volume: {}", volume);
    }

    fn info(&self) -> PlayerInfo {
        PlayerInfo {
            current_media_time: *self.position.lock(),
            ..PlayerInfo::default()
        }
    }

    fn destroy(&self) {
        println!("  player destroyed");
    }
}

struct ConsolePlayerFactory;

impl PlayerFactory for ConsolePlayerFactory {
    fn create(
        &self,
        params: PlayerCreateParams,
        events: Arc<dyn PlayerEventSink>,
    ) -> BridgeResult<Arc<dyn PlatformPlayer>> {
        println!(
            "  creating player: {:?}, {} Hz",
            params.audio_codec, params.audio_header.samples_per_second
        );
        events.on_player_status(PlayerState::Initialized, Ticket::INITIAL);
        Ok(Arc::new(ConsolePlayer {
            events,
            ticket: Mutex::new(Ticket::INITIAL),
            position: Mutex::new(Duration::ZERO),
            presenting: Mutex::new(false),
        }))
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Info),
    )?;

    println!("=== Pipeline Demo ===\n");

    let config = PipelineConfig::builder()
        .player_factory(Arc::new(ConsolePlayerFactory))
        .build()?;
    let pipeline = Pipeline::new(config)?;

    let demuxer = Arc::new(ToneDemuxer {
        audio: Arc::new(ToneStream {
            next: Mutex::new(0),
        }),
    });

    let (ended_tx, ended) = oneshot::channel();
    let ended_tx = Mutex::new(Some(ended_tx));
    pipeline.start(
        demuxer,
        StartCallbacks::new(|status| println!("Preroll finished: {:?}", status))
            .on_ended(move |status| {
                if let Some(tx) = ended_tx.lock().take() {
                    let _ = tx.send(status);
                }
            })
            .on_error(|status| eprintln!("Pipeline error: {:?}", status))
            .on_buffering_state(|state| println!("Buffering: {:?}", state)),
    );
    pipeline.set_playback_rate(1.0);

    let status = ended.await?;
    println!("\nPlayback ended: {:?}", status);
    println!("Position: {:?}", pipeline.media_time());
    println!("Duration: {:?}", pipeline.media_duration());
    println!("Statistics: {:?}", pipeline.statistics());

    let (stopped_tx, stopped) = oneshot::channel();
    pipeline.stop(move || {
        let _ = stopped_tx.send(());
    });
    stopped.await?;
    println!("Stopped in state {}", pipeline.state());

    Ok(())
}
