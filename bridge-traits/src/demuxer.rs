//! Demuxer contract.
//!
//! A demuxer splits a container into elementary streams. The pipeline drives
//! it through [`Demuxer`] and reads samples through [`DemuxerStream`]; the
//! demuxer reports data-source progress back through [`DemuxerHost`].
//!
//! All async methods complete on whatever task the implementation chooses.
//! The pipeline never assumes a completion arrives on its own task and
//! re-posts every result onto its serialized queue before acting on it.

use crate::media::{AudioDecoderConfig, DecoderBuffer, StreamType, VideoDecoderConfig};
use crate::status::{PipelineError, PipelineStatus};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a single [`DemuxerStream::read`].
#[derive(Debug, Clone)]
pub enum StreamReadResult {
    /// A sample, or the end-of-stream sentinel
    /// (see [`DecoderBuffer::is_end_of_stream`]).
    Ok(DecoderBuffer),
    /// The read was abandoned, typically because of a seek or stop.
    Aborted,
    /// The stream's decoder configuration changed; fetch it again from the
    /// stream and issue a new read.
    ConfigChanged,
}

impl StreamReadResult {
    pub fn is_aborted(&self) -> bool {
        matches!(self, StreamReadResult::Aborted)
    }
}

/// One elementary stream exposed by a [`Demuxer`].
#[async_trait]
pub trait DemuxerStream: Send + Sync {
    /// Which kind of samples this stream produces.
    fn stream_type(&self) -> StreamType;

    /// Read the next sample. The pipeline keeps at most one read outstanding
    /// per stream.
    async fn read(&self) -> StreamReadResult;

    /// Current audio configuration; `None` for video streams.
    fn audio_decoder_config(&self) -> Option<AudioDecoderConfig>;

    /// Current video configuration; `None` for audio streams.
    fn video_decoder_config(&self) -> Option<VideoDecoderConfig>;
}

/// Callbacks a demuxer uses to report its data source's progress.
///
/// Implemented by the pipeline. Methods may be called from any thread.
pub trait DemuxerHost: Send + Sync {
    /// Total size of the media resource in bytes.
    fn set_total_bytes(&self, total_bytes: u64);

    /// Bytes `[start, end)` are available locally.
    fn add_buffered_byte_range(&self, start: u64, end: u64);

    /// Media time `[start, end)` is available locally.
    fn add_buffered_time_range(&self, start: Duration, end: Duration);

    /// Duration of the media became known or changed.
    fn set_duration(&self, duration: Duration);

    /// The demuxer hit an unrecoverable error outside of any pending request.
    fn on_demuxer_error(&self, error: PipelineError);
}

/// Container demuxer driven by the pipeline.
#[async_trait]
pub trait Demuxer: Send + Sync {
    /// Parse the container and discover streams. `host` stays valid for the
    /// demuxer's lifetime.
    async fn initialize(&self, host: Arc<dyn DemuxerHost>) -> PipelineStatus;

    /// Reposition every stream to `time`. Reads outstanding at the time of the
    /// call complete with [`StreamReadResult::Aborted`] or are left to finish.
    async fn seek(&self, time: Duration) -> PipelineStatus;

    /// Release the data source. Completes once the demuxer is fully stopped.
    async fn stop(&self);

    /// The stream of the given type, if the container has one.
    fn stream(&self, stream_type: StreamType) -> Option<Arc<dyn DemuxerStream>>;
}
