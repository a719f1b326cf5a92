//! Media value types exchanged between the demuxer, the pipeline and the
//! platform player.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ============================================================================
// Stream Types
// ============================================================================

/// Elementary stream kind. Audio and video each get independent read state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    Audio,
    Video,
}

impl StreamType {
    pub const ALL: [StreamType; 2] = [StreamType::Audio, StreamType::Video];
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamType::Audio => f.write_str("audio"),
            StreamType::Video => f.write_str("video"),
        }
    }
}

// ============================================================================
// Codecs and Decoder Configuration
// ============================================================================

/// Audio codecs a demuxer may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    Aac,
    Opus,
    Vorbis,
    Mp3,
    Flac,
    Pcm,
    Unknown,
}

/// Video codecs a demuxer may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    H264,
    H265,
    Vp8,
    Vp9,
    Av1,
    Unknown,
}

/// Speaker arrangement of an audio stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelLayout {
    Mono,
    Stereo,
    Quad,
    Surround5_1,
    Surround7_1,
    /// Layout the demuxer could not classify.
    Unsupported,
}

impl ChannelLayout {
    /// Number of channels in the layout; `0` for [`ChannelLayout::Unsupported`].
    pub fn channel_count(&self) -> u16 {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
            ChannelLayout::Quad => 4,
            ChannelLayout::Surround5_1 => 6,
            ChannelLayout::Surround7_1 => 8,
            ChannelLayout::Unsupported => 0,
        }
    }
}

/// Decoder configuration of an audio stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDecoderConfig {
    pub codec: AudioCodec,
    pub channel_layout: ChannelLayout,
    pub samples_per_second: u32,
    pub bits_per_channel: u16,
    /// Codec-specific setup data (e.g. AAC AudioSpecificConfig).
    pub extra_data: Vec<u8>,
    pub is_encrypted: bool,
}

impl AudioDecoderConfig {
    pub fn new(
        codec: AudioCodec,
        channel_layout: ChannelLayout,
        samples_per_second: u32,
        bits_per_channel: u16,
    ) -> Self {
        Self {
            codec,
            channel_layout,
            samples_per_second,
            bits_per_channel,
            extra_data: Vec::new(),
            is_encrypted: false,
        }
    }

    pub fn with_extra_data(mut self, extra_data: Vec<u8>) -> Self {
        self.extra_data = extra_data;
        self
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_layout.channel_count()
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoSize {
    pub width: u32,
    pub height: u32,
}

impl VideoSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Decoder configuration of a video stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDecoderConfig {
    pub codec: VideoCodec,
    pub coded_size: VideoSize,
    /// Display size after aspect-ratio correction.
    pub natural_size: VideoSize,
    pub extra_data: Vec<u8>,
    pub is_encrypted: bool,
}

impl VideoDecoderConfig {
    pub fn new(codec: VideoCodec, coded_size: VideoSize, natural_size: VideoSize) -> Self {
        Self {
            codec,
            coded_size,
            natural_size,
            extra_data: Vec::new(),
            is_encrypted: false,
        }
    }
}

// ============================================================================
// Encoded Buffers
// ============================================================================

/// One clear/encrypted byte run inside an encrypted sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsampleEntry {
    pub clear_bytes: u32,
    pub cypher_bytes: u32,
}

/// Per-sample decryption parameters. Opaque to the pipeline; handed to the
/// player alongside the sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptConfig {
    pub key_id: Vec<u8>,
    pub iv: Vec<u8>,
    pub subsamples: Vec<SubsampleEntry>,
}

/// Encoded sample produced by a demuxer stream.
///
/// The payload is reference counted; the pipeline keeps a clone alive while
/// the platform player may still read from it.
#[derive(Debug, Clone)]
pub struct DecoderBuffer {
    data: Bytes,
    timestamp: Duration,
    duration: Duration,
    is_key_frame: bool,
    end_of_stream: bool,
    decrypt_config: Option<DecryptConfig>,
}

impl DecoderBuffer {
    /// Create a buffer carrying `data` presented at `timestamp`.
    pub fn new(data: impl Into<Bytes>, timestamp: Duration) -> Self {
        Self {
            data: data.into(),
            timestamp,
            duration: Duration::ZERO,
            is_key_frame: false,
            end_of_stream: false,
            decrypt_config: None,
        }
    }

    /// Sentinel buffer marking the end of a stream.
    pub fn end_of_stream() -> Self {
        Self {
            data: Bytes::new(),
            timestamp: Duration::ZERO,
            duration: Duration::ZERO,
            is_key_frame: false,
            end_of_stream: true,
            decrypt_config: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_key_frame(mut self, is_key_frame: bool) -> Self {
        self.is_key_frame = is_key_frame;
        self
    }

    pub fn with_decrypt_config(mut self, config: DecryptConfig) -> Self {
        self.decrypt_config = Some(config);
        self
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn data_size(&self) -> usize {
        self.data.len()
    }

    pub fn timestamp(&self) -> Duration {
        self.timestamp
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_key_frame(&self) -> bool {
        self.is_key_frame
    }

    pub fn decrypt_config(&self) -> Option<&DecryptConfig> {
        self.decrypt_config.as_ref()
    }
}
