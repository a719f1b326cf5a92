//! Platform player contract.
//!
//! The platform player is an opaque native decode+render object driven by
//! sample submission. It is created once per pipeline through a
//! [`PlayerFactory`] and reports back through a [`PlayerEventSink`].
//!
//! ## Ticket contract
//!
//! Every [`PlatformPlayer::seek`] carries a [`Ticket`]. All decoder and player
//! status notifications issued as a consequence of that seek must carry the
//! same ticket, so the pipeline can discard notifications that belong to a
//! superseded seek.
//!
//! ## Sample ownership
//!
//! [`PlatformPlayer::write_sample`] lends the player a view of the sample
//! payload. The bytes behind [`SampleData::data`] stay valid, at the same
//! address, until the player calls [`PlayerEventSink::on_deallocate_sample`]
//! with the sample's [`SampleId`]. Implementations that hand the payload to
//! native code may keep the raw pointer until then.

use crate::error::Result;
use crate::media::{AudioCodec, DecryptConfig, StreamType, VideoCodec};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Tickets and Sample Identity
// ============================================================================

/// Epoch stamp carried by player seeks and the notifications they cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticket(u64);

impl Ticket {
    /// Ticket a freshly created player reports its `Initialized` state with.
    pub const INITIAL: Ticket = Ticket(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The ticket following this one.
    pub fn next(&self) -> Ticket {
        Ticket(self.0 + 1)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a submitted sample: the address of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleId(usize);

impl SampleId {
    /// Identity of the payload `data` points at. Clones of the same `Bytes`
    /// share an identity.
    pub fn of(data: &Bytes) -> Self {
        Self(data.as_ptr() as usize)
    }

    pub fn from_raw(address: usize) -> Self {
        Self(address)
    }

    pub fn as_raw(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

// ============================================================================
// Player States
// ============================================================================

/// Per-stream decoder notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecoderState {
    /// The decoder can accept another sample of this stream type.
    NeedsData,
    /// The decoder's input queue is full.
    BufferFull,
    /// The decoder was torn down.
    Destroyed,
}

/// Player-wide state notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// Created and ready for its first seek.
    Initialized,
    /// Accepting samples after a seek, not yet presenting.
    Prerolling,
    /// Enough data decoded; frames are being presented.
    Presenting,
    /// Every stream reached its end of stream and presentation finished.
    EndOfStream,
    Destroyed,
    Error,
}

/// Point-in-time snapshot of the player's presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub current_media_time: Duration,
    pub duration: Option<Duration>,
    pub frame_width: u32,
    pub frame_height: u32,
    pub is_paused: bool,
    pub volume: f32,
    pub total_video_frames: u32,
    pub dropped_video_frames: u32,
    pub corrupted_video_frames: u32,
}

// ============================================================================
// Creation Parameters
// ============================================================================

/// Identifier of the DRM system samples are decrypted with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrmSystemId(String);

impl DrmSystemId {
    pub fn new(key_system: impl Into<String>) -> Self {
        Self(key_system.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Native audio stream description (a WAVEFORMATEX-style header).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioHeader {
    pub format_tag: u16,
    pub number_of_channels: u16,
    pub samples_per_second: u32,
    pub average_bytes_per_second: u32,
    pub block_alignment: u16,
    pub bits_per_sample: u16,
    pub audio_specific_config: Vec<u8>,
}

/// Everything a [`PlayerFactory`] needs to create a player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerCreateParams {
    /// `None` for audio-only media.
    pub video_codec: Option<VideoCodec>,
    pub audio_codec: AudioCodec,
    /// `None` when the duration is not known up front.
    pub duration_hint: Option<Duration>,
    pub drm_system: Option<DrmSystemId>,
    pub audio_header: AudioHeader,
}

// ============================================================================
// Sample Submission
// ============================================================================

/// Extra information attached to video samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSampleInfo {
    pub is_key_frame: bool,
    pub frame_width: u32,
    pub frame_height: u32,
}

/// A sample lent to the player by [`PlatformPlayer::write_sample`].
#[derive(Debug, Clone, Copy)]
pub struct SampleData<'a> {
    pub id: SampleId,
    pub data: &'a [u8],
    pub timestamp: Duration,
    pub video_info: Option<VideoSampleInfo>,
    pub drm_info: Option<&'a DecryptConfig>,
}

// ============================================================================
// Traits
// ============================================================================

/// Receiver of the player's asynchronous notifications.
///
/// Implemented by the pipeline. Methods may be called from any thread and
/// must not block.
pub trait PlayerEventSink: Send + Sync {
    fn on_decoder_status(&self, stream_type: StreamType, state: DecoderState, ticket: Ticket);

    fn on_player_status(&self, state: PlayerState, ticket: Ticket);

    /// The player no longer reads from the sample identified by `id`.
    fn on_deallocate_sample(&self, id: SampleId);
}

/// Opaque native decode+render object.
///
/// Control methods must not block on decoding; results are reported through
/// the [`PlayerEventSink`] given at creation.
pub trait PlatformPlayer: Send + Sync {
    fn write_sample(&self, stream_type: StreamType, sample: &SampleData<'_>);

    fn write_end_of_stream(&self, stream_type: StreamType);

    /// Flush decoders and restart presentation at `time`. Subsequent
    /// notifications carry `ticket`.
    fn seek(&self, time: Duration, ticket: Ticket);

    fn set_pause(&self, paused: bool);

    fn set_volume(&self, volume: f32);

    fn info(&self) -> PlayerInfo;

    /// Release native resources. No notifications follow.
    fn destroy(&self);
}

/// Creates platform players. Injected into the pipeline at construction.
pub trait PlayerFactory: Send + Sync {
    fn create(
        &self,
        params: PlayerCreateParams,
        events: Arc<dyn PlayerEventSink>,
    ) -> Result<Arc<dyn PlatformPlayer>>;
}
