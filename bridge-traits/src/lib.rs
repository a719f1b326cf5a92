//! # Media Bridge Traits
//!
//! Contracts between the playback pipeline and the components it drives but
//! does not own.
//!
//! ## Traits
//!
//! ### Media collaborators
//! - [`Demuxer`](demuxer::Demuxer) / [`DemuxerStream`](demuxer::DemuxerStream) - Container
//!   parsing and per-stream sample reads
//! - [`DemuxerHost`](demuxer::DemuxerHost) - Data-source progress reported back by the demuxer
//! - [`PlatformPlayer`](player::PlatformPlayer) - Opaque native decode+render object
//! - [`PlayerFactory`](player::PlayerFactory) - Creates players; injected at pipeline construction
//! - [`PlayerEventSink`](player::PlayerEventSink) - Player notifications (decoder status,
//!   player status, sample deallocation)
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Thread Safety
//!
//! Every trait requires `Send + Sync`. Collaborators may call back from any
//! thread; the pipeline marshals those calls onto its own serialized task.
//!
//! ## Error Handling
//!
//! Asynchronous media operations report a [`PipelineStatus`](status::PipelineStatus).
//! Synchronous collaborator failures (player creation, logger sinks) use
//! [`BridgeError`](error::BridgeError).

pub mod demuxer;
pub mod error;
pub mod logging;
pub mod media;
pub mod player;
pub mod status;

pub use error::BridgeError;

// Re-export commonly used types
pub use demuxer::{Demuxer, DemuxerHost, DemuxerStream, StreamReadResult};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{
    AudioCodec, AudioDecoderConfig, ChannelLayout, DecoderBuffer, DecryptConfig, StreamType,
    SubsampleEntry, VideoCodec, VideoDecoderConfig, VideoSize,
};
pub use player::{
    AudioHeader, DecoderState, DrmSystemId, PlatformPlayer, PlayerCreateParams, PlayerEventSink,
    PlayerFactory, PlayerInfo, PlayerState, SampleData, SampleId, Ticket, VideoSampleInfo,
};
pub use status::{BufferingState, PipelineError, PipelineStatus};
