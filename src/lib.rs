//! Workspace facade crate.
//!
//! Host applications can depend on `media-pipeline-workspace` alone and reach
//! the pipeline, its configuration and the platform traits it drives without
//! wiring each crate individually.

pub use bridge_traits;
pub use core_playback;
pub use core_runtime;

pub use bridge_traits::demuxer::{Demuxer, DemuxerHost, DemuxerStream, StreamReadResult};
pub use bridge_traits::player::{PlatformPlayer, PlayerEventSink, PlayerFactory};
pub use bridge_traits::status::{BufferingState, PipelineError, PipelineStatus};
pub use core_playback::{Pipeline, PipelineState, PipelineStatistics, StartCallbacks};
pub use core_runtime::config::{PipelineConfig, PipelineConfigBuilder};
pub use core_runtime::events::{EventBus, MediaEvent};
pub use core_runtime::logging::{init_logging, LoggingConfig};
