//! # Media Playback Pipeline
//!
//! Drives a demuxer and an opaque platform player as one controllable
//! playback object.
//!
//! ## Overview
//!
//! - [`pipeline`]: the [`Pipeline`] handle and its serialized home task
//! - [`ticket`]: epoch counter invalidating notifications from superseded seeks
//! - [`scheduler`]: at most one outstanding demuxer read per stream
//! - [`retention`]: keeps submitted samples alive until the player releases them
//! - [`state`]: the explicit pipeline state machine
//! - [`ranges`], [`stats`]: buffered ranges and decode statistics
//! - [`player_config`]: player creation parameters from decoder configurations

pub mod error;
pub mod pipeline;
pub mod player_config;
pub mod ranges;
pub mod retention;
pub mod scheduler;
pub mod state;
pub mod stats;
pub mod ticket;

pub use error::{PlaybackError, Result};
pub use pipeline::{Pipeline, StartCallbacks};
pub use ranges::Ranges;
pub use state::PipelineState;
pub use stats::PipelineStatistics;
