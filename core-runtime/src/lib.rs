//! # Core Runtime
//!
//! Ambient infrastructure shared by the pipeline crates:
//! - [`logging`]: `tracing-subscriber` initialisation and host log forwarding
//! - [`config`]: [`PipelineConfig`], the injected dependencies of a pipeline
//! - [`events`]: the media-log [`EventBus`]

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::{Error, Result};
pub use events::{EventBus, EventStream, MediaEvent};
