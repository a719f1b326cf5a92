//! Completion callbacks handed to the pipeline by its caller.
//!
//! Every callback runs on the pipeline's home task and must return quickly.

use std::sync::Arc;

use bridge_traits::status::{BufferingState, PipelineStatus};

/// Persistent callback receiving a status (`ended`, `error`).
pub type StatusCallback = Arc<dyn Fn(PipelineStatus) + Send + Sync>;

/// Single-shot callback resolving a seek (or the initial preroll of `start`).
pub type SeekCallback = Box<dyn FnOnce(PipelineStatus) + Send>;

pub type BufferingStateCallback = Arc<dyn Fn(BufferingState) + Send + Sync>;

/// Invoked after the media duration changed; read it with
/// `Pipeline::media_duration`.
pub type DurationChangeCallback = Arc<dyn Fn() + Send + Sync>;

pub type StopCallback = Box<dyn FnOnce() + Send>;

/// Callbacks registered by `Pipeline::start`.
///
/// Only the seek callback is mandatory; the others default to no-ops.
///
/// ```rust
/// use core_playback::pipeline::StartCallbacks;
///
/// let callbacks = StartCallbacks::new(|status| println!("prerolled: {:?}", status))
///     .on_ended(|_| println!("ended"))
///     .on_error(|status| eprintln!("playback failed: {:?}", status));
/// ```
pub struct StartCallbacks {
    pub(crate) ended: StatusCallback,
    pub(crate) error: StatusCallback,
    pub(crate) seek: SeekCallback,
    pub(crate) buffering_state: BufferingStateCallback,
    pub(crate) duration_change: DurationChangeCallback,
}

impl StartCallbacks {
    /// `seek` resolves once the initial preroll completes.
    pub fn new<F>(seek: F) -> Self
    where
        F: FnOnce(PipelineStatus) + Send + 'static,
    {
        Self {
            ended: Arc::new(|_| {}),
            error: Arc::new(|_| {}),
            seek: Box::new(seek),
            buffering_state: Arc::new(|_| {}),
            duration_change: Arc::new(|| {}),
        }
    }

    pub fn on_ended<F>(mut self, ended: F) -> Self
    where
        F: Fn(PipelineStatus) + Send + Sync + 'static,
    {
        self.ended = Arc::new(ended);
        self
    }

    pub fn on_error<F>(mut self, error: F) -> Self
    where
        F: Fn(PipelineStatus) + Send + Sync + 'static,
    {
        self.error = Arc::new(error);
        self
    }

    pub fn on_buffering_state<F>(mut self, buffering_state: F) -> Self
    where
        F: Fn(BufferingState) + Send + Sync + 'static,
    {
        self.buffering_state = Arc::new(buffering_state);
        self
    }

    pub fn on_duration_change<F>(mut self, duration_change: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.duration_change = Arc::new(duration_change);
        self
    }
}

impl std::fmt::Debug for StartCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartCallbacks").finish_non_exhaustive()
    }
}
