//! # Playback Pipeline
//!
//! Turns a [`Demuxer`] and a platform player into a controllable
//! "play this media" object.
//!
//! ## Threading
//!
//! A [`Pipeline`] is a cheap, cloneable handle. Construction spawns one home
//! task that owns all mutable playback state; `start`, `seek`, `stop` and
//! every demuxer or player notification are queued to it and handled one at
//! a time, in order. Their outcome is observed only through callbacks.
//!
//! Getters (`media_time`, `volume`, `statistics`, ...) read a snapshot kept
//! under a single lock and may be called from any thread.
//!
//! ## Cancellation
//!
//! Every seek advances a ticket. Reads and player notifications stamped with
//! an older ticket are ignored on arrival instead of being cancelled.
//!
//! ## Usage
//!
//! ```ignore
//! use core_playback::pipeline::{Pipeline, StartCallbacks};
//! use core_runtime::config::PipelineConfig;
//!
//! let pipeline = Pipeline::new(PipelineConfig::builder().player_factory(factory).build()?)?;
//!
//! pipeline.start(
//!     demuxer,
//!     StartCallbacks::new(|status| println!("ready: {:?}", status))
//!         .on_ended(|_| println!("done"))
//!         .on_error(|status| eprintln!("failed: {:?}", status)),
//! );
//! pipeline.set_playback_rate(1.0);
//! ```

mod callbacks;
mod command;
mod dispatch;
mod home;

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::demuxer::Demuxer;
use bridge_traits::media::VideoSize;
use bridge_traits::player::{PlatformPlayer, Ticket};
use bridge_traits::status::PipelineStatus;
use core_async::runtime::Handle;
use core_async::sync::{mpsc, oneshot};
use core_runtime::config::PipelineConfig;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{PlaybackError, Result};
use crate::ranges::Ranges;
use crate::state::PipelineState;
use crate::stats::PipelineStatistics;

pub use callbacks::{
    BufferingStateCallback, DurationChangeCallback, SeekCallback, StartCallbacks, StatusCallback,
    StopCallback,
};

use self::command::Command;
use self::home::PipelineCore;

/// Snapshot readable from any thread. Written by the home task, except for
/// the caller-set volume and playback rate.
pub(crate) struct Shared {
    state: PipelineState,
    ticket: Ticket,
    has_audio: bool,
    has_video: bool,
    playback_rate: f32,
    volume: f32,
    /// Target of the unresolved seek, if any.
    seek_time: Option<Duration>,
    player: Option<Arc<dyn PlatformPlayer>>,
    duration: Duration,
    total_bytes: u64,
    buffered_byte_ranges: Ranges<u64>,
    buffered_time_ranges: Ranges<Duration>,
    natural_size: VideoSize,
    did_loading_progress: bool,
    statistics: PipelineStatistics,
}

impl Shared {
    fn new(volume: f32) -> Self {
        Self {
            state: PipelineState::Created,
            ticket: Ticket::INITIAL,
            has_audio: false,
            has_video: false,
            // Paused until the caller picks a rate.
            playback_rate: 0.0,
            volume,
            seek_time: None,
            player: None,
            duration: Duration::ZERO,
            total_bytes: 0,
            buffered_byte_ranges: Ranges::new(),
            buffered_time_ranges: Ranges::new(),
            natural_size: VideoSize::default(),
            did_loading_progress: false,
            statistics: PipelineStatistics::default(),
        }
    }
}

/// Handle to a playback pipeline.
///
/// Clones share the same pipeline. The home task exits once every handle is
/// dropped, destroying the platform player if `stop` was never called.
#[derive(Clone)]
pub struct Pipeline {
    commands: mpsc::UnboundedSender<Command>,
    shared: Arc<Mutex<Shared>>,
    supported_playback_rates: Arc<[f32]>,
}

impl Pipeline {
    /// Creates a pipeline and spawns its home task on the current runtime.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NoRuntime`] when called outside a Tokio runtime.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| PlaybackError::NoRuntime(e.to_string()))?;

        let (commands, receiver) = mpsc::unbounded_channel();
        let shared = Arc::new(Mutex::new(Shared::new(config.initial_volume)));
        let supported_playback_rates: Arc<[f32]> = config.supported_playback_rates.clone().into();

        let core = PipelineCore::new(config, Arc::clone(&shared), commands.downgrade());
        runtime.spawn(core.run(receiver));

        Ok(Self {
            commands,
            shared,
            supported_playback_rates,
        })
    }

    // ------------------------------------------------------------------------
    // Control
    // ------------------------------------------------------------------------

    /// Attaches `demuxer` and begins playback setup.
    ///
    /// The player is created once the demuxer reports its streams; the seek
    /// callback in `callbacks` resolves when the initial preroll completes.
    /// Failures surface through the error callback. Calling `start` twice
    /// reports [`PipelineError::InvalidState`](bridge_traits::PipelineError)
    /// through the second call's error callback.
    pub fn start(&self, demuxer: Arc<dyn Demuxer>, callbacks: StartCallbacks) {
        self.post(Command::Start { demuxer, callbacks });
    }

    /// Repositions playback at `time`.
    ///
    /// `callback` resolves with `Ok` once the player presents again, with the
    /// demuxer's error if repositioning fails, or with `InvalidState` if
    /// another seek is unresolved or no player exists yet.
    pub fn seek<F>(&self, time: Duration, callback: F)
    where
        F: FnOnce(PipelineStatus) + Send + 'static,
    {
        self.post(Command::Seek {
            time,
            callback: Box::new(callback),
        });
    }

    /// Destroys the player and stops the demuxer.
    ///
    /// Each call resolves `callback` exactly once, after the demuxer confirms
    /// it stopped. An unresolved seek is abandoned and never resolves.
    pub fn stop<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.post(Command::Stop {
            callback: Box::new(callback),
        });
    }

    /// Sets the playback rate. Rates outside the configured set are ignored.
    pub fn set_playback_rate(&self, rate: f32) {
        if !self.supported_playback_rates.contains(&rate) {
            debug!(rate, "Ignoring unsupported playback rate");
            return;
        }
        self.shared.lock().playback_rate = rate;
        self.post(Command::SetPlaybackRate(rate));
    }

    pub fn playback_rate(&self) -> f32 {
        self.shared.lock().playback_rate
    }

    /// Sets the volume. Values outside `[0.0, 1.0]` are ignored.
    pub fn set_volume(&self, volume: f32) {
        if !(0.0..=1.0).contains(&volume) {
            debug!(volume, "Ignoring out-of-range volume");
            return;
        }
        self.shared.lock().volume = volume;
        self.post(Command::SetVolume(volume));
    }

    pub fn volume(&self) -> f32 {
        self.shared.lock().volume
    }

    /// Resolves once every command queued before it has been handled.
    pub async fn barrier(&self) {
        let (done, handled) = oneshot::channel();
        if self.commands.send(Command::Barrier(done)).is_ok() {
            let _ = handled.await;
        }
    }

    // ------------------------------------------------------------------------
    // Thread-safe queries
    // ------------------------------------------------------------------------

    pub fn has_audio(&self) -> bool {
        self.shared.lock().has_audio
    }

    pub fn has_video(&self) -> bool {
        self.shared.lock().has_video
    }

    /// Current presentation time.
    ///
    /// Zero without a player; the target of the unresolved seek while one is
    /// pending; otherwise the player's position.
    pub fn media_time(&self) -> Duration {
        let shared = self.shared.lock();
        match (&shared.player, shared.seek_time) {
            (None, _) => Duration::ZERO,
            (Some(_), Some(seek_time)) => seek_time,
            // The lock keeps the player from being destroyed underneath us.
            (Some(player), None) => player.info().current_media_time,
        }
    }

    /// Buffered media time.
    ///
    /// Explicit time ranges reported by the demuxer, plus byte ranges
    /// converted to time proportionally once both the duration and the total
    /// size are known.
    pub fn buffered_time_ranges(&self) -> Ranges<Duration> {
        let shared = self.shared.lock();
        let mut ranges = shared.buffered_time_ranges.clone();

        if shared.duration.is_zero() || shared.total_bytes == 0 {
            return ranges;
        }

        for (start, end) in shared.buffered_byte_ranges.iter() {
            let start = time_for_byte_offset(start, shared.duration, shared.total_bytes);
            let end = time_for_byte_offset(end, shared.duration, shared.total_bytes)
                .min(shared.duration);
            ranges.add(start, end);
        }
        ranges
    }

    pub fn media_duration(&self) -> Duration {
        self.shared.lock().duration
    }

    pub fn total_bytes(&self) -> u64 {
        self.shared.lock().total_bytes
    }

    pub fn natural_video_size(&self) -> VideoSize {
        self.shared.lock().natural_size
    }

    /// Whether buffered ranges grew since the previous call.
    pub fn did_loading_progress(&self) -> bool {
        std::mem::take(&mut self.shared.lock().did_loading_progress)
    }

    pub fn statistics(&self) -> PipelineStatistics {
        let shared = self.shared.lock();
        let mut statistics = shared.statistics;
        if let Some(player) = &shared.player {
            statistics.video_frames_dropped = player.info().dropped_video_frames;
        }
        statistics
    }

    pub fn state(&self) -> PipelineState {
        self.shared.lock().state
    }

    /// The epoch requests are currently stamped with.
    pub fn current_ticket(&self) -> Ticket {
        self.shared.lock().ticket
    }

    fn post(&self, command: Command) {
        if let Err(mpsc::error::SendError(command)) = self.commands.send(command) {
            warn!(command = command.name(), "Pipeline task is gone");
            command.reject();
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.shared.lock();
        f.debug_struct("Pipeline")
            .field("state", &shared.state)
            .field("ticket", &shared.ticket)
            .field("has_audio", &shared.has_audio)
            .field("has_video", &shared.has_video)
            .finish_non_exhaustive()
    }
}

fn time_for_byte_offset(offset: u64, duration: Duration, total_bytes: u64) -> Duration {
    let nanos = duration.as_nanos() * u128::from(offset) / u128::from(total_bytes);
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}
