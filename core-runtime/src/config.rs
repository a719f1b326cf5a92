//! # Pipeline Configuration
//!
//! Everything a pipeline needs from its embedder, gathered by a builder that
//! fails fast when a required capability is missing.
//!
//! ## Required Dependencies
//!
//! - `PlayerFactory` - creates the platform player once stream metadata is
//!   known. There is no process-wide default; every pipeline gets its own.
//!
//! ## Optional Settings
//!
//! - `EventBus` - media log receiving [`MediaEvent`](crate::events::MediaEvent)s
//! - `DrmSystemId` - key system samples are decrypted with
//! - duration hint forwarded to player creation
//! - accepted playback rates (default `[0.0, 1.0]`)
//! - initial volume (default `1.0`)
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::PipelineConfig;
//! use std::sync::Arc;
//!
//! let config = PipelineConfig::builder()
//!     .player_factory(Arc::new(MyPlayerFactory))
//!     .initial_volume(0.5)
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! A missing factory is reported as [`Error::CapabilityMissing`]; an invalid
//! setting as [`Error::Config`].

use crate::error::{Error, Result};
use crate::events::EventBus;
use bridge_traits::player::{DrmSystemId, PlayerFactory};
use std::sync::Arc;
use std::time::Duration;

/// Playback rates accepted when none are configured: paused and normal speed.
pub const DEFAULT_PLAYBACK_RATES: [f32; 2] = [0.0, 1.0];

/// Volume a pipeline starts with when none is configured.
pub const DEFAULT_VOLUME: f32 = 1.0;

/// Injected dependencies and settings of one pipeline.
///
/// Use [`PipelineConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct PipelineConfig {
    /// Creates the platform player (required)
    pub player_factory: Arc<dyn PlayerFactory>,

    /// Media log receiving pipeline milestones (optional)
    pub media_log: Option<Arc<EventBus>>,

    /// Key system forwarded to player creation
    pub drm_system: Option<DrmSystemId>,

    /// Duration forwarded to player creation; `None` when unknown
    pub duration_hint: Option<Duration>,

    /// Exact rates `set_playback_rate` accepts
    pub supported_playback_rates: Vec<f32>,

    /// Volume before the first `set_volume`, in `[0.0, 1.0]`
    pub initial_volume: f32,
}

impl std::fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("player_factory", &"PlayerFactory { ... }")
            .field("media_log", &self.media_log)
            .field("drm_system", &self.drm_system)
            .field("duration_hint", &self.duration_hint)
            .field("supported_playback_rates", &self.supported_playback_rates)
            .field("initial_volume", &self.initial_volume)
            .finish()
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Checks that:
    /// - at least one playback rate is accepted
    /// - every rate is finite and non-negative
    /// - the initial volume lies in `[0.0, 1.0]`
    pub fn validate(&self) -> Result<()> {
        if self.supported_playback_rates.is_empty() {
            return Err(Error::Config(
                "At least one playback rate must be supported".to_string(),
            ));
        }

        if let Some(rate) = self
            .supported_playback_rates
            .iter()
            .find(|rate| !rate.is_finite() || **rate < 0.0)
        {
            return Err(Error::Config(format!(
                "Playback rate {} is not a finite, non-negative number",
                rate
            )));
        }

        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(Error::Config(format!(
                "Initial volume {} is outside [0.0, 1.0]",
                self.initial_volume
            )));
        }

        Ok(())
    }

    /// Whether `rate` is one of the accepted playback rates.
    pub fn accepts_playback_rate(&self, rate: f32) -> bool {
        self.supported_playback_rates.contains(&rate)
    }

    /// Emit `event` into the media log, if one is configured.
    pub fn log_event(&self, event: crate::events::MediaEvent) {
        if let Some(bus) = &self.media_log {
            // No subscribers is fine.
            let _ = bus.emit(event);
        }
    }
}

fn player_factory_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "PlayerFactory".to_string(),
        message: "A PlayerFactory is required to create the platform player. \
                 Inject the platform's decode/render backend with .player_factory()."
            .to_string(),
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Default)]
pub struct PipelineConfigBuilder {
    player_factory: Option<Arc<dyn PlayerFactory>>,
    media_log: Option<Arc<EventBus>>,
    drm_system: Option<DrmSystemId>,
    duration_hint: Option<Duration>,
    supported_playback_rates: Option<Vec<f32>>,
    initial_volume: Option<f32>,
}

impl PipelineConfigBuilder {
    /// Sets the platform player factory (required).
    pub fn player_factory(mut self, factory: Arc<dyn PlayerFactory>) -> Self {
        self.player_factory = Some(factory);
        self
    }

    pub fn media_log(mut self, bus: Arc<EventBus>) -> Self {
        self.media_log = Some(bus);
        self
    }

    pub fn drm_system(mut self, drm_system: DrmSystemId) -> Self {
        self.drm_system = Some(drm_system);
        self
    }

    pub fn duration_hint(mut self, duration: Duration) -> Self {
        self.duration_hint = Some(duration);
        self
    }

    /// Replaces the accepted playback rates. Rates are matched exactly.
    pub fn supported_playback_rates(mut self, rates: impl Into<Vec<f32>>) -> Self {
        self.supported_playback_rates = Some(rates.into());
        self
    }

    pub fn initial_volume(mut self, volume: f32) -> Self {
        self.initial_volume = Some(volume);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] without a player factory
    /// - [`Error::Config`] when a setting fails [`PipelineConfig::validate`]
    pub fn build(self) -> Result<PipelineConfig> {
        let player_factory = self
            .player_factory
            .ok_or_else(player_factory_missing_error)?;

        let config = PipelineConfig {
            player_factory,
            media_log: self.media_log,
            drm_system: self.drm_system,
            duration_hint: self.duration_hint,
            supported_playback_rates: self
                .supported_playback_rates
                .unwrap_or_else(|| DEFAULT_PLAYBACK_RATES.to_vec()),
            initial_volume: self.initial_volume.unwrap_or(DEFAULT_VOLUME),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MediaEvent;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::player::{PlatformPlayer, PlayerCreateParams, PlayerEventSink};

    struct UnavailableFactory;

    impl PlayerFactory for UnavailableFactory {
        fn create(
            &self,
            _params: PlayerCreateParams,
            _events: Arc<dyn PlayerEventSink>,
        ) -> BridgeResult<Arc<dyn PlatformPlayer>> {
            Err(BridgeError::NotAvailable("test factory".to_string()))
        }
    }

    fn builder() -> PipelineConfigBuilder {
        PipelineConfig::builder().player_factory(Arc::new(UnavailableFactory))
    }

    #[test]
    fn test_builder_requires_player_factory() {
        let result = PipelineConfig::builder().build();

        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "PlayerFactory")
            }
            other => panic!("expected CapabilityMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_defaults() {
        let config = builder().build().unwrap();

        assert_eq!(config.supported_playback_rates, vec![0.0, 1.0]);
        assert_eq!(config.initial_volume, 1.0);
        assert!(config.media_log.is_none());
        assert!(config.drm_system.is_none());
        assert!(config.duration_hint.is_none());
    }

    #[test]
    fn test_builder_settings() {
        let config = builder()
            .drm_system(DrmSystemId::new("com.widevine.alpha"))
            .duration_hint(Duration::from_secs(90))
            .supported_playback_rates(vec![0.0, 0.5, 1.0, 2.0])
            .initial_volume(0.25)
            .build()
            .unwrap();

        assert_eq!(
            config.drm_system.as_ref().map(DrmSystemId::as_str),
            Some("com.widevine.alpha")
        );
        assert_eq!(config.duration_hint, Some(Duration::from_secs(90)));
        assert!(config.accepts_playback_rate(2.0));
        assert!(!config.accepts_playback_rate(1.5));
        assert_eq!(config.initial_volume, 0.25);
    }

    #[test]
    fn test_rejects_empty_rates() {
        let result = builder().supported_playback_rates(Vec::new()).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_negative_or_nan_rates() {
        assert!(builder()
            .supported_playback_rates(vec![1.0, -1.0])
            .build()
            .is_err());
        assert!(builder()
            .supported_playback_rates(vec![f32::NAN])
            .build()
            .is_err());
    }

    #[test]
    fn test_rejects_out_of_range_volume() {
        let err = builder().initial_volume(1.5).build().unwrap_err();
        assert!(err.to_string().contains("outside [0.0, 1.0]"));
    }

    #[tokio::test]
    async fn test_log_event_reaches_media_log() {
        let bus = Arc::new(EventBus::new(8));
        let mut receiver = bus.subscribe();
        let config = builder().media_log(bus).build().unwrap();

        config.log_event(MediaEvent::Ended);

        assert_eq!(receiver.recv().await.unwrap(), MediaEvent::Ended);
    }

    #[test]
    fn test_log_event_without_media_log_is_noop() {
        let config = builder().build().unwrap();
        config.log_event(MediaEvent::Stopped);
    }
}
