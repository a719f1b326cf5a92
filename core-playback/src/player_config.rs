//! Derives the platform player's creation parameters from the demuxer's
//! decoder configurations.

use std::time::Duration;

use bridge_traits::media::{AudioCodec, AudioDecoderConfig, VideoCodec, VideoDecoderConfig};
use bridge_traits::player::{AudioHeader, DrmSystemId, PlayerCreateParams};

use crate::error::{PlaybackError, Result};

/// `WAVE_FORMAT_MPEG_HEAAC`-style tag the player expects for compressed audio.
pub const AUDIO_FORMAT_TAG: u16 = 0x00ff;

/// Builds the native audio header for `config`.
///
/// Fails for codecs the demuxer could not identify and for layouts or sample
/// rates with nothing to describe.
pub fn audio_header(config: &AudioDecoderConfig) -> Result<AudioHeader> {
    if config.codec == AudioCodec::Unknown {
        return Err(PlaybackError::UnsupportedConfig(
            "unknown audio codec".to_string(),
        ));
    }

    let channels = config.channel_count();
    if channels == 0 {
        return Err(PlaybackError::UnsupportedConfig(format!(
            "channel layout {:?} has no channel count",
            config.channel_layout
        )));
    }

    if config.samples_per_second == 0 {
        return Err(PlaybackError::UnsupportedConfig(
            "audio sample rate is zero".to_string(),
        ));
    }

    let bytes_per_frame = u32::from(channels) * u32::from(config.bits_per_channel) / 8;
    let block_alignment = u16::try_from(bytes_per_frame).map_err(|_| {
        PlaybackError::UnsupportedConfig(format!(
            "block alignment {} does not fit the audio header",
            bytes_per_frame
        ))
    })?;

    Ok(AudioHeader {
        format_tag: AUDIO_FORMAT_TAG,
        number_of_channels: channels,
        samples_per_second: config.samples_per_second,
        average_bytes_per_second: config.samples_per_second.saturating_mul(bytes_per_frame),
        block_alignment,
        bits_per_sample: config.bits_per_channel,
        audio_specific_config: config.extra_data.clone(),
    })
}

/// Collects everything the player factory needs.
///
/// `video` is `None` for audio-only media.
pub fn create_params(
    audio: &AudioDecoderConfig,
    video: Option<&VideoDecoderConfig>,
    duration_hint: Option<Duration>,
    drm_system: Option<DrmSystemId>,
) -> Result<PlayerCreateParams> {
    let video_codec = match video {
        Some(config) if config.codec == VideoCodec::Unknown => {
            return Err(PlaybackError::UnsupportedConfig(
                "unknown video codec".to_string(),
            ))
        }
        Some(config) => Some(config.codec),
        None => None,
    };

    Ok(PlayerCreateParams {
        video_codec,
        audio_codec: audio.codec,
        duration_hint,
        drm_system,
        audio_header: audio_header(audio)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::media::{ChannelLayout, VideoSize};

    fn aac_stereo() -> AudioDecoderConfig {
        AudioDecoderConfig::new(AudioCodec::Aac, ChannelLayout::Stereo, 48_000, 16)
            .with_extra_data(vec![0x11, 0x90])
    }

    #[test]
    fn test_audio_header_for_aac_stereo() {
        let header = audio_header(&aac_stereo()).unwrap();

        assert_eq!(header.format_tag, 0x00ff);
        assert_eq!(header.number_of_channels, 2);
        assert_eq!(header.samples_per_second, 48_000);
        assert_eq!(header.bits_per_sample, 16);
        assert_eq!(header.block_alignment, 4);
        assert_eq!(header.average_bytes_per_second, 192_000);
        assert_eq!(header.audio_specific_config, vec![0x11, 0x90]);
    }

    #[test]
    fn test_unknown_codec_is_unsupported() {
        let config = AudioDecoderConfig::new(AudioCodec::Unknown, ChannelLayout::Stereo, 44_100, 16);
        assert!(matches!(
            audio_header(&config),
            Err(PlaybackError::UnsupportedConfig(_))
        ));
    }

    #[test]
    fn test_unsupported_layout_or_rate() {
        let layout = AudioDecoderConfig::new(AudioCodec::Aac, ChannelLayout::Unsupported, 44_100, 16);
        assert!(audio_header(&layout).is_err());

        let rate = AudioDecoderConfig::new(AudioCodec::Aac, ChannelLayout::Mono, 0, 16);
        assert!(audio_header(&rate).is_err());
    }

    #[test]
    fn test_create_params_audio_only() {
        let params = create_params(&aac_stereo(), None, None, None).unwrap();

        assert_eq!(params.video_codec, None);
        assert_eq!(params.audio_codec, AudioCodec::Aac);
        assert_eq!(params.duration_hint, None);
    }

    #[test]
    fn test_create_params_with_video() {
        let video = VideoDecoderConfig::new(
            VideoCodec::Vp9,
            VideoSize::new(1920, 1080),
            VideoSize::new(1920, 1080),
        );
        let params = create_params(
            &aac_stereo(),
            Some(&video),
            Some(Duration::from_secs(60)),
            Some(DrmSystemId::new("com.widevine.alpha")),
        )
        .unwrap();

        assert_eq!(params.video_codec, Some(VideoCodec::Vp9));
        assert_eq!(params.duration_hint, Some(Duration::from_secs(60)));
        assert!(params.drm_system.is_some());
    }

    #[test]
    fn test_unknown_video_codec_is_unsupported() {
        let video = VideoDecoderConfig::new(VideoCodec::Unknown, VideoSize::default(), VideoSize::default());
        assert!(create_params(&aac_stereo(), Some(&video), None, None).is_err());
    }
}
