//! Decode statistics exposed through `Pipeline::statistics`.

use bridge_traits::media::StreamType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStatistics {
    pub audio_bytes_decoded: u64,
    pub video_bytes_decoded: u64,
    pub video_frames_decoded: u32,
    /// Reported by the platform player at query time.
    pub video_frames_dropped: u32,
}

impl PipelineStatistics {
    /// Accounts for one sample handed to the player.
    pub fn record_submission(&mut self, stream: StreamType, bytes: usize) {
        let bytes = bytes as u64;
        match stream {
            StreamType::Audio => self.audio_bytes_decoded += bytes,
            StreamType::Video => {
                self.video_bytes_decoded += bytes;
                self.video_frames_decoded += 1;
            }
        }
    }
}
