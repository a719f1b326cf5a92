//! Keeps submitted samples alive while the platform player reads them.
//!
//! A sample handed to [`PlatformPlayer::write_sample`] is lent by address.
//! The map holds a clone of its [`DecoderBuffer`] keyed by that address until
//! the player reports [`PlayerEventSink::on_deallocate_sample`], which is the
//! only path that releases it.
//!
//! Zero-length payloads all share one dangling address, so they cannot be told
//! apart. They are counted under that identity and each release drops one.
//!
//! [`PlatformPlayer::write_sample`]: bridge_traits::player::PlatformPlayer::write_sample
//! [`PlayerEventSink::on_deallocate_sample`]: bridge_traits::player::PlayerEventSink::on_deallocate_sample

use std::collections::HashMap;

use bridge_traits::media::DecoderBuffer;
use bridge_traits::player::SampleId;

use crate::error::{PlaybackError, Result};

#[derive(Debug)]
struct Retained {
    buffer: DecoderBuffer,
    holds: usize,
}

#[derive(Debug, Default)]
pub struct BufferRetentionMap {
    entries: HashMap<SampleId, Retained>,
}

impl BufferRetentionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds `buffer` until its identity is released.
    ///
    /// Fails with [`PlaybackError::DuplicateSample`] if the same non-empty
    /// payload is already held; the map is left unchanged.
    pub fn retain(&mut self, buffer: DecoderBuffer) -> Result<SampleId> {
        let id = SampleId::of(buffer.data());
        match self.entries.get_mut(&id) {
            Some(retained) if buffer.data().is_empty() => retained.holds += 1,
            Some(_) => return Err(PlaybackError::DuplicateSample(id)),
            None => {
                self.entries.insert(id, Retained { buffer, holds: 1 });
            }
        }
        Ok(id)
    }

    /// Drops one of the map's references to the sample identified by `id`.
    pub fn release(&mut self, id: SampleId) -> Result<DecoderBuffer> {
        let retained = self
            .entries
            .get_mut(&id)
            .ok_or(PlaybackError::UnknownSample(id))?;
        if retained.holds > 1 {
            retained.holds -= 1;
            return Ok(retained.buffer.clone());
        }
        self.entries
            .remove(&id)
            .map(|retained| retained.buffer)
            .ok_or(PlaybackError::UnknownSample(id))
    }

    pub fn contains(&self, id: SampleId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of outstanding holds.
    pub fn len(&self) -> usize {
        self.entries.values().map(|retained| retained.holds).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Releases everything. Only valid once the player is destroyed.
    pub fn clear(&mut self) -> usize {
        let released = self.len();
        self.entries.clear();
        released
    }
}
