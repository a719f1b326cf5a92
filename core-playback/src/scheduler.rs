//! Per-stream read gate.
//!
//! Turns the player's "needs data" notifications into demuxer reads while
//! keeping at most one read outstanding per [`StreamType`]. Demand that
//! arrives while a read is outstanding is remembered, so it can be replayed
//! if the outstanding read turns out to belong to a superseded epoch.

use bridge_traits::media::StreamType;

/// What the caller should do with a "needs data" notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadDecision {
    /// Issue a demuxer read now; the slot is marked in flight.
    Issue,
    /// A read is already outstanding; the demand was recorded.
    Suppressed,
    /// The stream already delivered its end of stream.
    Exhausted,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ReadSlot {
    in_flight: bool,
    end_of_stream: bool,
    pending_demand: bool,
}

#[derive(Debug, Default)]
pub struct ReadScheduler {
    audio: ReadSlot,
    video: ReadSlot,
}

impl ReadScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, stream: StreamType) -> &ReadSlot {
        match stream {
            StreamType::Audio => &self.audio,
            StreamType::Video => &self.video,
        }
    }

    fn slot_mut(&mut self, stream: StreamType) -> &mut ReadSlot {
        match stream {
            StreamType::Audio => &mut self.audio,
            StreamType::Video => &mut self.video,
        }
    }

    /// Records demand for `stream` and decides whether to read.
    pub fn request(&mut self, stream: StreamType) -> ReadDecision {
        let slot = self.slot_mut(stream);
        if slot.end_of_stream {
            return ReadDecision::Exhausted;
        }
        if slot.in_flight {
            slot.pending_demand = true;
            return ReadDecision::Suppressed;
        }
        slot.in_flight = true;
        ReadDecision::Issue
    }

    /// The outstanding read for `stream` completed.
    ///
    /// Returns whether demand was suppressed while it was outstanding.
    pub fn complete(&mut self, stream: StreamType) -> bool {
        let slot = self.slot_mut(stream);
        debug_assert!(slot.in_flight, "{} read completed while none was in flight", stream);
        slot.in_flight = false;
        std::mem::take(&mut slot.pending_demand)
    }

    /// No further reads will be issued for `stream` until the next seek.
    pub fn mark_end_of_stream(&mut self, stream: StreamType) {
        self.slot_mut(stream).end_of_stream = true;
    }

    /// A seek started a new epoch: forget end-of-stream and stale demand.
    /// Reads still outstanding stay in flight until they complete.
    pub fn reset(&mut self) {
        for stream in StreamType::ALL {
            let slot = self.slot_mut(stream);
            slot.end_of_stream = false;
            slot.pending_demand = false;
        }
    }

    pub fn is_in_flight(&self, stream: StreamType) -> bool {
        self.slot(stream).in_flight
    }

    pub fn is_end_of_stream(&self, stream: StreamType) -> bool {
        self.slot(stream).end_of_stream
    }
}
