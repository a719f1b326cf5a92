//! Epoch counter used to invalidate notifications from superseded seeks.

use bridge_traits::player::Ticket;

use crate::error::{PlaybackError, Result};

/// Monotonic ticket owned by the pipeline's home task.
///
/// Every request that may complete asynchronously is stamped with
/// [`TicketCounter::current`]; a completion is acted upon only if
/// [`TicketCounter::check`] still accepts its stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketCounter {
    current: Ticket,
}

impl Default for TicketCounter {
    fn default() -> Self {
        Self {
            current: Ticket::INITIAL,
        }
    }
}

impl TicketCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Ticket {
        self.current
    }

    /// Starts a new epoch and returns its ticket.
    pub fn bump(&mut self) -> Ticket {
        self.current = self.current.next();
        self.current
    }

    /// Accepts `received` only if it matches the current epoch.
    pub fn check(&self, received: Ticket) -> Result<()> {
        if received == self.current {
            Ok(())
        } else {
            Err(PlaybackError::StaleTicket {
                expected: self.current,
                received,
            })
        }
    }
}
