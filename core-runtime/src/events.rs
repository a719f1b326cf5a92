//! # Media Log
//!
//! Broadcast channel carrying the pipeline's observable milestones
//! ([`MediaEvent`]) to any number of listeners, using
//! `tokio::sync::broadcast` through `core-async`.
//!
//! The pipeline emits into an optional [`EventBus`] supplied through its
//! configuration. Emitting with nobody listening is not an error for the
//! pipeline; the send result is simply discarded.
//!
//! ```text
//!                       emit        ┌───────────┐    subscribe   ┌────────────┐
//!  Pipeline home task ─────────────>│ EventBus  ├───────────────>│ media log  │
//!                                   │(broadcast)│                └────────────┘
//!                                   │           ├───────────────>┌────────────┐
//!                                   └───────────┘                │ test probe │
//!                                                                └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, MediaEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(32);
//! let mut log = bus.subscribe();
//!
//! bus.emit(MediaEvent::Ended).ok();
//! assert_eq!(log.recv().await.unwrap(), MediaEvent::Ended);
//! # }
//! ```

use bridge_traits::player::Ticket;
use bridge_traits::status::{BufferingState, PipelineError};
use core_async::sync::broadcast::{self, error::RecvError, error::SendError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub use core_async::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that fall further behind receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Milestones of a pipeline's life, in the order the home task observes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum MediaEvent {
    /// The pipeline's state machine moved.
    StateChanged { from: String, to: String },
    /// A new epoch began; notifications stamped with older tickets are ignored.
    TicketAdvanced { ticket: Ticket },
    /// A caller asked to reposition playback.
    SeekRequested { time: Duration },
    BufferingStateChanged(BufferingState),
    DurationChanged(Duration),
    /// Presentation reached the end of every stream.
    Ended,
    /// A terminal failure was surfaced to the caller.
    Error(PipelineError),
    /// The demuxer confirmed it is stopped.
    Stopped,
}

impl MediaEvent {
    /// Short description for log lines.
    pub fn description(&self) -> &'static str {
        match self {
            MediaEvent::StateChanged { .. } => "Pipeline state changed",
            MediaEvent::TicketAdvanced { .. } => "Ticket advanced",
            MediaEvent::SeekRequested { .. } => "Seek requested",
            MediaEvent::BufferingStateChanged(_) => "Buffering state changed",
            MediaEvent::DurationChanged(_) => "Duration changed",
            MediaEvent::Ended => "Playback ended",
            MediaEvent::Error(_) => "Pipeline error",
            MediaEvent::Stopped => "Pipeline stopped",
        }
    }

    pub fn severity(&self) -> EventSeverity {
        match self {
            MediaEvent::Error(_) => EventSeverity::Error,
            MediaEvent::Ended | MediaEvent::Stopped | MediaEvent::StateChanged { .. } => {
                EventSeverity::Info
            }
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Broadcast bus for [`MediaEvent`]s. Cloning shares the channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<MediaEvent>,
}

impl EventBus {
    /// Creates a bus buffering at most `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// when there are none.
    pub fn emit(&self, event: MediaEvent) -> Result<usize, SendError<MediaEvent>> {
        self.sender.send(event)
    }

    /// Creates a subscriber receiving every event emitted from now on.
    pub fn subscribe(&self) -> Receiver<MediaEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

type EventFilter = Box<dyn Fn(&MediaEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with an optional predicate.
///
/// ```rust
/// use core_runtime::events::{EventBus, EventSeverity, EventStream};
///
/// let bus = EventBus::default();
/// let errors = EventStream::new(bus.subscribe())
///     .filter(|event| event.severity() >= EventSeverity::Error);
/// ```
pub struct EventStream {
    receiver: Receiver<MediaEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<MediaEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by [`EventStream::recv`].
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&MediaEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event passing the filter.
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` if the subscriber fell behind by `n` events,
    /// `RecvError::Closed` once every sender is gone.
    pub async fn recv(&mut self) -> Result<MediaEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Non-blocking variant of [`EventStream::recv`]; `None` when nothing
    /// matching is queued.
    pub fn try_recv(&mut self) -> Option<Result<MediaEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }

    fn accepts(&self, event: &MediaEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
