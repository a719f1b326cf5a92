//! Runtime abstraction layer for the media pipeline crates.
//!
//! Every crate in the workspace reaches the async runtime through this crate
//! instead of naming Tokio directly, so the executor stays swappable in one
//! place.
//!
//! # Modules
//!
//! - `task`: Task spawning
//! - `time`: Sleep, timeouts, durations
//! - `sync`: Channels used to marshal work onto a serialized task
//! - `runtime`: Blocking bridge for synchronous callers
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::mpsc;
//! use core_async::task;
//!
//! # async fn example() {
//! let (tx, mut rx) = mpsc::unbounded_channel::<u32>();
//! task::spawn(async move {
//!     tx.send(7).ok();
//! });
//! assert_eq!(rx.recv().await, Some(7));
//! # }
//! ```

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};
