//! Time-related re-exports.
//!
//! ```rust
//! use core_async::time::{sleep, timeout, Duration};
//!
//! # async fn example() {
//! let late = timeout(Duration::from_millis(5), sleep(Duration::from_secs(1))).await;
//! assert!(late.is_err());
//! # }
//! ```

pub use tokio::time::{sleep, timeout, Sleep, Timeout};

pub use std::time::{Duration, Instant};

/// Error returned by [`timeout`] when the deadline elapses.
pub type Elapsed = tokio::time::error::Elapsed;
