//! Synchronization primitives.
//!
//! Only async-aware channel types live here. Plain data guarded for
//! cross-thread reads uses `parking_lot` in the crates that own it.
//!
//! `mpsc::WeakUnboundedSender` is re-exported because callback handles given
//! to collaborators must not keep a task queue alive on their own.

pub use tokio::sync::{broadcast, mpsc, oneshot, Notify};
