//! Trailing-edge debouncing for callbacks
//!
//! This crate provides:
//! - [`Debouncer`]: wraps a callback and a delay, coalescing rapid repeated
//!   invocations into one eventual call with the latest arguments
//! - `clear` / `flush` / `pending` control over the single in-flight timer
//!
//! Scheduling rides on the Tokio timer: each invocation (re)arms a spawned
//! task that sleeps for the delay and then delivers the most recent value.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use debounce::debounce;
//!
//! # async fn demo() {
//! let saver = debounce(
//!     |_, name: String| println!("saving {name}"),
//!     Duration::from_millis(250),
//! );
//!
//! saver.call("draft-1".into());
//! saver.call("draft-2".into()); // supersedes draft-1; only draft-2 is saved
//! # }
//! ```

pub mod debouncer;

// Re-exports
pub use debouncer::{debounce, Debouncer};
