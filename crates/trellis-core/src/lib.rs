//! Core systems for Trellis.
//!
//! This crate provides the plumbing shared by Trellis widget-state crates:
//!
//! - **Signal System**: Type-safe change notification with explicit
//!   connection lifetimes
//! - **Logging**: `tracing` target constants for per-subsystem filtering
//!
//! # Signal Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use signal::{ConnectionId, Signal};
