//! Logging facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in the host application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every subsystem logs under its own target so hosts can filter with
//! `tracing` directives, e.g. `RUST_LOG=trellis_select::model=debug`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core plumbing target.
    pub const CORE: &str = "trellis_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "trellis_core::signal";
    /// Option tree and items index target.
    pub const MODEL: &str = "trellis_select::model";
    /// Selection propagation target.
    pub const SELECTION: &str = "trellis_select::model::selection";
    /// Dropdown state machine target.
    pub const WIDGET: &str = "trellis_select::widget";
}
