//! Convenience re-exports for typical hosts.
//!
//! ```
//! use trellis_select::prelude::*;
//! ```

pub use trellis_core::{ConnectionId, Signal};

pub use crate::config::SelectConfig;
pub use crate::error::{Error, Result};
pub use crate::model::{ItemsIndex, OptionId, OptionNode, OptionTree, Payload, SelectionModel};
pub use crate::widget::{BoundValue, KeyIntent, SelectBox, SelectionValue};
