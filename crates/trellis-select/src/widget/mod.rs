//! Render-agnostic widget state engines.

mod select_box;

pub use select_box::{BoundValue, KeyIntent, SelectBox, SelectionValue};
