//! Tree-aware selection-state engine for dropdown and combo-box widgets.
//!
//! `trellis-select` models everything a select widget does between input
//! and paint: a forest of options with group headers, tri-state selection
//! that propagates between groups and children, typeahead filtering with a
//! marked keyboard cursor, and an open/closed dropdown state machine. It
//! is render-agnostic; hosts feed it intents and observe signals.
//!
//! # Example
//!
//! ```
//! use trellis_select::{BoundValue, SelectBox, SelectConfig, SelectionValue};
//!
//! #[derive(Clone)]
//! struct City {
//!     name: String,
//!     country: String,
//! }
//!
//! let config = SelectConfig::new(
//!     |c: &City| c.name.clone(),
//!     |c: &City| c.name.clone(),
//! )
//! .with_multiple(true)
//! .with_group_by(|c: &City| Some(c.country.clone()))
//! .with_selectable_group(true);
//!
//! let mut select = SelectBox::new(config);
//! select
//!     .set_items(vec![
//!         City { name: "Vilnius".into(), country: "Lithuania".into() },
//!         City { name: "Kaunas".into(), country: "Lithuania".into() },
//!     ])
//!     .unwrap();
//!
//! select.open();
//! let lithuania = select.tree().roots()[0];
//! select.toggle(lithuania);
//! assert_eq!(
//!     select.value(),
//!     SelectionValue::Multiple(vec![
//!         BoundValue::Item("Vilnius".to_string()),
//!         BoundValue::Item("Kaunas".to_string()),
//!     ])
//! );
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod prelude;
pub mod search;
pub mod widget;

pub use config::SelectConfig;
pub use error::{Error, Result};
pub use model::{ItemsIndex, OptionId, OptionNode, OptionTree, Payload, SelectionModel};
pub use widget::{BoundValue, KeyIntent, SelectBox, SelectionValue};
