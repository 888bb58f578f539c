//! Error types for the selection engine.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building or driving a selection model.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A grouping classifier was configured but no item produced a group
    /// key, so the grouped view would be empty.
    #[error("grouping produced no groups for {item_count} item(s)")]
    EmptyGrouping {
        /// Number of items that were offered to the classifier.
        item_count: usize,
    },
}

impl Error {
    /// Creates an [`Error::EmptyGrouping`] for the given item count.
    pub fn empty_grouping(item_count: usize) -> Self {
        Self::EmptyGrouping { item_count }
    }
}
