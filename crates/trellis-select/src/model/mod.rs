//! Option tree, items index, and selection model.

mod items_index;
mod option_tree;
mod selection;

pub use items_index::ItemsIndex;
pub use option_tree::{OptionId, OptionNode, OptionTree, Payload};
pub use selection::SelectionModel;
