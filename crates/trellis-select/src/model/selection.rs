//! Selection state and tri-state propagation.
//!
//! [`SelectionModel`] owns the ordered selected sequence and keeps the
//! `selected`/`indeterminate` flags on the option tree consistent with it.
//! It is deliberately unaware of the dropdown state machine; the widget
//! layer decides when selection operations fire.

use std::collections::HashSet;

use trellis_core::logging::targets;

use crate::model::option_tree::{OptionId, OptionTree};

/// Ordered selection over an [`OptionTree`].
///
/// The sequence preserves selection order and never contains duplicates.
/// In single-select mode, selecting replaces the previous selection.
#[derive(Default)]
pub struct SelectionModel {
    selected: Vec<OptionId>,
}

impl SelectionModel {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected node IDs in selection order.
    pub fn value(&self) -> &[OptionId] {
        &self.selected
    }

    /// The most recently selected node.
    pub fn last(&self) -> Option<OptionId> {
        self.selected.last().copied()
    }

    /// Whether `id` is in the selected sequence.
    pub fn is_selected(&self, id: OptionId) -> bool {
        self.selected.contains(&id)
    }

    /// Number of selected entries.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selects `id`, propagating flags through the tree.
    ///
    /// - Leaf with a parent (multi-select): the parent becomes selected
    ///   when every enabled child is, indeterminate when only some are.
    /// - Group (multi-select): every enabled child becomes selected.
    ///   Children already selected individually are removed from the
    ///   sequence first, then re-added in tree order, unless
    ///   `group_as_model` binds the group itself.
    /// - Single-select: any previous selection is cleared first.
    ///
    /// Stale IDs are ignored.
    pub fn select<T>(
        &mut self,
        tree: &mut OptionTree<T>,
        id: OptionId,
        multiple: bool,
        group_as_model: bool,
    ) {
        if !tree.contains(id) {
            return;
        }
        if !multiple {
            self.clear_selected(tree);
        }

        tree[id].selected = true;
        let children = tree[id].children.clone();
        if group_as_model || children.is_empty() {
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }

        if multiple {
            if let Some(parent) = tree[id].parent {
                Self::recompute_group(tree, parent);
            } else if !children.is_empty() {
                let enabled: Vec<OptionId> = children
                    .iter()
                    .copied()
                    .filter(|&c| !tree[c].disabled)
                    .collect();
                for &c in &enabled {
                    tree[c].selected = true;
                    tree[c].indeterminate = false;
                }
                // Children picked individually beforehand would otherwise
                // appear twice once the group expands.
                let before = self.selected.len();
                self.selected.retain(|x| !children.contains(x));
                let purged = before - self.selected.len();
                if purged > 0 {
                    tracing::trace!(
                        target: targets::SELECTION,
                        purged,
                        "removed individually selected children before group expansion"
                    );
                }
                if group_as_model {
                    // Every enabled child is now selected; a stale
                    // indeterminate flag from an earlier partial selection
                    // must not survive.
                    tree[id].indeterminate = false;
                } else {
                    self.selected.extend(enabled);
                    Self::recompute_group(tree, id);
                }
            }
        }

        debug_assert!(
            {
                let mut seen = HashSet::new();
                self.selected.iter().all(|x| seen.insert(*x))
            },
            "selected sequence must not contain duplicates"
        );
        tracing::trace!(
            target: targets::SELECTION,
            selected_count = self.selected.len(),
            "select applied"
        );
    }

    /// Unselects `id`, propagating flags through the tree.
    ///
    /// Unselecting a child of a fully selected group demotes the group to
    /// indeterminate and rewrites the sequence to the remaining siblings.
    /// Unselecting a group clears all of its children. Stale IDs and
    /// already-unselected nodes are no-ops.
    pub fn unselect<T>(&mut self, tree: &mut OptionTree<T>, id: OptionId, multiple: bool) {
        if !tree.contains(id) {
            return;
        }
        self.selected.retain(|x| *x != id);
        tree[id].selected = false;
        tree[id].indeterminate = false;

        if multiple {
            if let Some(parent) = tree[id].parent {
                if tree[parent].selected {
                    // The group was selected as a whole; rewrite the
                    // sequence to the remaining selected siblings.
                    let siblings = tree[parent].children.clone();
                    self.selected
                        .retain(|x| *x != parent && !siblings.contains(x));
                    self.selected.extend(
                        siblings
                            .iter()
                            .copied()
                            .filter(|&c| c != id && tree[c].selected),
                    );
                }
                Self::recompute_group(tree, parent);
            } else if !tree[id].children.is_empty() {
                let children = tree[id].children.clone();
                for &c in &children {
                    tree[c].selected = false;
                    tree[c].indeterminate = false;
                }
                self.selected.retain(|x| !children.contains(x));
            }
        }

        tracing::trace!(
            target: targets::SELECTION,
            selected_count = self.selected.len(),
            "unselect applied"
        );
    }

    /// Forgets the selected sequence without touching tree flags.
    ///
    /// Use this when the tree is about to be rebuilt; for a live tree,
    /// [`SelectionModel::clear_selected`] keeps flags consistent.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Clears the sequence and resets every node's selection flags.
    pub fn clear_selected<T>(&mut self, tree: &mut OptionTree<T>) {
        self.selected.clear();
        let ids: Vec<OptionId> = tree.ids().collect();
        for id in ids {
            let node = &mut tree[id];
            node.selected = false;
            node.indeterminate = false;
        }
    }

    /// Derives a group's `selected`/`indeterminate` flags from its enabled
    /// children.
    fn recompute_group<T>(tree: &mut OptionTree<T>, group: OptionId) {
        let children = tree[group].children.clone();
        let enabled: Vec<OptionId> = children
            .into_iter()
            .filter(|&c| !tree[c].disabled)
            .collect();
        let selected = enabled.iter().filter(|&&c| tree[c].selected).count();
        let node = &mut tree[group];
        node.selected = !enabled.is_empty() && selected == enabled.len();
        node.indeterminate = selected > 0 && selected < enabled.len();
    }
}
