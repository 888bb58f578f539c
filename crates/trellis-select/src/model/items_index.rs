//! Visible-items view over the option tree.
//!
//! The index owns the tree plus everything derived from it: the grouped
//! build, the filtered view, and the marked cursor used for keyboard
//! traversal. It is rebuilt wholesale by [`ItemsIndex::build`] whenever the
//! host supplies a new item set.

use std::collections::HashMap;

use trellis_core::logging::targets;

use crate::config::SelectConfig;
use crate::error::{Error, Result};
use crate::model::option_tree::{OptionId, OptionNode, OptionTree};

/// Option tree plus filter state and the marked cursor.
pub struct ItemsIndex<T> {
    tree: OptionTree<T>,
    /// Visible node IDs in tree order. Groups appear before their children.
    filtered: Vec<OptionId>,
    term: String,
    marked: Option<OptionId>,
    selectable_group: bool,
}

impl<T> Default for ItemsIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ItemsIndex<T> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            tree: OptionTree::new(),
            filtered: Vec::new(),
            term: String::new(),
            marked: None,
            selectable_group: false,
        }
    }

    /// Rebuilds the tree from a new item set.
    ///
    /// With a grouping classifier configured, items are bucketed by key in
    /// first-appearance order; items without a key collapse into a single
    /// unnamed group. Rebuilding discards the previous tree, clears the
    /// filter, and unmarks the cursor.
    ///
    /// Returns [`Error::EmptyGrouping`] when a classifier is configured but
    /// no item produced a key; the previous tree is left untouched.
    pub fn build<V>(&mut self, items: Vec<T>, config: &SelectConfig<T, V>) -> Result<()> {
        let Some(classify) = config.group_by.clone() else {
            self.tree.clear();
            for item in items {
                let label = config.label_of(&item);
                let disabled = config.is_disabled(&item);
                self.tree.insert_root(OptionNode::leaf(label, item, disabled));
            }
            self.reset_view(config);
            return Ok(());
        };

        // Empty keys collapse into the unnamed group alongside `None`.
        let keyed: Vec<(Option<String>, T)> = items
            .into_iter()
            .map(|item| {
                let key = classify(&item).filter(|key| !key.is_empty());
                (key, item)
            })
            .collect();
        if !keyed.is_empty() && keyed.iter().all(|(key, _)| key.is_none()) {
            return Err(Error::empty_grouping(keyed.len()));
        }

        self.tree.clear();
        // Map of normalized group key ("" = unnamed) to its node.
        let mut groups: HashMap<String, OptionId> = HashMap::new();
        for (key, item) in keyed {
            let bucket = key.clone().unwrap_or_default();
            let group_id = *groups.entry(bucket).or_insert_with(|| {
                let label = key
                    .clone()
                    .unwrap_or_else(|| config.unnamed_group_label.clone());
                self.tree.insert_root(OptionNode::group(label, key.clone()))
            });
            let label = config.label_of(&item);
            let disabled = config.is_disabled(&item);
            self.tree
                .insert_child(group_id, OptionNode::leaf(label, item, disabled));
        }
        self.reset_view(config);
        Ok(())
    }

    fn reset_view<V>(&mut self, config: &SelectConfig<T, V>) {
        self.selectable_group = config.selectable_group;
        self.filtered = self.tree.flatten();
        self.term.clear();
        self.marked = None;
        tracing::debug!(
            target: targets::MODEL,
            node_count = self.tree.len(),
            group_count = self.tree.roots().iter().filter(|&&r| self.tree[r].is_group()).count(),
            "items index rebuilt"
        );
    }

    /// The underlying option tree.
    pub fn tree(&self) -> &OptionTree<T> {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut OptionTree<T> {
        &mut self.tree
    }

    /// Visible node IDs in tree order.
    pub fn filtered(&self) -> &[OptionId] {
        &self.filtered
    }

    /// The current filter term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Currently marked node, if any.
    pub fn marked(&self) -> Option<OptionId> {
        self.marked
    }

    /// Recomputes the visible view for `term`, matching leaves with
    /// `predicate`. A group is visible iff at least one of its children is.
    ///
    /// Changing the term unmarks the cursor; re-applying the same term
    /// keeps it unless the marked node fell out of view. An empty term
    /// restores the unfiltered view.
    pub fn filter(&mut self, term: &str, predicate: impl Fn(&T) -> bool) {
        let visible = if term.is_empty() {
            self.tree.flatten()
        } else {
            let mut out = Vec::new();
            for &root in self.tree.roots() {
                if self.tree[root].is_group() {
                    let kept: Vec<OptionId> = self.tree[root]
                        .children
                        .iter()
                        .copied()
                        .filter(|&c| self.tree[c].item().map(&predicate).unwrap_or(false))
                        .collect();
                    if !kept.is_empty() {
                        out.push(root);
                        out.extend(kept);
                    }
                } else if self.tree[root].item().map(&predicate).unwrap_or(false) {
                    out.push(root);
                }
            }
            out
        };

        let term_changed = term != self.term;
        self.filtered = visible;
        self.term = term.to_string();
        if term_changed {
            self.marked = None;
        } else if let Some(m) = self.marked
            && !self.filtered.contains(&m)
        {
            self.marked = None;
        }
        tracing::debug!(
            target: targets::MODEL,
            term,
            visible_count = self.filtered.len(),
            "filter applied"
        );
    }

    /// Clears the filter, restoring the unfiltered view.
    pub fn clear_filter(&mut self) {
        self.filter("", |_| true);
    }

    /// Visible, enabled, selectable node IDs in traversal order.
    fn traversable(&self) -> Vec<OptionId> {
        self.filtered
            .iter()
            .copied()
            .filter(|&id| {
                let node = &self.tree[id];
                !node.disabled && (!node.is_group() || self.selectable_group)
            })
            .collect()
    }

    /// Moves the marked cursor to the next traversable node, wrapping from
    /// last to first. With no cursor, marks the first.
    pub fn mark_next_item(&mut self) {
        let order = self.traversable();
        if order.is_empty() {
            self.marked = None;
            return;
        }
        let next = match self.marked.and_then(|m| order.iter().position(|&x| x == m)) {
            Some(pos) => order[(pos + 1) % order.len()],
            None => order[0],
        };
        self.marked = Some(next);
    }

    /// Moves the marked cursor to the previous traversable node, wrapping
    /// from first to last. With no cursor, marks the last.
    pub fn mark_previous_item(&mut self) {
        let order = self.traversable();
        if order.is_empty() {
            self.marked = None;
            return;
        }
        let prev = match self.marked.and_then(|m| order.iter().position(|&x| x == m)) {
            Some(pos) => order[(pos + order.len() - 1) % order.len()],
            None => order[order.len() - 1],
        };
        self.marked = Some(prev);
    }

    /// Marks the most recent selection so the dropdown opens on it.
    /// Does nothing when `last` is `None` or stale.
    pub fn mark_last_selection(&mut self, last: Option<OptionId>) {
        if let Some(id) = last
            && self.tree.contains(id)
        {
            self.marked = Some(id);
        }
    }

    /// Removes the marked cursor.
    pub fn unmark_current_item(&mut self) {
        self.marked = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct City {
        name: &'static str,
        country: Option<&'static str>,
    }

    fn config() -> SelectConfig<City, String> {
        SelectConfig::new(|c: &City| c.name.to_string(), |c: &City| c.name.to_string())
    }

    fn grouped_config() -> SelectConfig<City, String> {
        config().with_group_by(|c: &City| c.country.map(str::to_string))
    }

    fn cities() -> Vec<City> {
        vec![
            City { name: "Vilnius", country: Some("Lithuania") },
            City { name: "Kaunas", country: Some("Lithuania") },
            City { name: "Pabrade", country: None },
            City { name: "Riga", country: Some("Latvia") },
        ]
    }

    fn labels(index: &ItemsIndex<City>) -> Vec<&str> {
        index
            .filtered()
            .iter()
            .map(|&id| index.tree()[id].label.as_str())
            .collect()
    }

    #[test]
    fn build_groups_in_first_appearance_order() {
        let mut index = ItemsIndex::new();
        index.build(cities(), &grouped_config()).unwrap();

        assert_eq!(
            labels(&index),
            vec![
                "Lithuania",
                "Vilnius",
                "Kaunas",
                "Unnamed group",
                "Pabrade",
                "Latvia",
                "Riga",
            ]
        );
        let latvia = index.filtered()[5];
        assert!(index.tree()[latvia].is_group());
        assert_eq!(index.tree()[latvia].group_key(), Some("Latvia"));
    }

    #[test]
    fn build_without_classifier_yields_flat_roots() {
        let mut index = ItemsIndex::new();
        index.build(cities(), &config()).unwrap();

        assert_eq!(labels(&index), vec!["Vilnius", "Kaunas", "Pabrade", "Riga"]);
        assert!(index.filtered().iter().all(|&id| !index.tree()[id].is_group()));
    }

    #[test]
    fn build_fails_when_no_item_has_a_group_key() {
        let mut index = ItemsIndex::new();
        let keyless = vec![
            City { name: "Pabrade", country: None },
            City { name: "Atlantis", country: Some("") },
        ];
        let err = index.build(keyless, &grouped_config()).unwrap_err();
        assert!(matches!(err, Error::EmptyGrouping { item_count: 2 }));
    }

    #[test]
    fn build_accepts_empty_item_set() {
        let mut index = ItemsIndex::new();
        index.build(Vec::new(), &grouped_config()).unwrap();
        assert!(index.tree().is_empty());
        assert!(index.filtered().is_empty());
    }

    #[test]
    fn filter_keeps_groups_with_a_visible_child() {
        let mut index = ItemsIndex::new();
        index.build(cities(), &grouped_config()).unwrap();

        index.filter("vilnius", |c| c.name.to_lowercase().contains("vilnius"));
        assert_eq!(labels(&index), vec!["Lithuania", "Vilnius"]);

        index.clear_filter();
        assert_eq!(labels(&index).len(), 7);
    }

    #[test]
    fn reapplying_same_term_keeps_cursor_new_term_resets_it() {
        let mut index = ItemsIndex::new();
        index.build(cities(), &config()).unwrap();

        index.mark_next_item();
        let marked = index.marked();
        assert!(marked.is_some());

        index.filter("", |_| true);
        assert_eq!(index.marked(), marked);

        index.filter("ka", |c| c.name.to_lowercase().contains("ka"));
        assert_eq!(index.marked(), None);
    }

    #[test]
    fn marking_wraps_and_skips_disabled() {
        let mut index = ItemsIndex::new();
        let cfg = config().with_disabled(|c: &City| c.name == "Kaunas");
        index.build(cities(), &cfg).unwrap();

        let visible: Vec<OptionId> = index.filtered().to_vec();
        index.mark_next_item();
        assert_eq!(index.marked(), Some(visible[0]));
        index.mark_next_item();
        // Kaunas is disabled; the cursor lands on Pabrade.
        assert_eq!(index.marked(), Some(visible[2]));
        index.mark_next_item();
        index.mark_next_item();
        assert_eq!(index.marked(), Some(visible[0]));

        index.unmark_current_item();
        index.mark_previous_item();
        assert_eq!(index.marked(), Some(visible[3]));
    }

    #[test]
    fn groups_traversable_only_when_selectable() {
        let mut index = ItemsIndex::new();
        index.build(cities(), &grouped_config()).unwrap();
        index.mark_next_item();
        assert!(!index.tree()[index.marked().unwrap()].is_group());

        let cfg = grouped_config().with_selectable_group(true);
        index.build(cities(), &cfg).unwrap();
        index.mark_next_item();
        assert!(index.tree()[index.marked().unwrap()].is_group());
    }

    #[test]
    fn mark_last_selection_restores_cursor() {
        let mut index = ItemsIndex::new();
        index.build(cities(), &config()).unwrap();
        let second = index.filtered()[1];

        index.mark_last_selection(Some(second));
        assert_eq!(index.marked(), Some(second));

        index.mark_last_selection(None);
        assert_eq!(index.marked(), Some(second));
    }
}
