//! Dropdown state machine.
//!
//! [`SelectBox`] ties the items index and the selection model together
//! behind an open/closed dropdown with keyboard traversal. It is
//! render-agnostic: hosts feed it [`KeyIntent`]s and filter text, observe
//! its signals, and draw from its read accessors.

use trellis_core::Signal;
use trellis_core::logging::targets;

use crate::config::SelectConfig;
use crate::error::Result;
use crate::model::{ItemsIndex, OptionId, OptionNode, OptionTree, Payload, SelectionModel};

/// Keyboard intents the dropdown understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    /// Open the dropdown, or move the cursor down.
    ArrowDown,
    /// Open the dropdown, or move the cursor up.
    ArrowUp,
    /// Open the dropdown.
    Space,
    /// Toggle the marked option.
    Enter,
    /// Close the dropdown and move focus on.
    Tab,
    /// Close the dropdown.
    Escape,
}

/// A value emitted for one selected entry.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue<V> {
    /// Bound value of a selected item.
    Item(V),
    /// Key (or label, for the unnamed group) of a selected group.
    Group(String),
}

/// The externally observable selection value.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionValue<V> {
    /// Nothing selected.
    Empty,
    /// Single-select result.
    Single(BoundValue<V>),
    /// Multi-select result in selection order.
    Multiple(Vec<BoundValue<V>>),
}

/// A dropdown selection widget state engine.
///
/// `T` is the host item type, `V` the bound value type.
///
/// ```
/// use trellis_select::{KeyIntent, SelectBox, SelectConfig};
///
/// let config = SelectConfig::new(
///     |s: &String| s.clone(),
///     |s: &String| s.clone(),
/// );
/// let mut select = SelectBox::new(config);
/// select.set_items(vec!["red".to_string(), "green".to_string()]).unwrap();
///
/// select.handle_key(KeyIntent::ArrowDown); // opens
/// select.handle_key(KeyIntent::ArrowDown); // marks "red"
/// select.handle_key(KeyIntent::Enter);     // selects and closes
/// assert!(!select.is_open());
/// ```
pub struct SelectBox<T, V> {
    config: SelectConfig<T, V>,
    items: ItemsIndex<T>,
    selection: SelectionModel,
    open: bool,
    enabled: bool,
    /// Emitted after every externally observable selection change.
    pub value_changed: Signal<SelectionValue<V>>,
    /// Emitted when the dropdown opens.
    pub opened: Signal<()>,
    /// Emitted when the dropdown closes.
    pub closed: Signal<()>,
}

impl<T: 'static, V: Clone + 'static> SelectBox<T, V> {
    /// Creates a widget with no items.
    pub fn new(config: SelectConfig<T, V>) -> Self {
        Self {
            config,
            items: ItemsIndex::new(),
            selection: SelectionModel::new(),
            open: false,
            enabled: true,
            value_changed: Signal::new(),
            opened: Signal::new(),
            closed: Signal::new(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &SelectConfig<T, V> {
        &self.config
    }

    /// Replaces the item set, discarding any selection.
    ///
    /// Fails with [`crate::Error::EmptyGrouping`] when a grouping
    /// classifier is configured but no item produced a key; the widget is
    /// left unchanged in that case.
    pub fn set_items(&mut self, items: Vec<T>) -> Result<()> {
        self.items.build(items, &self.config)?;
        self.selection.clear();
        Ok(())
    }

    /// Whether the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the widget reacts to input.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the widget. Disabling closes the dropdown.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.close();
        }
    }

    /// The option tree.
    pub fn tree(&self) -> &OptionTree<T> {
        self.items.tree()
    }

    /// Visible node IDs in tree order.
    pub fn filtered(&self) -> &[OptionId] {
        self.items.filtered()
    }

    /// The current filter term.
    pub fn term(&self) -> &str {
        self.items.term()
    }

    /// Currently marked node, if any.
    pub fn marked(&self) -> Option<OptionId> {
        self.items.marked()
    }

    /// The marked node itself.
    pub fn marked_option(&self) -> Option<&OptionNode<T>> {
        self.items.marked().and_then(|id| self.items.tree().get(id))
    }

    /// Selected node IDs in selection order.
    pub fn selected(&self) -> &[OptionId] {
        self.selection.value()
    }

    /// The externally observable selection value.
    pub fn value(&self) -> SelectionValue<V> {
        let entries: Vec<BoundValue<V>> = self
            .selection
            .value()
            .iter()
            .map(|&id| {
                let node = &self.items.tree()[id];
                match &node.payload {
                    Payload::Item(item) => BoundValue::Item(self.config.value_of(item)),
                    Payload::Group { key } => BoundValue::Group(
                        key.clone()
                            .unwrap_or_else(|| self.config.unnamed_group_label.clone()),
                    ),
                }
            })
            .collect();
        if self.config.multiple {
            if entries.is_empty() {
                SelectionValue::Empty
            } else {
                SelectionValue::Multiple(entries)
            }
        } else {
            match entries.into_iter().next() {
                Some(entry) => SelectionValue::Single(entry),
                None => SelectionValue::Empty,
            }
        }
    }

    /// Opens the dropdown, marking the most recent selection.
    pub fn open(&mut self) {
        if !self.enabled || self.open {
            return;
        }
        self.open = true;
        self.items.mark_last_selection(self.selection.last());
        tracing::debug!(target: targets::WIDGET, "dropdown opened");
        self.opened.emit(());
    }

    /// Closes the dropdown, clearing the filter and the marked cursor.
    /// The selection is untouched.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.items.clear_filter();
        self.items.unmark_current_item();
        tracing::debug!(target: targets::WIDGET, "dropdown closed");
        self.closed.emit(());
    }

    /// Dispatches a keyboard intent.
    pub fn handle_key(&mut self, intent: KeyIntent) {
        if !self.enabled {
            return;
        }
        match intent {
            KeyIntent::ArrowDown => {
                if self.open {
                    self.items.mark_next_item();
                } else {
                    self.open();
                }
            }
            KeyIntent::ArrowUp => {
                if self.open {
                    self.items.mark_previous_item();
                } else {
                    self.open();
                }
            }
            KeyIntent::Space => self.open(),
            KeyIntent::Enter => {
                if self.open
                    && let Some(id) = self.items.marked()
                {
                    self.toggle(id);
                }
            }
            KeyIntent::Tab | KeyIntent::Escape => self.close(),
        }
    }

    /// A click or focus loss outside the widget: closes the dropdown.
    pub fn outside_activation(&mut self) {
        self.close();
    }

    /// Applies a filter term, opening the dropdown if needed.
    pub fn filter(&mut self, term: &str) {
        if !self.enabled {
            return;
        }
        self.open();
        let config = &self.config;
        self.items.filter(term, |item| config.matches(item, term));
    }

    /// Toggles `id`: unselects it when selected in multi-select mode,
    /// selects it otherwise. Disabled and stale nodes are ignored.
    pub fn toggle(&mut self, id: OptionId) {
        let Some(node) = self.items.tree().get(id) else {
            return;
        };
        if node.disabled {
            return;
        }
        if self.config.multiple && node.selected {
            self.unselect(id);
        } else {
            self.select(id);
        }
    }

    /// Selects `id` and notifies. In single-select mode the dropdown
    /// closes afterwards. Disabled nodes, stale IDs, and group headers
    /// without `selectable_group` are ignored.
    pub fn select(&mut self, id: OptionId) {
        if !self.enabled {
            return;
        }
        let Some(node) = self.items.tree().get(id) else {
            return;
        };
        if node.disabled || (node.is_group() && !self.config.selectable_group) {
            return;
        }
        self.selection.select(
            self.items.tree_mut(),
            id,
            self.config.multiple,
            self.config.group_as_model,
        );
        self.notify();
        if !self.config.multiple {
            self.close();
        }
    }

    /// Unselects `id` and notifies. Stale IDs are ignored.
    pub fn unselect(&mut self, id: OptionId) {
        if !self.enabled || !self.items.tree().contains(id) {
            return;
        }
        self.selection
            .unselect(self.items.tree_mut(), id, self.config.multiple);
        self.notify();
    }

    /// Clears the selection and the filter, when the widget is clearable.
    /// The dropdown's open state is untouched.
    pub fn clear(&mut self) {
        if !self.enabled || !self.config.clearable {
            return;
        }
        self.selection.clear_selected(self.items.tree_mut());
        self.items.clear_filter();
        self.notify();
    }

    fn notify(&mut self) {
        let value = self.value();
        self.value_changed.emit(value);
    }
}

impl<T: 'static, V: Clone + PartialEq + 'static> SelectBox<T, V> {
    /// Replaces the selection from externally supplied bound values.
    ///
    /// Each value is resolved against the tree: items via `compare_with`
    /// (or `PartialEq` on the bound value), groups by key or label.
    /// Unresolvable entries are skipped with a warning. In single-select
    /// mode only the last resolvable value survives.
    pub fn set_value(&mut self, values: &[BoundValue<V>]) {
        self.selection.clear_selected(self.items.tree_mut());
        for value in values {
            match self.resolve(value) {
                Some(id) => self.selection.select(
                    self.items.tree_mut(),
                    id,
                    self.config.multiple,
                    self.config.group_as_model,
                ),
                None => {
                    tracing::warn!(
                        target: targets::WIDGET,
                        "set_value entry did not match any option, skipping"
                    );
                }
            }
        }
        self.notify();
    }

    fn resolve(&self, value: &BoundValue<V>) -> Option<OptionId> {
        let tree = self.items.tree();
        match value {
            BoundValue::Group(key) => tree.roots().iter().copied().find(|&id| {
                let node = &tree[id];
                node.is_group() && (node.group_key() == Some(key.as_str()) || node.label == *key)
            }),
            BoundValue::Item(v) => tree.leaves().into_iter().find(|&id| {
                tree[id]
                    .item()
                    .is_some_and(|item| self.config.values_equal(item, v))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone)]
    struct Person {
        name: &'static str,
        country: &'static str,
        retired: bool,
    }

    fn people() -> Vec<Person> {
        vec![
            Person { name: "Adam", country: "United States", retired: false },
            Person { name: "Samantha", country: "United States", retired: false },
            Person { name: "Estefanía", country: "Ecuador", retired: false },
            Person { name: "Nicolás", country: "Ecuador", retired: true },
        ]
    }

    fn single_config() -> SelectConfig<Person, String> {
        SelectConfig::new(|p: &Person| p.name.to_string(), |p: &Person| p.name.to_string())
    }

    fn multi_grouped_config() -> SelectConfig<Person, String> {
        single_config()
            .with_multiple(true)
            .with_group_by(|p: &Person| Some(p.country.to_string()))
            .with_selectable_group(true)
            .with_disabled(|p: &Person| p.retired)
    }

    fn leaf_by_label(select: &SelectBox<Person, String>, label: &str) -> OptionId {
        select
            .tree()
            .leaves()
            .into_iter()
            .find(|&id| select.tree()[id].label == label)
            .unwrap()
    }

    fn group_by_label(select: &SelectBox<Person, String>, label: &str) -> OptionId {
        select
            .tree()
            .roots()
            .iter()
            .copied()
            .find(|&id| select.tree()[id].label == label)
            .unwrap()
    }

    #[test]
    fn arrow_down_opens_then_traverses() {
        let mut select = SelectBox::new(single_config());
        select.set_items(people()).unwrap();

        assert!(!select.is_open());
        select.handle_key(KeyIntent::ArrowDown);
        assert!(select.is_open());
        assert_eq!(select.marked(), None);

        select.handle_key(KeyIntent::ArrowDown);
        assert_eq!(select.marked(), Some(select.filtered()[0]));
    }

    #[test]
    fn arrow_up_opens_then_traverses_backwards() {
        let mut select = SelectBox::new(single_config());
        select.set_items(people()).unwrap();

        select.handle_key(KeyIntent::ArrowUp);
        assert!(select.is_open());

        select.handle_key(KeyIntent::ArrowUp);
        let last = *select.filtered().last().unwrap();
        assert_eq!(select.marked(), Some(last));
    }

    #[test]
    fn space_only_opens() {
        let mut select = SelectBox::new(single_config());
        select.set_items(people()).unwrap();

        select.handle_key(KeyIntent::Space);
        assert!(select.is_open());
        select.handle_key(KeyIntent::Space);
        assert!(select.is_open());
        assert_eq!(select.marked(), None);
    }

    #[test]
    fn enter_selects_marked_and_closes_in_single_mode() {
        let mut select = SelectBox::new(single_config());
        select.set_items(people()).unwrap();

        select.handle_key(KeyIntent::ArrowDown);
        select.handle_key(KeyIntent::ArrowDown);
        select.handle_key(KeyIntent::Enter);

        assert!(!select.is_open());
        assert_eq!(
            select.value(),
            SelectionValue::Single(BoundValue::Item("Adam".to_string()))
        );
    }

    #[test]
    fn enter_keeps_dropdown_open_in_multi_mode() {
        let mut select = SelectBox::new(multi_grouped_config());
        select.set_items(people()).unwrap();

        select.handle_key(KeyIntent::ArrowDown);
        select.handle_key(KeyIntent::ArrowDown);
        select.handle_key(KeyIntent::ArrowDown);
        select.handle_key(KeyIntent::Enter);

        assert!(select.is_open());
        assert_eq!(select.selected().len(), 1);

        // Enter again toggles the same entry off.
        select.handle_key(KeyIntent::Enter);
        assert!(select.selected().is_empty());
    }

    #[test]
    fn escape_closes_and_clears_filter_but_not_selection() {
        let mut select = SelectBox::new(single_config());
        select.set_items(people()).unwrap();

        let adam = leaf_by_label(&select, "Adam");
        select.open();
        select.select(adam);
        select.open();
        select.filter("sam");
        assert_eq!(select.filtered().len(), 1);

        select.handle_key(KeyIntent::Escape);
        assert!(!select.is_open());
        assert_eq!(select.term(), "");
        assert_eq!(select.filtered().len(), people().len());
        assert_eq!(select.selected(), &[adam]);
    }

    #[test]
    fn single_select_replaces_and_emits() {
        let mut select = SelectBox::new(single_config());
        select.set_items(people()).unwrap();
        let emitted = Arc::new(AtomicUsize::new(0));
        let count = emitted.clone();
        select.value_changed.connect(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        });

        let adam = leaf_by_label(&select, "Adam");
        let samantha = leaf_by_label(&select, "Samantha");
        select.select(adam);
        select.select(samantha);

        assert_eq!(select.selected(), &[samantha]);
        assert!(!select.tree()[adam].selected);
        assert_eq!(emitted.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn group_toggle_selects_enabled_children() {
        let mut select = SelectBox::new(multi_grouped_config());
        select.set_items(people()).unwrap();

        let us = group_by_label(&select, "United States");
        let ecuador = group_by_label(&select, "Ecuador");
        select.toggle(us);

        assert_eq!(
            select.value(),
            SelectionValue::Multiple(vec![
                BoundValue::Item("Adam".to_string()),
                BoundValue::Item("Samantha".to_string()),
            ])
        );
        assert!(select.tree()[us].selected);

        // Nicolás is disabled, so Estefanía alone completes Ecuador.
        select.toggle(ecuador);
        assert!(select.tree()[ecuador].selected);
        assert!(!select.tree()[leaf_by_label(&select, "Nicolás")].selected);
    }

    #[test]
    fn group_as_model_emits_group_value() {
        let config = multi_grouped_config().with_group_as_model(true);
        let mut select = SelectBox::new(config);
        select.set_items(people()).unwrap();

        let us = group_by_label(&select, "United States");
        select.toggle(us);

        assert_eq!(
            select.value(),
            SelectionValue::Multiple(vec![BoundValue::Group("United States".to_string())])
        );
    }

    #[test]
    fn groups_not_selectable_without_flag() {
        let config = single_config()
            .with_multiple(true)
            .with_group_by(|p: &Person| Some(p.country.to_string()));
        let mut select = SelectBox::new(config);
        select.set_items(people()).unwrap();

        let us = group_by_label(&select, "United States");
        select.toggle(us);
        assert!(select.selected().is_empty());
    }

    #[test]
    fn disabled_options_cannot_be_toggled() {
        let mut select = SelectBox::new(multi_grouped_config());
        select.set_items(people()).unwrap();

        let nicolas = leaf_by_label(&select, "Nicolás");
        select.toggle(nicolas);
        assert!(select.selected().is_empty());
    }

    #[test]
    fn disabled_widget_ignores_input_and_closes() {
        let mut select = SelectBox::new(single_config());
        select.set_items(people()).unwrap();
        select.open();

        select.set_enabled(false);
        assert!(!select.is_open());

        select.handle_key(KeyIntent::ArrowDown);
        assert!(!select.is_open());
        select.select(leaf_by_label(&select, "Adam"));
        assert!(select.selected().is_empty());

        select.set_enabled(true);
        select.handle_key(KeyIntent::ArrowDown);
        assert!(select.is_open());
    }

    #[test]
    fn filter_opens_dropdown_and_folds_diacritics() {
        let mut select = SelectBox::new(multi_grouped_config());
        select.set_items(people()).unwrap();

        select.filter("estefania");
        assert!(select.is_open());
        let labels: Vec<&str> = select
            .filtered()
            .iter()
            .map(|&id| select.tree()[id].label.as_str())
            .collect();
        assert_eq!(labels, vec!["Ecuador", "Estefanía"]);
    }

    #[test]
    fn clear_respects_clearable_flag() {
        let mut select = SelectBox::new(single_config().with_clearable(false));
        select.set_items(people()).unwrap();

        let adam = leaf_by_label(&select, "Adam");
        select.select(adam);
        select.clear();
        assert_eq!(select.selected(), &[adam]);
    }

    #[test]
    fn clear_resets_selection_and_filter() {
        let mut select = SelectBox::new(multi_grouped_config());
        select.set_items(people()).unwrap();

        select.select(leaf_by_label(&select, "Adam"));
        select.filter("sam");
        select.clear();

        assert!(select.selected().is_empty());
        assert_eq!(select.term(), "");
        assert_eq!(select.value(), SelectionValue::Empty);
        // Clearing leaves the dropdown open.
        assert!(select.is_open());
    }

    #[test]
    fn open_marks_last_selection() {
        let mut select = SelectBox::new(multi_grouped_config());
        select.set_items(people()).unwrap();

        let samantha = leaf_by_label(&select, "Samantha");
        select.open();
        select.select(samantha);
        select.outside_activation();
        assert!(!select.is_open());

        select.open();
        assert_eq!(select.marked(), Some(samantha));
    }

    #[test]
    fn opened_and_closed_signals_fire_once_per_transition() {
        let mut select = SelectBox::new(single_config());
        select.set_items(people()).unwrap();
        let opens = Arc::new(AtomicUsize::new(0));
        let closes = Arc::new(AtomicUsize::new(0));
        let o = opens.clone();
        select.opened.connect(move |_| {
            o.fetch_add(1, Ordering::SeqCst);
        });
        let c = closes.clone();
        select.closed.connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        select.open();
        select.open();
        select.close();
        select.close();

        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn set_value_resolves_items_and_groups() {
        let mut select = SelectBox::new(multi_grouped_config());
        select.set_items(people()).unwrap();

        select.set_value(&[
            BoundValue::Group("United States".to_string()),
            BoundValue::Item("Estefanía".to_string()),
        ]);

        assert_eq!(
            select.value(),
            SelectionValue::Multiple(vec![
                BoundValue::Item("Adam".to_string()),
                BoundValue::Item("Samantha".to_string()),
                BoundValue::Item("Estefanía".to_string()),
            ])
        );
    }

    #[test]
    fn set_value_skips_unresolvable_entries() {
        let mut select = SelectBox::new(multi_grouped_config());
        select.set_items(people()).unwrap();

        select.set_value(&[
            BoundValue::Item("Nobody".to_string()),
            BoundValue::Item("Adam".to_string()),
        ]);

        assert_eq!(
            select.value(),
            SelectionValue::Multiple(vec![BoundValue::Item("Adam".to_string())])
        );
    }

    #[test]
    fn set_value_in_single_mode_keeps_last_entry() {
        let mut select = SelectBox::new(single_config());
        select.set_items(people()).unwrap();

        select.set_value(&[
            BoundValue::Item("Adam".to_string()),
            BoundValue::Item("Samantha".to_string()),
        ]);

        assert_eq!(
            select.value(),
            SelectionValue::Single(BoundValue::Item("Samantha".to_string()))
        );
    }

    #[test]
    fn set_value_honors_compare_with() {
        let config = single_config().with_compare(|p: &Person, v: &String| {
            p.name.eq_ignore_ascii_case(v)
        });
        let mut select = SelectBox::new(config);
        select.set_items(people()).unwrap();

        select.set_value(&[BoundValue::Item("ADAM".to_string())]);
        assert_eq!(
            select.value(),
            SelectionValue::Single(BoundValue::Item("Adam".to_string()))
        );
    }

    #[test]
    fn set_items_discards_previous_selection() {
        let mut select = SelectBox::new(single_config());
        select.set_items(people()).unwrap();
        select.select(leaf_by_label(&select, "Adam"));

        select.set_items(people()).unwrap();
        assert!(select.selected().is_empty());
        assert_eq!(select.value(), SelectionValue::Empty);
    }
}
