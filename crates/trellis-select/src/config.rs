//! Configuration surface for a select widget.
//!
//! [`SelectConfig`] collects the host-supplied bindings and policy flags
//! that parameterize the option tree, filtering, and selection behavior.
//! Fields are set with `with_*` builder methods:
//!
//! ```
//! use trellis_select::SelectConfig;
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
//! # let _ = config;
//! ```

use std::sync::Arc;

use crate::search;

/// Extracts the display label for an item.
pub type LabelFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Extracts the bound value emitted for a selected item.
pub type BindFn<T, V> = Arc<dyn Fn(&T) -> V + Send + Sync>;

/// Classifies an item into a group. `None` (or an empty string) places the
/// item in the unnamed group.
pub type GroupKeyFn<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Custom filter predicate: item against search term.
pub type FilterFn<T> = Arc<dyn Fn(&T, &str) -> bool + Send + Sync>;

/// Custom equality between an item and an externally supplied bound value.
pub type CompareFn<T, V> = Arc<dyn Fn(&T, &V) -> bool + Send + Sync>;

/// Decides whether an item is disabled.
pub type DisabledFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Host-supplied bindings and policy flags for a select widget.
///
/// `T` is the host item type, `V` the bound value type emitted through
/// change notifications.
pub struct SelectConfig<T, V> {
    /// Allow more than one selected option at a time.
    pub multiple: bool,
    /// Whether `clear` is honored.
    pub clearable: bool,
    /// Whether group headers can be marked and toggled.
    pub selectable_group: bool,
    /// When a group is toggled, bind the group itself instead of its
    /// children.
    pub group_as_model: bool,
    /// Label used for the group of items whose classifier returned no key.
    pub unnamed_group_label: String,
    pub(crate) bind_label: LabelFn<T>,
    pub(crate) bind_value: BindFn<T, V>,
    pub(crate) group_by: Option<GroupKeyFn<T>>,
    pub(crate) filter: Option<FilterFn<T>>,
    pub(crate) compare_with: Option<CompareFn<T, V>>,
    pub(crate) disabled: Option<DisabledFn<T>>,
}

impl<T, V> SelectConfig<T, V> {
    /// Creates a configuration from a label binding and a value binding.
    ///
    /// Defaults: single-select, clearable, ungrouped, default label filter.
    pub fn new(
        bind_label: impl Fn(&T) -> String + Send + Sync + 'static,
        bind_value: impl Fn(&T) -> V + Send + Sync + 'static,
    ) -> Self {
        Self {
            multiple: false,
            clearable: true,
            selectable_group: false,
            group_as_model: false,
            unnamed_group_label: "Unnamed group".to_string(),
            bind_label: Arc::new(bind_label),
            bind_value: Arc::new(bind_value),
            group_by: None,
            filter: None,
            compare_with: None,
            disabled: None,
        }
    }

    /// Enables or disables multi-select.
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Controls whether `clear` is honored.
    pub fn with_clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    /// Groups items by the key the classifier returns.
    pub fn with_group_by(
        mut self,
        classify: impl Fn(&T) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.group_by = Some(Arc::new(classify));
        self
    }

    /// Makes group headers markable and toggleable.
    pub fn with_selectable_group(mut self, selectable: bool) -> Self {
        self.selectable_group = selectable;
        self
    }

    /// Binds the group node itself when a group is toggled, instead of
    /// expanding the selection into its children.
    pub fn with_group_as_model(mut self, group_as_model: bool) -> Self {
        self.group_as_model = group_as_model;
        self
    }

    /// Overrides the label shown for the unnamed group.
    pub fn with_unnamed_group_label(mut self, label: impl Into<String>) -> Self {
        self.unnamed_group_label = label.into();
        self
    }

    /// Replaces the default label filter with a custom predicate.
    pub fn with_filter(
        mut self,
        filter: impl Fn(&T, &str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Installs a custom item/value equality used by `set_value`.
    pub fn with_compare(
        mut self,
        compare: impl Fn(&T, &V) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.compare_with = Some(Arc::new(compare));
        self
    }

    /// Marks items as disabled according to the given predicate.
    pub fn with_disabled(
        mut self,
        disabled: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.disabled = Some(Arc::new(disabled));
        self
    }

    /// Display label of an item.
    pub fn label_of(&self, item: &T) -> String {
        (self.bind_label)(item)
    }

    /// Bound value of an item.
    pub fn value_of(&self, item: &T) -> V {
        (self.bind_value)(item)
    }

    /// Normalized group key of an item: `None` means the unnamed group.
    /// Returns `None` as a whole only when no classifier is configured.
    pub fn group_key_of(&self, item: &T) -> Option<Option<String>> {
        let classify = self.group_by.as_ref()?;
        Some(classify(item).filter(|key| !key.is_empty()))
    }

    /// Whether the item is disabled.
    pub fn is_disabled(&self, item: &T) -> bool {
        self.disabled.as_ref().is_some_and(|f| f(item))
    }

    /// Applies the configured filter, falling back to the default
    /// diacritic-folding label match.
    pub fn matches(&self, item: &T, term: &str) -> bool {
        match &self.filter {
            Some(filter) => filter(item, term),
            None => search::default_match(&self.label_of(item), term),
        }
    }
}

impl<T, V: PartialEq> SelectConfig<T, V> {
    /// Equality between an item and a bound value, honoring the configured
    /// `compare_with` override.
    pub fn values_equal(&self, item: &T, value: &V) -> bool {
        match &self.compare_with {
            Some(compare) => compare(item, value),
            None => self.value_of(item) == *value,
        }
    }
}

impl<T: Clone + Send + Sync + 'static> SelectConfig<T, T> {
    /// Creates a configuration whose bound value is the item itself.
    pub fn bind_this(bind_label: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self::new(bind_label, |item: &T| item.clone())
    }
}
