//! Arena-backed option tree.
//!
//! Options live in a slotmap arena and are addressed by [`OptionId`].
//! Groups are internal nodes carrying an optional key; leaves carry the
//! host item. The tree is rebuilt wholesale when the item set changes, so
//! nodes are never reparented.

use std::ops::{Index, IndexMut};

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Stable identifier of an option node within its tree.
    pub struct OptionId;
}

/// What an option node carries: a host item or a group header.
pub enum Payload<T> {
    /// A selectable leaf wrapping a host item.
    Item(T),
    /// A group header. `key` is `None` for the unnamed group.
    Group {
        /// Classifier key the group was built from.
        key: Option<String>,
    },
}

/// A single option in the tree.
pub struct OptionNode<T> {
    /// Display label.
    pub label: String,
    /// Item or group payload.
    pub payload: Payload<T>,
    /// Disabled options are skipped by traversal and cannot be selected.
    pub disabled: bool,
    /// Tri-state selection flag.
    pub selected: bool,
    /// Set on a group when some but not all children are selected.
    pub indeterminate: bool,
    /// Children in insertion order. Empty for leaves.
    pub children: Vec<OptionId>,
    /// Owning group, if any.
    pub parent: Option<OptionId>,
}

impl<T> OptionNode<T> {
    /// Creates a leaf node for a host item.
    pub fn leaf(label: impl Into<String>, item: T, disabled: bool) -> Self {
        Self {
            label: label.into(),
            payload: Payload::Item(item),
            disabled,
            selected: false,
            indeterminate: false,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Creates a group header node.
    pub fn group(label: impl Into<String>, key: Option<String>) -> Self {
        Self {
            label: label.into(),
            payload: Payload::Group { key },
            disabled: false,
            selected: false,
            indeterminate: false,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Whether this node is a group header.
    pub fn is_group(&self) -> bool {
        matches!(self.payload, Payload::Group { .. })
    }

    /// The host item, if this is a leaf.
    pub fn item(&self) -> Option<&T> {
        match &self.payload {
            Payload::Item(item) => Some(item),
            Payload::Group { .. } => None,
        }
    }

    /// The classifier key, if this is a group with a named key.
    pub fn group_key(&self) -> Option<&str> {
        match &self.payload {
            Payload::Group { key } => key.as_deref(),
            Payload::Item(_) => None,
        }
    }
}

/// An arena of option nodes forming a forest of groups and leaves.
pub struct OptionTree<T> {
    nodes: SlotMap<OptionId, OptionNode<T>>,
    roots: Vec<OptionId>,
}

impl<T> Default for OptionTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OptionTree<T> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
        }
    }

    /// Number of nodes, groups included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live node in this tree.
    pub fn contains(&self, id: OptionId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Root nodes in insertion order.
    pub fn roots(&self) -> &[OptionId] {
        &self.roots
    }

    /// Borrows a node, or `None` if `id` is stale.
    pub fn get(&self, id: OptionId) -> Option<&OptionNode<T>> {
        self.nodes.get(id)
    }

    /// Mutably borrows a node, or `None` if `id` is stale.
    pub fn get_mut(&mut self, id: OptionId) -> Option<&mut OptionNode<T>> {
        self.nodes.get_mut(id)
    }

    /// Inserts a root node.
    pub fn insert_root(&mut self, mut node: OptionNode<T>) -> OptionId {
        node.parent = None;
        let id = self.nodes.insert(node);
        self.roots.push(id);
        id
    }

    /// Inserts a node under `parent`, wiring the back-reference.
    /// Returns `None` when `parent` is stale.
    pub fn insert_child(&mut self, parent: OptionId, mut node: OptionNode<T>) -> Option<OptionId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        node.parent = Some(parent);
        let id = self.nodes.insert(node);
        self.nodes[parent].children.push(id);
        Some(id)
    }

    /// All node IDs in arena order (unordered with respect to the tree).
    pub fn ids(&self) -> impl Iterator<Item = OptionId> + '_ {
        self.nodes.keys()
    }

    /// All node IDs in tree order: each root followed by its children.
    pub fn flatten(&self) -> Vec<OptionId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            out.push(root);
            out.extend(self.nodes[root].children.iter().copied());
        }
        out
    }

    /// Leaf node IDs in tree order.
    pub fn leaves(&self) -> Vec<OptionId> {
        self.flatten()
            .into_iter()
            .filter(|&id| !self.nodes[id].is_group())
            .collect()
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }
}

impl<T> Index<OptionId> for OptionTree<T> {
    type Output = OptionNode<T>;

    fn index(&self, id: OptionId) -> &Self::Output {
        &self.nodes[id]
    }
}

impl<T> IndexMut<OptionId> for OptionTree<T> {
    fn index_mut(&mut self, id: OptionId) -> &mut Self::Output {
        &mut self.nodes[id]
    }
}
