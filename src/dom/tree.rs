//! The element tree: insert, remove, reparent, walk, focus paths.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{ElementId, ElementNode};
use crate::visual::Element;

const NO_CHILDREN: &[ElementId] = &[];

/// Arena of elements with parent/child links.
///
/// Elements live in one `SlotMap`; links are kept in secondary maps so that
/// lookups are O(1) and removing a subtree is O(subtree size). Removed ids
/// never alias a later element, which lets hotkey entries and running
/// animations detect that their element is gone.
pub struct Dom {
    nodes: SlotMap<ElementId, ElementNode>,
    children: SecondaryMap<ElementId, Vec<ElementId>>,
    parent: SecondaryMap<ElementId, ElementId>,
    root: Option<ElementId>,
}

impl Dom {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a parentless element. The first one inserted becomes the root.
    pub fn insert(&mut self, node: ElementNode) -> ElementId {
        let id = self.nodes.insert(node);
        self.children.insert(id, Vec::new());
        self.root.get_or_insert(id);
        id
    }

    /// Insert an element under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not in the tree.
    pub fn insert_child(&mut self, parent: ElementId, node: ElementNode) -> ElementId {
        assert!(self.nodes.contains_key(parent), "parent element does not exist");
        let id = self.nodes.insert(node);
        self.children.insert(id, Vec::new());
        self.attach(id, parent);
        id
    }

    fn attach(&mut self, id: ElementId, parent: ElementId) {
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
        }
    }

    fn detach(&mut self, id: ElementId) {
        if let Some(old) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(old) {
                siblings.retain(|&child| child != id);
            }
        }
    }

    /// Remove an element and its whole subtree. Returns the removed element.
    pub fn remove(&mut self, id: ElementId) -> Option<ElementNode> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        self.detach(id);
        if self.root == Some(id) {
            self.root = None;
        }

        let mut removed = None;
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                queue.extend(kids);
            }
            self.parent.remove(current);
            let node = self.nodes.remove(current);
            if current == id {
                removed = node;
            }
        }
        removed
    }

    /// Move `id` (with its subtree) under `new_parent`.
    ///
    /// # Panics
    ///
    /// Panics if either element is missing, or if `new_parent` lies inside
    /// the subtree of `id`.
    pub fn reparent(&mut self, id: ElementId, new_parent: ElementId) {
        assert!(self.contains(id) && self.contains(new_parent), "element does not exist");
        assert!(
            id != new_parent && !self.ancestors(new_parent).contains(&id),
            "cannot move an element into its own subtree"
        );
        self.detach(id);
        self.attach(id, new_parent);
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.parent.get(id).copied()
    }

    /// Children in insertion order; empty for leaves and unknown ids.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children.get(id).map_or(NO_CHILDREN, Vec::as_slice)
    }

    /// Ancestors of `id`, nearest first, not including `id`.
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        std::iter::successors(self.parent(id), |&p| self.parent(p)).collect()
    }

    /// `id` followed by its ancestors: the chain of elements whose hotkey
    /// scopes apply while `id` has focus. Empty if `id` is not in the tree.
    pub fn focus_path(&self, id: ElementId) -> Vec<ElementId> {
        if !self.contains(id) {
            return Vec::new();
        }
        std::iter::successors(Some(id), |&p| self.parent(p)).collect()
    }

    pub fn get(&self, id: ElementId) -> Option<&ElementNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementNode> {
        self.nodes.get_mut(id)
    }

    /// The animatable properties of an element.
    pub fn properties_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id).map(|node| &mut node.properties)
    }

    /// First element with the given name, in depth-first order from the root.
    pub fn find_by_name(&self, name: &str) -> Option<ElementId> {
        let root = self.root?;
        self.walk_depth_first(root)
            .into_iter()
            .find(|&id| self.nodes[id].name == name)
    }

    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order traversal of the subtree at `start`.
    pub fn walk_depth_first(&self, start: ElementId) -> Vec<ElementId> {
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            order.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        order
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
