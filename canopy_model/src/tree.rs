// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: arena, normalization, structural edits, queries.

use serde_json::{Map, Value, json};

use crate::types::{NodeId, TreeError};

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    label: String,
}

impl Slot {
    fn new(generation: u32, label: String) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            label,
        }
    }
}

/// The mind-map tree: a root plus recursive labeled children.
///
/// Nodes live in slots; removing a node frees its slot for reuse with a
/// bumped generation, so old [`NodeId`]s never alias a new node. The tree is
/// the single owner of all structure — derived views (layout, scene) key off
/// ids only.
#[derive(Clone, Debug)]
pub struct MindTree {
    /// slots
    nodes: Vec<Option<Slot>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
}

impl MindTree {
    /// Build a tree from boundary JSON, defaulting every missing `children`
    /// field to an empty sequence.
    ///
    /// The root takes its label from `name` or, failing that, `topic`; every
    /// other node must carry a string `name`. Anything else is rejected with
    /// [`TreeError::Schema`] and no partial tree is produced.
    pub fn normalize(raw: &Value) -> Result<Self, TreeError> {
        let obj = raw
            .as_object()
            .ok_or_else(|| TreeError::Schema("root is not an object".into()))?;
        let root_label = label_field(obj, true)?;

        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
        };
        let root = tree.alloc(root_label);
        tree.root = root;

        // Iterative walk; the input depth is not under our control.
        let mut stack: Vec<(&Value, NodeId)> = vec![(raw, root)];
        while let Some((value, id)) = stack.pop() {
            let obj = value
                .as_object()
                .ok_or_else(|| TreeError::Schema("node is not an object".into()))?;
            let children = match obj.get("children") {
                None | Some(Value::Null) => &[],
                Some(Value::Array(items)) => items.as_slice(),
                Some(other) => {
                    return Err(TreeError::Schema(format!(
                        "children is not an array (got {other})"
                    )));
                }
            };
            for child in children {
                let child_obj = child
                    .as_object()
                    .ok_or_else(|| TreeError::Schema("child node is not an object".into()))?;
                let label = label_field(child_obj, false)?;
                let child_id = tree.alloc(label);
                tree.link_parent(child_id, id);
                stack.push((child, child_id));
            }
        }
        Ok(tree)
    }

    /// Serialize back to the wire schema: `topic` on the root, `name`
    /// elsewhere, `children` always present.
    pub fn to_value(&self) -> Value {
        // Children before parents, so every child's value is ready when its
        // parent assembles; depth is input-controlled, same as `normalize`.
        let order = self.descendants(self.root);
        let mut built: Vec<Option<Value>> = self.nodes.iter().map(|_| None).collect();
        for &id in order.iter().rev() {
            let children: Vec<Value> = self
                .children_of(id)
                .iter()
                .filter_map(|&c| built[c.idx()].take())
                .collect();
            let key = if id == self.root { "topic" } else { "name" };
            built[id.idx()] =
                Some(json!({ key: self.label(id).unwrap_or_default(), "children": children }));
        }
        built[self.root.idx()].take().unwrap_or(Value::Null)
    }

    /// The root node id. Always alive.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Label of a live node, or `None` for stale ids.
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.slot(id).map(|s| s.label.as_str())
    }

    /// Children of a node, or an empty slice for stale ids.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map(|s| s.children.as_slice()).unwrap_or(&[])
    }

    /// Parent of a live node, or `None` for the root and stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|s| s.parent)
    }

    /// Distance from the root (root = 0), or `None` for stale ids.
    pub fn depth_of(&self, id: NodeId) -> Option<usize> {
        if !self.is_alive(id) {
            return None;
        }
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            depth += 1;
            current = parent;
        }
        Some(depth)
    }

    /// The first-level ancestor (the branch) a node descends from.
    ///
    /// Returns the node itself at depth 1 and `None` for the root.
    pub fn branch_of(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_alive(id) || id == self.root {
            return None;
        }
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            if parent == self.root {
                return Some(current);
            }
            current = parent;
        }
        None
    }

    /// Index of a node's branch among the root's children.
    ///
    /// Drives the branch color cycle. `None` for the root and stale ids.
    pub fn branch_index(&self, id: NodeId) -> Option<usize> {
        let branch = self.branch_of(id)?;
        self.children_of(self.root).iter().position(|&c| c == branch)
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Pre-order traversal of a subtree (explicit stack), including `id`.
    ///
    /// Children are visited in order. Empty for stale ids.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        if !self.is_alive(id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            for &child in self.children_of(current).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Append a new leaf `{label, children: []}` under `parent`.
    ///
    /// Duplicate labels are allowed; identity is the returned [`NodeId`].
    pub fn insert_child(&mut self, parent: NodeId, label: &str) -> Result<NodeId, TreeError> {
        if !self.is_alive(parent) {
            return Err(TreeError::NotFound);
        }
        let id = self.alloc(label.to_owned());
        self.link_parent(id, parent);
        Ok(id)
    }

    /// Remove `id` and its whole subtree.
    ///
    /// Removing the root is refused with [`TreeError::RootRemoval`] and no
    /// state change; stale ids yield [`TreeError::NotFound`].
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.root && self.is_alive(id) {
            return Err(TreeError::RootRemoval);
        }
        if !self.is_alive(id) {
            return Err(TreeError::NotFound);
        }
        if let Some(parent) = self.parent_of(id) {
            self.unlink_parent(id, parent);
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(slot) = self.nodes[current.idx()].take() {
                stack.extend(slot.children);
                self.free_list.push(current.idx());
            }
        }
        Ok(())
    }

    /// Rename a node in place.
    ///
    /// The new label is trimmed first; an empty result or an unchanged label
    /// is a no-op signaled by `Ok(false)`.
    pub fn rename(&mut self, id: NodeId, new_label: &str) -> Result<bool, TreeError> {
        if !self.is_alive(id) {
            return Err(TreeError::NotFound);
        }
        let trimmed = new_label.trim();
        let slot = self.slot_mut(id).ok_or(TreeError::NotFound)?;
        if trimmed.is_empty() || trimmed == slot.label {
            return Ok(false);
        }
        slot.label = trimmed.to_owned();
        Ok(true)
    }

    /// Append externally supplied sub-points as leaves, in order.
    pub fn append_expansion<I>(&mut self, id: NodeId, labels: I) -> Result<Vec<NodeId>, TreeError>
    where
        I: IntoIterator<Item = String>,
    {
        if !self.is_alive(id) {
            return Err(TreeError::NotFound);
        }
        let mut added = Vec::new();
        for label in labels {
            let child = self.alloc(label);
            self.link_parent(child, id);
            added.push(child);
        }
        Ok(added)
    }

    // --- internals ---

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        let slot = self.nodes.get(id.idx())?.as_ref()?;
        (slot.generation == id.1).then_some(slot)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        let slot = self.nodes.get_mut(id.idx())?.as_mut()?;
        (slot.generation == id.1).then_some(slot)
    }

    fn alloc(&mut self, label: String) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Slot::new(generation, label));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            NodeId::new(idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Slot::new(generation, label)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            NodeId::new((self.nodes.len() - 1) as u32, generation)
        }
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.slot_mut(parent) {
            p.children.push(id);
        }
        if let Some(s) = self.slot_mut(id) {
            s.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.slot_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(s) = self.slot_mut(id) {
            s.parent = None;
        }
    }
}

fn label_field(obj: &Map<String, Value>, is_root: bool) -> Result<String, TreeError> {
    let name = obj.get("name").and_then(Value::as_str);
    let topic = obj.get("topic").and_then(Value::as_str);
    match (name, topic, is_root) {
        (Some(n), _, _) => Ok(n.to_owned()),
        (None, Some(t), true) => Ok(t.to_owned()),
        _ => Err(TreeError::Schema("node lacks a usable label field".into())),
    }
}
