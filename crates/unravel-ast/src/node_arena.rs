//! NodeArena: node storage, parent mapping and tree surgery.
//!
//! All mutation helpers keep parent pointers consistent: a node attached to
//! the tree has its parent set, a node removed by `splice_statements`,
//! `remove_statement` or `replace_node` has its parent reset to
//! `NodeIndex::NONE`.

use std::ops::Index;

use smallvec::SmallVec;
use tracing::trace;

use crate::base::NodeIndex;
use crate::node::NodeKind;

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl Index<NodeIndex> for NodeArena {
    type Output = Node;

    #[inline]
    fn index(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx.0 as usize]
    }
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Number of nodes ever allocated (attached or not).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ============================================================================
    // Allocation
    // ============================================================================

    /// Allocate a node and point its children's parent at it.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        let children = kind.children();
        self.nodes.push(Node {
            kind,
            parent: NodeIndex::NONE,
        });
        for child in children {
            self.set_parent(child, idx);
        }
        idx
    }

    // ============================================================================
    // Access
    // ============================================================================

    #[inline]
    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get(idx.0 as usize)
    }

    #[inline]
    pub fn kind(&self, idx: NodeIndex) -> &NodeKind {
        &self[idx].kind
    }

    #[inline]
    pub fn kind_mut(&mut self, idx: NodeIndex) -> &mut NodeKind {
        &mut self.nodes[idx.0 as usize].kind
    }

    #[inline]
    pub fn parent(&self, idx: NodeIndex) -> NodeIndex {
        self.get(idx).map_or(NodeIndex::NONE, |node| node.parent)
    }

    #[inline]
    pub fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if let Some(node) = self.nodes.get_mut(child.0 as usize) {
            node.parent = parent;
        }
    }

    pub fn children(&self, idx: NodeIndex) -> SmallVec<[NodeIndex; 4]> {
        self.get(idx)
            .map(|node| node.kind.children())
            .unwrap_or_default()
    }

    /// Ancestors of `idx`, nearest first (excluding `idx`).
    pub fn ancestors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        std::iter::successors(Some(self.parent(idx)), |&current| Some(self.parent(current)))
            .take_while(|idx| idx.is_some())
    }

    /// Whether `idx` is reachable from `root` through parent pointers.
    pub fn is_attached(&self, idx: NodeIndex, root: NodeIndex) -> bool {
        idx == root || self.ancestors(idx).any(|ancestor| ancestor == root)
    }

    /// Identifier name, if `idx` is an identifier.
    pub fn name(&self, idx: NodeIndex) -> Option<&str> {
        match self.get(idx).map(|node| &node.kind) {
            Some(NodeKind::Identifier { name }) => Some(name.as_str()),
            _ => None,
        }
    }

    /// String literal value, if `idx` is a string literal.
    pub fn string_value(&self, idx: NodeIndex) -> Option<&str> {
        match self.get(idx).map(|node| &node.kind) {
            Some(NodeKind::StringLiteral { value }) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Numeric literal value, if `idx` is a numeric literal.
    pub fn number_value(&self, idx: NodeIndex) -> Option<f64> {
        match self.get(idx).map(|node| &node.kind) {
            Some(NodeKind::NumericLiteral { value }) => Some(*value),
            _ => None,
        }
    }

    pub fn set_name(&mut self, idx: NodeIndex, new_name: &str) {
        if let NodeKind::Identifier { name } = self.kind_mut(idx) {
            name.clear();
            name.push_str(new_name);
        }
    }

    /// Statement list of a program, block or switch case.
    pub fn statements(&self, idx: NodeIndex) -> Option<&[NodeIndex]> {
        match self.get(idx).map(|node| &node.kind) {
            Some(NodeKind::Program { body }) | Some(NodeKind::BlockStatement { body }) => {
                Some(body.as_slice())
            }
            Some(NodeKind::SwitchCase { consequent, .. }) => Some(consequent.as_slice()),
            _ => None,
        }
    }

    fn statements_mut(&mut self, idx: NodeIndex) -> Option<&mut Vec<NodeIndex>> {
        match self.nodes.get_mut(idx.0 as usize).map(|node| &mut node.kind) {
            Some(NodeKind::Program { body }) | Some(NodeKind::BlockStatement { body }) => {
                Some(body)
            }
            Some(NodeKind::SwitchCase { consequent, .. }) => Some(consequent),
            _ => None,
        }
    }

    // ============================================================================
    // Mutation
    // ============================================================================

    /// Replace `delete_count` statements of `owner` starting at `start` with
    /// `items`. Returns the removed statements, which become detached.
    ///
    /// Returns an empty list and leaves the tree unchanged when `owner` has no
    /// statement list or the range is out of bounds.
    pub fn splice_statements(
        &mut self,
        owner: NodeIndex,
        start: usize,
        delete_count: usize,
        items: Vec<NodeIndex>,
    ) -> Vec<NodeIndex> {
        let Some(list) = self.statements_mut(owner) else {
            return Vec::new();
        };
        if start + delete_count > list.len() {
            trace!(?owner, start, delete_count, "splice out of bounds");
            return Vec::new();
        }
        let inserted = items.clone();
        let removed: Vec<NodeIndex> = list.splice(start..start + delete_count, items).collect();
        for &stmt in &removed {
            if self.parent(stmt) == owner {
                self.set_parent(stmt, NodeIndex::NONE);
            }
        }
        for stmt in inserted {
            self.set_parent(stmt, owner);
        }
        removed
    }

    /// Take every statement out of `owner`'s list, leaving it empty.
    pub fn take_statements(&mut self, owner: NodeIndex) -> Vec<NodeIndex> {
        let len = self.statements(owner).map_or(0, <[NodeIndex]>::len);
        self.splice_statements(owner, 0, len, Vec::new())
    }

    /// Remove a statement from the list that owns it. Returns `false` when
    /// the statement's parent has no statement list.
    pub fn remove_statement(&mut self, stmt: NodeIndex) -> bool {
        let owner = self.parent(stmt);
        let Some(position) = self
            .statements(owner)
            .and_then(|list| list.iter().position(|&s| s == stmt))
        else {
            return false;
        };
        !self.splice_statements(owner, position, 1, Vec::new()).is_empty()
    }

    /// Detach a statement from the list that owns it. Nodes in fixed child
    /// slots cannot be detached without a replacement; use `replace_node`.
    pub fn detach(&mut self, idx: NodeIndex) -> bool {
        if self.statements(self.parent(idx)).is_some() {
            return self.remove_statement(idx);
        }
        false
    }

    /// Put `new` into the slot `old` occupies in its parent. `old` becomes
    /// detached. Returns `false` when `old` has no parent.
    pub fn replace_node(&mut self, old: NodeIndex, new: NodeIndex) -> bool {
        let parent = self.parent(old);
        if parent.is_none() {
            return false;
        }
        if !self.kind_mut(parent).replace_child(old, new) {
            return false;
        }
        self.set_parent(new, parent);
        self.set_parent(old, NodeIndex::NONE);
        true
    }

    // ============================================================================
    // Structural operations
    // ============================================================================

    /// Deep copy of the subtree rooted at `idx`. The copy is detached.
    pub fn clone_subtree(&mut self, idx: NodeIndex) -> NodeIndex {
        let mut kind = self.kind(idx).clone();
        kind.visit_children_mut(|child| *child = self.clone_subtree(*child));
        self.alloc(kind)
    }

    /// Structural equality: same kinds, same payloads, structurally equal
    /// children. Node identity is irrelevant.
    pub fn structurally_equal(&self, a: NodeIndex, b: NodeIndex) -> bool {
        if a == b {
            return true;
        }
        let (Some(left), Some(right)) = (self.get(a), self.get(b)) else {
            return false;
        };
        if left.kind.shape() != right.kind.shape() {
            return false;
        }
        let left_children = left.kind.children();
        let right_children = right.kind.children();
        left_children.len() == right_children.len()
            && left_children
                .iter()
                .zip(right_children.iter())
                .all(|(&l, &r)| self.structurally_equal(l, r))
    }

    /// Every node of the subtree rooted at `idx`, pre-order.
    pub fn descendants(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if self.get(current).is_none() {
                continue;
            }
            out.push(current);
            let children = self.children(current);
            stack.extend(children.into_iter().rev());
        }
        out
    }
}

#[cfg(test)]
#[path = "tests/node_arena_tests.rs"]
mod tests;
