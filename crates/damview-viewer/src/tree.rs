//! Tree Node Store
//!
//! Owns the folder/album hierarchy as a nested tree. Nodes are located by a
//! recursive depth-first search over their ids; the Asset Service is trusted to
//! return a tree, so no cycle detection is done.
//!
//! Invariant: a node with `open == true` always has `children == Some(_)`.

use damview_core::models::TreeNode;

use crate::state::StoreError;

/// Outcome of an expand/toggle request on one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Children were cached; the node is now open.
    Opened,
    /// The node was open and is now closed. Children stay cached.
    Collapsed,
    /// Children are unknown. The node is marked `loading` and a subtree fetch must follow.
    FetchRequired,
    /// A subtree fetch for this node is already in flight.
    Pending,
    /// Albums and the library root never expand in place.
    NotExpandable,
    NotFound,
}

/// One row of the presentation projection: a node and its depth below the roots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRow<'a> {
    pub depth: usize,
    pub node: &'a TreeNode,
}

#[derive(Debug, Clone, Default)]
pub struct TreeStore {
    roots: Vec<TreeNode>,
    error: Option<StoreError>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    /// Install the top-level nodes. Any nested children from the wire are
    /// dropped so every node starts as "not yet fetched".
    pub fn load_root(&mut self, nodes: Vec<TreeNode>) {
        self.roots = nodes.into_iter().map(TreeNode::into_unloaded).collect();
        self.error = None;
    }

    /// A failed root load keeps whatever tree was there before.
    pub fn fail_root(&mut self, error: StoreError) {
        self.error = Some(error);
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        find_in(&self.roots, id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut TreeNode> {
        find_in_mut(&mut self.roots, id)
    }

    /// Open a node, or mark it loading when its children still have to be fetched.
    pub fn begin_expand(&mut self, id: &str) -> Expansion {
        let Some(node) = self.find_mut(id) else {
            return Expansion::NotFound;
        };
        if !node.is_expandable() {
            return Expansion::NotExpandable;
        }
        if node.loading {
            return Expansion::Pending;
        }
        if node.children.is_some() {
            node.open = true;
            return Expansion::Opened;
        }
        // `size` is only a hint: an unknown subtree is always fetched
        node.loading = true;
        Expansion::FetchRequired
    }

    /// Fold a subtree response into the node and open it.
    ///
    /// Returns `false` if the node is no longer in the tree or no longer
    /// loading (e.g. the root was reloaded while the fetch was in flight); the
    /// response is then dropped.
    pub fn finish_expand(&mut self, id: &str, children: Vec<TreeNode>) -> bool {
        let Some(node) = self.find_mut(id) else {
            tracing::debug!(node_id = %id, "Dropping subtree for a node no longer in the tree");
            return false;
        };
        if !node.loading {
            tracing::debug!(node_id = %id, "Dropping subtree for a node that is not loading");
            return false;
        }
        node.children = Some(children.into_iter().map(TreeNode::into_unloaded).collect());
        node.open = true;
        node.loading = false;
        self.error = None;
        true
    }

    /// A failed subtree fetch leaves the node closed with its children unknown.
    pub fn fail_expand(&mut self, id: &str, error: StoreError) {
        if let Some(node) = self.find_mut(id) {
            node.loading = false;
            node.open = node.open && node.children.is_some();
        }
        self.error = Some(error);
    }

    /// Close a node without discarding its cached children.
    pub fn collapse(&mut self, id: &str) -> bool {
        match self.find_mut(id) {
            Some(node) if node.open => {
                node.open = false;
                true
            }
            _ => false,
        }
    }

    /// Collapse when open, expand otherwise.
    pub fn toggle_subtree(&mut self, id: &str) -> Expansion {
        match self.find(id) {
            None => Expansion::NotFound,
            Some(node) if node.open => {
                self.collapse(id);
                Expansion::Collapsed
            }
            Some(_) => self.begin_expand(id),
        }
    }

    /// Pure projection for presentation: roots plus the children of open nodes,
    /// depth-first. Collapsed subtrees are not visited.
    pub fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
        let mut rows = Vec::new();
        collect_visible(&self.roots, 0, &mut rows);
        rows
    }
}

fn find_in<'a>(nodes: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = node.children.as_deref().and_then(|c| find_in(c, id)) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(nodes: &'a mut [TreeNode], id: &str) -> Option<&'a mut TreeNode> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = node.children.as_deref_mut().and_then(|c| find_in_mut(c, id)) {
            return Some(found);
        }
    }
    None
}

fn collect_visible<'a>(nodes: &'a [TreeNode], depth: usize, rows: &mut Vec<VisibleRow<'a>>) {
    for node in nodes {
        rows.push(VisibleRow { depth, node });
        if node.open {
            if let Some(children) = node.children.as_deref() {
                collect_visible(children, depth + 1, rows);
            }
        }
    }
}
