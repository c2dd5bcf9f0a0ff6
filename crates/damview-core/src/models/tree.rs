use serde::{Deserialize, Serialize};

use super::scheme::NodeScheme;

/// Folder/album tree node.
///
/// `children` is `None` until the node's subtree has been fetched; an empty
/// vector means "fetched, and has no children". `open` and `loading` are view
/// state and never come from the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    pub scheme: NodeScheme,
    /// Child count hint. Not authoritative.
    #[serde(default)]
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
    #[serde(default, skip_deserializing)]
    pub open: bool,
    #[serde(default, skip_deserializing)]
    pub loading: bool,
}

impl TreeNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, scheme: NodeScheme) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scheme,
            size: 0,
            children: None,
            open: false,
            loading: false,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Only folders expand in place; albums open a list query instead.
    pub fn is_expandable(&self) -> bool {
        self.scheme == NodeScheme::Folder
    }

    /// Whether the subtree has been fetched (possibly empty).
    pub fn has_cached_children(&self) -> bool {
        self.children.is_some()
    }

    /// Drop any nested children so the node enters the tree as "not yet fetched".
    pub fn into_unloaded(mut self) -> Self {
        self.children = None;
        self.open = false;
        self.loading = false;
        self
    }
}
