//! Result hierarchy derived from path-encoded column names.

use indexmap::IndexMap;
use quarry_core::{PATH_SEPARATOR, ResponseColumn};

/// Columns of the top-level object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RootGroup {
    pub key_fields: Vec<ResponseColumn>,
    /// Every flat column, keys included, in declaration order.
    pub fields: Vec<ResponseColumn>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HierarchyNode {
    pub path: Vec<String>,
    pub parent_path: Vec<String>,
    pub key_fields: Vec<ResponseColumn>,
    pub data_fields: Vec<ResponseColumn>,
}

impl HierarchyNode {
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Arena key: the path joined with `__`.
    pub fn key(&self) -> String {
        self.path.join(PATH_SEPARATOR)
    }

    /// Name of the slot holding this node in its parent.
    pub fn slot(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// Key fields followed by data fields.
    pub fn columns(&self) -> impl Iterator<Item = &ResponseColumn> {
        self.key_fields.iter().chain(&self.data_fields)
    }
}

/// Arena of nodes indexed by path, ordered by depth then path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hierarchy {
    pub root: RootGroup,
    nodes: IndexMap<String, HierarchyNode>,
}

impl Hierarchy {
    /// Build from nodes; they are sorted by ascending depth, then path.
    pub fn new(root: RootGroup, mut nodes: Vec<HierarchyNode>) -> Self {
        nodes.sort_by(|a, b| a.depth().cmp(&b.depth()).then_with(|| a.path.cmp(&b.path)));
        Self {
            root,
            nodes: nodes.into_iter().map(|n| (n.key(), n)).collect(),
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.values()
    }

    pub fn get(&self, key: &str) -> Option<&HierarchyNode> {
        self.nodes.get(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children of the node at `path` (empty path: the root).
    pub fn children_of<'a>(
        &'a self,
        path: &'a [String],
    ) -> impl Iterator<Item = &'a HierarchyNode> + 'a {
        self.nodes.values().filter(move |n| n.parent_path == path)
    }

    pub fn parent_of(&self, node: &HierarchyNode) -> Option<&HierarchyNode> {
        if node.parent_path.is_empty() {
            return None;
        }
        self.nodes.get(&node.parent_path.join(PATH_SEPARATOR))
    }
}
