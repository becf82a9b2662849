//! Directory-size tree: building, filtering and sorting.

pub mod select;
pub(crate) mod walk;

use crate::ignore::IgnoreMatcher;
use crate::report::Reporter;
use crate::size::{SizeFormat, SizeMode};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub use walk::build_tree;

/// Index of a node in its [`DirTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A directory that was walked.
    Directory,
    /// The files (and ignored sub-directories) directly inside the parent,
    /// broken out next to the parent's real sub-directories.
    DirectContent,
}

/// One node of a [`DirTree`].
#[derive(Debug, Clone, PartialEq)]
pub struct DirNode {
    /// Display label (may carry largest-entry annotations).
    pub name: String,
    /// Enclosing node; `None` for the root.
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
    /// Everything beneath this node.
    pub total_size: u64,
    /// Cost of entries that were not walked as directories, plus the
    /// directory's own entry.
    pub direct_size: u64,
    /// Walked sub-directories in enumeration order, then at most one
    /// [`NodeKind::DirectContent`] node.
    pub children: Vec<NodeId>,
}

impl DirNode {
    pub fn is_synthetic(&self) -> bool {
        self.kind == NodeKind::DirectContent
    }
}

/// Arena holding a whole walked tree. Nodes refer to each other by index,
/// so the parent links own nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct DirTree {
    nodes: Vec<DirNode>,
}

impl DirTree {
    pub(crate) fn with_root(name: String) -> Self {
        Self {
            nodes: vec![DirNode {
                name,
                parent: None,
                kind: NodeKind::Directory,
                total_size: 0,
                direct_size: 0,
                children: Vec::new(),
            }],
        }
    }

    pub(crate) fn push(&mut self, node: DirNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(parent) = node.parent {
            self.nodes[parent.0].children.push(id);
        }
        self.nodes.push(node);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut DirNode {
        &mut self.nodes[id.0]
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &DirNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// All node ids, parents before their children.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Number of parent links between `id` and the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self.node(id).parent;
        while let Some(p) = cur {
            depth += 1;
            cur = self.node(p).parent;
        }
        depth
    }

    /// Labels from the root down to `id`, joined with `/`.
    pub fn path(&self, id: NodeId) -> String {
        let mut labels = vec![self.node(id).name.as_str()];
        let mut cur = self.node(id).parent;
        while let Some(p) = cur {
            labels.push(self.node(p).name.as_str());
            cur = self.node(p).parent;
        }
        labels.reverse();
        labels.join("/")
    }

    /// Find a direct child by its label.
    pub fn child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.node(*c).name == name)
    }

    /// The synthetic direct-content child of `id`, if one was created.
    pub fn direct_content(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.node(*c).is_synthetic())
    }
}

/// Configuration for tree building.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Which metadata number counts as an entry's cost.
    pub size_mode: SizeMode,
    /// How sizes embedded in node labels are written.
    pub label_format: SizeFormat,
    /// Directories counted as plain entries and not walked.
    pub ignore: IgnoreMatcher,
    /// Checked once per entry; when set the walk stops early.
    pub cancel: Arc<AtomicBool>,
}

/// Abstraction over tree construction so it can be swapped or mocked.
pub trait TreeBuilder {
    fn build_tree(&self, root: &Path, config: &ScanConfig, reporter: &mut dyn Reporter)
        -> DirTree;
}

/// Default `TreeBuilder` that delegates to the walkdir-based implementation.
pub struct WalkdirTreeBuilder;

impl TreeBuilder for WalkdirTreeBuilder {
    fn build_tree(
        &self,
        root: &Path,
        config: &ScanConfig,
        reporter: &mut dyn Reporter,
    ) -> DirTree {
        build_tree(root, config, reporter)
    }
}
