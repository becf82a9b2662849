//! Choosing which nodes of a built tree are shown.

use super::{DirTree, NodeId};

/// Thresholds applied when selecting nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectConfig {
    /// Smallest total size shown.
    pub min_size: u64,
    /// Smallest share of the root's total shown, in percent (0..=100).
    pub min_percent: u8,
    /// Nodes this many levels below the root, or fewer, are always shown.
    pub min_depth: usize,
}

impl SelectConfig {
    /// Absolute threshold for a tree whose root totals `root_total`.
    pub fn threshold(&self, root_total: u64) -> u64 {
        effective_min_size(self.min_size, self.min_percent, root_total)
    }
}

/// The larger of `min_size` and `percent` of `root_total` (rounded down).
pub fn effective_min_size(min_size: u64, percent: u8, root_total: u64) -> u64 {
    let from_percent = u128::from(root_total) * u128::from(percent) / 100;
    min_size.max(from_percent as u64)
}

fn keep(tree: &DirTree, id: NodeId, min_size: u64, min_depth: usize) -> bool {
    tree.node(id).total_size >= min_size || min_depth > 0
}

/// Descendants of `id` that pass the thresholds, in depth-first pre-order.
///
/// A child is kept (and descended into) when its total reaches `min_size`
/// or while fewer than `min_depth` levels have been taken below `id`.
/// Children of a dropped node are never visited.
pub fn collect(tree: &DirTree, id: NodeId, min_size: u64, min_depth: usize) -> Vec<NodeId> {
    let mut out = Vec::new();
    // (node, remaining forced depth for its children)
    let mut pending: Vec<(NodeId, usize)> = vec![(id, min_depth)];
    while let Some((node, depth_left)) = pending.pop() {
        if node != id {
            out.push(node);
        }
        let children = tree.children(node);
        for &child in children.iter().rev() {
            if keep(tree, child, min_size, depth_left) {
                pending.push((child, depth_left.saturating_sub(1)));
            }
        }
    }
    out
}

/// Root followed by every collected node, ordered smallest first.
/// Equal sizes keep traversal order.
pub fn flat_listing(tree: &DirTree, config: &SelectConfig) -> Vec<NodeId> {
    let root = tree.root();
    let min_size = config.threshold(tree.node(root).total_size);
    let mut nodes = vec![root];
    nodes.extend(collect(tree, root, min_size, config.min_depth));
    nodes.sort_by_key(|id| tree.node(*id).total_size);
    nodes
}

/// Children of `id` (which sits `level` levels below the root) to show in
/// the tree view, largest first. Equal sizes keep enumeration order.
pub fn select_children(
    tree: &DirTree,
    id: NodeId,
    min_size: u64,
    level: usize,
    min_depth: usize,
) -> Vec<NodeId> {
    let mut selected: Vec<NodeId> = if min_depth <= level {
        tree.children(id)
            .iter()
            .copied()
            .filter(|c| tree.node(*c).total_size >= min_size)
            .collect()
    } else {
        tree.children(id).to_vec()
    };
    selected.sort_by(|a, b| tree.node(*b).total_size.cmp(&tree.node(*a).total_size));
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DirNode, NodeKind};

    fn add(tree: &mut DirTree, parent: NodeId, name: &str, total: u64) -> NodeId {
        tree.push(DirNode {
            name: name.to_string(),
            parent: Some(parent),
            kind: NodeKind::Directory,
            total_size: total,
            direct_size: 0,
            children: Vec::new(),
        })
    }

    /// root(1000) -> a(100) -> a1(60)
    ///            -> b(800) -> b1(500), b2(300)
    ///            -> c(100)
    fn sample() -> DirTree {
        let mut tree = DirTree::with_root("r".to_string());
        let root = tree.root();
        tree.node_mut(root).total_size = 1000;
        let a = add(&mut tree, root, "a", 100);
        add(&mut tree, a, "a1", 60);
        let b = add(&mut tree, root, "b", 800);
        add(&mut tree, b, "b1", 500);
        add(&mut tree, b, "b2", 300);
        add(&mut tree, root, "c", 100);
        tree
    }

    fn names(tree: &DirTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|id| tree.node(*id).name.clone()).collect()
    }

    #[test]
    fn percent_threshold_wins_when_larger() {
        assert_eq!(effective_min_size(50, 10, 1000), 100);
        assert_eq!(effective_min_size(500, 10, 1000), 500);
        assert_eq!(effective_min_size(0, 33, 10), 3);
        assert_eq!(effective_min_size(0, 100, u64::MAX), u64::MAX);
    }

    #[test]
    fn collect_everything_in_preorder() {
        let tree = sample();
        let all = collect(&tree, tree.root(), 0, 0);
        assert_eq!(names(&tree, &all), ["a", "a1", "b", "b1", "b2", "c"]);
    }

    #[test]
    fn collect_prunes_below_threshold_transitively() {
        let tree = sample();
        let big = collect(&tree, tree.root(), 300, 0);
        assert_eq!(names(&tree, &big), ["b", "b1", "b2"]);
    }

    #[test]
    fn collect_threshold_is_inclusive() {
        let tree = sample();
        let ids = collect(&tree, tree.root(), 500, 0);
        assert_eq!(names(&tree, &ids), ["b", "b1"]);
    }

    #[test]
    fn collect_min_depth_forces_top_levels() {
        let tree = sample();
        let ids = collect(&tree, tree.root(), 10_000, 1);
        assert_eq!(names(&tree, &ids), ["a", "b", "c"]);
        let ids = collect(&tree, tree.root(), 10_000, 2);
        assert_eq!(names(&tree, &ids).len(), 6);
    }

    #[test]
    fn flat_listing_includes_root_sorted_ascending() {
        let tree = sample();
        let config = SelectConfig {
            min_size: 100,
            ..SelectConfig::default()
        };
        let ids = flat_listing(&tree, &config);
        assert_eq!(names(&tree, &ids), ["a", "c", "b2", "b1", "b", "r"]);
    }

    #[test]
    fn flat_listing_uses_percent_of_root() {
        let tree = sample();
        let config = SelectConfig {
            min_size: 0,
            min_percent: 50,
            min_depth: 0,
        };
        let ids = flat_listing(&tree, &config);
        assert_eq!(names(&tree, &ids), ["b1", "b", "r"]);
    }

    #[test]
    fn select_children_sorts_descending_and_stable() {
        let tree = sample();
        let ids = select_children(&tree, tree.root(), 0, 0, 0);
        assert_eq!(names(&tree, &ids), ["b", "a", "c"]);
    }

    #[test]
    fn select_children_filters_only_past_min_depth() {
        let tree = sample();
        let ids = select_children(&tree, tree.root(), 200, 0, 0);
        assert_eq!(names(&tree, &ids), ["b"]);
        let ids = select_children(&tree, tree.root(), 200, 0, 1);
        assert_eq!(names(&tree, &ids), ["b", "a", "c"]);
        let b = tree.child_named(tree.root(), "b").unwrap();
        let ids = select_children(&tree, b, 400, 1, 1);
        assert_eq!(names(&tree, &ids), ["b1"]);
    }
}
