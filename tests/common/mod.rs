#![allow(dead_code)]

use dirsize::ignore::IgnoreMatcher;
use dirsize::report::CollectingReporter;
use dirsize::size::SizeMode;
use dirsize::tree::{build_tree, DirTree, NodeId, ScanConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// ScanConfig counting byte lengths, so sizes follow what the fixture wrote.
pub fn logical_config() -> ScanConfig {
    ScanConfig {
        size_mode: SizeMode::Logical,
        ..ScanConfig::default()
    }
}

/// Logical config ignoring the given patterns.
pub fn ignoring(patterns: &[&str]) -> ScanConfig {
    let owned: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
    ScanConfig {
        ignore: IgnoreMatcher::from_patterns(&owned),
        ..logical_config()
    }
}

/// Create a directory structure from `(relative path, size)` pairs.
/// Paths ending with '/' create directories; others create files of `size` bytes.
pub fn create_fixture(entries: &[(&str, usize)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (p, size) in entries {
        let full = tmp.path().join(p);
        if p.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
        } else {
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, vec![b'x'; *size]).unwrap();
        }
    }
    tmp
}

/// Logical size of the entry itself (not followed).
pub fn own_size(path: &Path) -> u64 {
    fs::symlink_metadata(path).unwrap().len()
}

pub fn build(root: &Path, config: &ScanConfig) -> (DirTree, CollectingReporter) {
    let mut reporter = CollectingReporter::default();
    let tree = build_tree(root, config, &mut reporter);
    (tree, reporter)
}

/// Walk down from the root following directory names. A name also matches
/// its annotated form `name (max: ...)`.
pub fn find(tree: &DirTree, names: &[&str]) -> NodeId {
    let mut id = tree.root();
    for name in names {
        let annotated = format!("{name} (max: ");
        id = tree
            .children(id)
            .iter()
            .copied()
            .find(|c| {
                let label = &tree.node(*c).name;
                label == name || label.starts_with(&annotated)
            })
            .unwrap_or_else(|| panic!("no child {name:?} under {:?}", tree.node(id).name));
    }
    id
}

/// Every directory's total is its direct content plus its walked
/// sub-directories; a direct-content node carries exactly the direct part.
pub fn assert_aggregation(tree: &DirTree) {
    for id in tree.ids() {
        let node = tree.node(id);
        let subdirs: u64 = node
            .children
            .iter()
            .map(|c| tree.node(*c))
            .filter(|c| !c.is_synthetic())
            .map(|c| c.total_size)
            .sum();
        assert_eq!(
            node.total_size,
            node.direct_size + subdirs,
            "aggregation broken at {}",
            tree.path(id)
        );
        if let Some(synthetic) = tree.direct_content(id) {
            assert_eq!(tree.node(synthetic).total_size, node.direct_size);
            let all: u64 = node.children.iter().map(|c| tree.node(*c).total_size).sum();
            assert_eq!(node.total_size, all);
        }
    }
}
