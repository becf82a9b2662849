use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use walkdir::WalkDir;

use super::{DirNode, DirTree, NodeId, NodeKind, ScanConfig};
use crate::error::WalkError;
use crate::report::Reporter;

/// A directory whose entries are still being read.
struct Frame {
    id: NodeId,
    depth: usize,
    path: PathBuf,
    /// Sum of the totals of finished sub-directories.
    subdir_total: u64,
    /// Own entry cost plus every entry not walked as a directory.
    direct: u64,
    has_subdirs: bool,
    /// Largest direct entry so far; the first one seen wins ties.
    largest: Option<(u64, String)>,
}

impl Frame {
    fn new(id: NodeId, depth: usize, path: &Path, own_cost: u64) -> Self {
        Self {
            id,
            depth,
            path: path.to_path_buf(),
            subdir_total: 0,
            direct: own_cost,
            has_subdirs: false,
            largest: None,
        }
    }

    fn add_direct(&mut self, name: String, cost: u64) {
        self.direct = self.direct.saturating_add(cost);
        match &self.largest {
            Some((max, _)) if cost <= *max => {}
            _ => self.largest = Some((cost, name)),
        }
    }
}

/// Build the tree from a root path.
///
/// Single pass, depth first. Directories are opened as walkdir reaches
/// them and finalized once the walk moves back above their depth, so a
/// node's size is only known after all of its sub-directories are done.
/// Filesystem errors go to `reporter` and never stop the walk.
pub fn build_tree(root: &Path, config: &ScanConfig, reporter: &mut dyn Reporter) -> DirTree {
    let mut tree = DirTree::with_root(root.to_string_lossy().into_owned());
    let mut stack: Vec<Frame> = Vec::new();
    let mut root_seen = false;
    let mut cancelled = false;

    let mut walker = WalkDir::new(root).follow_links(false).into_iter();
    while let Some(item) = walker.next() {
        if config.cancel.load(Ordering::Relaxed) {
            tracing::debug!("walk cancelled");
            cancelled = true;
            break;
        }

        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf);
                let depth = err.depth();
                let source = into_io(err);
                let walk_err = classify_error(&mut tree, &mut stack, path, depth, source, config);
                reporter.error(&walk_err);
                continue;
            }
        };

        let depth = entry.depth();
        finish_frames(&mut tree, &mut stack, depth, config);

        if depth == 0 {
            root_seen = true;
            reporter.reading(entry.path());
            let own_cost = match entry.metadata() {
                Ok(meta) => config.size_mode.cost(&meta),
                Err(err) => {
                    reporter.error(&metadata_error(entry.path(), err));
                    0
                }
            };
            if !entry.file_type().is_dir() {
                reporter.error(&WalkError::OpenDir {
                    path: entry.path().to_path_buf(),
                    source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
                });
            }
            stack.push(Frame::new(tree.root(), 0, entry.path(), own_cost));
            continue;
        }

        let walkdir_descends = entry.file_type().is_dir();
        let name = entry.file_name().to_string_lossy().into_owned();
        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(err) => {
                reporter.error(&metadata_error(entry.path(), err));
                if walkdir_descends {
                    walker.skip_current_dir();
                }
                continue;
            }
        };
        let cost = config.size_mode.cost(&meta);
        let Some(parent) = stack.last_mut() else {
            continue;
        };
        tracing::trace!(path = %entry.path().display(), cost, "entry");

        let path_text = entry.path().to_string_lossy();
        if meta.is_dir() && !config.ignore.is_ignored(&name, &path_text) {
            parent.has_subdirs = true;
            let parent_id = parent.id;
            reporter.reading(entry.path());
            let id = tree.push(DirNode {
                name,
                parent: Some(parent_id),
                kind: NodeKind::Directory,
                total_size: 0,
                direct_size: 0,
                children: Vec::new(),
            });
            stack.push(Frame::new(id, depth, entry.path(), cost));
        } else {
            if walkdir_descends {
                walker.skip_current_dir();
            }
            parent.add_direct(name, cost);
        }
    }

    // The root could not be stat'ed; it cannot be listed either.
    if !root_seen && !cancelled {
        if let Err(source) = fs::read_dir(root) {
            reporter.error(&WalkError::OpenDir {
                path: root.to_path_buf(),
                source,
            });
        }
    }

    finish_frames(&mut tree, &mut stack, 0, config);
    reporter.finished(root);
    tree
}

/// Finalize every open directory at `depth` or deeper, folding each total
/// into the directory below it on the stack.
fn finish_frames(tree: &mut DirTree, stack: &mut Vec<Frame>, depth: usize, config: &ScanConfig) {
    while stack.last().is_some_and(|f| f.depth >= depth) {
        let Some(frame) = stack.pop() else { break };
        let total = finish_frame(tree, frame, config);
        if let Some(parent) = stack.last_mut() {
            parent.subdir_total = parent.subdir_total.saturating_add(total);
        }
    }
}

/// Set the sizes of a finished directory and either break its direct
/// content out as a sibling of its sub-directories or, when it has none,
/// annotate its own label. Returns the directory's total.
fn finish_frame(tree: &mut DirTree, frame: Frame, config: &ScanConfig) -> u64 {
    let total = frame.subdir_total.saturating_add(frame.direct);
    let format = config.label_format;

    if frame.has_subdirs && total != 0 {
        let name = match &frame.largest {
            Some((max, entry)) => format!(
                "(directory content, max: {} for {})",
                format.display(*max),
                entry
            ),
            None => "(directory)".to_string(),
        };
        tree.push(DirNode {
            name,
            parent: Some(frame.id),
            kind: NodeKind::DirectContent,
            total_size: frame.direct,
            direct_size: frame.direct,
            children: Vec::new(),
        });
    } else if let Some((max, entry)) = &frame.largest {
        let node = tree.node_mut(frame.id);
        node.name = format!("{} (max: {} for {})", node.name, format.display(*max), entry);
    }

    let node = tree.node_mut(frame.id);
    node.total_size = total;
    node.direct_size = frame.direct;
    tracing::debug!(path = %frame.path.display(), total, direct = frame.direct, "directory done");
    total
}

fn metadata_error(path: &Path, err: walkdir::Error) -> WalkError {
    WalkError::Metadata {
        path: path.to_path_buf(),
        source: into_io(err),
    }
}

/// Map a walkdir error onto our taxonomy. An error naming a directory that
/// is currently open means it could not be listed; one naming any other
/// path is a failed stat. One with no path is a failed read of the
/// directory one level above `depth`: everything deeper is finished first
/// so the error lands on that directory.
fn classify_error(
    tree: &mut DirTree,
    stack: &mut Vec<Frame>,
    path: Option<PathBuf>,
    depth: usize,
    source: io::Error,
    config: &ScanConfig,
) -> WalkError {
    match path {
        Some(path) if stack.iter().any(|f| f.path == path) => WalkError::OpenDir { path, source },
        Some(path) => WalkError::Metadata { path, source },
        None => {
            finish_frames(tree, stack, depth.max(1), config);
            WalkError::ReadDir {
                path: stack.last().map(|f| f.path.clone()).unwrap_or_default(),
                source,
            }
        }
    }
}

fn into_io(err: walkdir::Error) -> io::Error {
    let text = err.to_string();
    err.into_io_error().unwrap_or_else(|| io::Error::other(text))
}
