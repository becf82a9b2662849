//! Text output of a built tree: indented tree view and flat listing.

use crate::size::SizeFormat;
use crate::tree::select::{flat_listing, select_children, SelectConfig};
use crate::tree::{DirTree, NodeId};
use std::io::{self, Write};

/// Width of the right-aligned size column.
pub const SIZE_WIDTH: usize = 15;

/// Which listings are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Every selected directory with its full path, smallest first.
    #[default]
    Flat,
    /// Indented tree, largest first at every level.
    Tree,
    /// Tree, then flat listing.
    Both,
}

/// Configuration for the rendering pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: SizeFormat,
    pub mode: OutputMode,
}

/// Sanitize control characters to avoid terminal control-sequence injection.
pub fn sanitize_terminal_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xFF {
                    out.push_str(&format!("\\x{:02X}", code));
                } else {
                    out.push_str(&format!("\\u{{{:X}}}", code));
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Box-drawing prefix for a node. `has_more[i]` tells whether the ancestor
/// (or, for the last element, the node itself) at level `i + 1` has a later
/// sibling. Empty for the root.
pub fn tree_prefix(has_more: &[bool]) -> String {
    let mut prefix = String::new();
    let Some((own, ancestors)) = has_more.split_last() else {
        return prefix;
    };
    for &more in ancestors {
        if more {
            prefix.push_str("\u{2502}   "); // │
        } else {
            prefix.push_str("    ");
        }
    }
    if *own {
        prefix.push_str("\u{251c}\u{2500}\u{2500} "); // ├──
    } else {
        prefix.push_str("\u{2514}\u{2500}\u{2500} "); // └──
    }
    prefix
}

fn size_column(format: SizeFormat, size: u64) -> String {
    format!("{:>width$}", format.display(size), width = SIZE_WIDTH)
}

/// Write the tree view: the root, then selected children largest first,
/// recursively.
pub fn write_tree<W: Write>(
    out: &mut W,
    tree: &DirTree,
    select: &SelectConfig,
    format: SizeFormat,
) -> io::Result<()> {
    let root = tree.root();
    let min_size = select.threshold(tree.node(root).total_size);
    write_tree_line(out, tree, root, &[], format)?;

    // One entry per open level: the selected siblings and the next to print.
    let mut levels: Vec<(Vec<NodeId>, usize)> =
        vec![(select_children(tree, root, min_size, 0, select.min_depth), 0)];
    let mut has_more: Vec<bool> = Vec::new();

    while let Some(frame) = levels.last_mut() {
        if frame.1 >= frame.0.len() {
            levels.pop();
            continue;
        }
        let id = frame.0[frame.1];
        frame.1 += 1;
        let more = frame.1 < frame.0.len();
        let level = levels.len();

        has_more.truncate(level - 1);
        has_more.push(more);
        write_tree_line(out, tree, id, &has_more, format)?;

        let children = select_children(tree, id, min_size, level, select.min_depth);
        levels.push((children, 0));
    }
    Ok(())
}

fn write_tree_line<W: Write>(
    out: &mut W,
    tree: &DirTree,
    id: NodeId,
    has_more: &[bool],
    format: SizeFormat,
) -> io::Result<()> {
    let node = tree.node(id);
    writeln!(
        out,
        "{} {}{}",
        size_column(format, node.total_size),
        tree_prefix(has_more),
        sanitize_terminal_text(&node.name)
    )
}

/// Write the flat listing: size and full path, smallest first.
pub fn write_flat<W: Write>(
    out: &mut W,
    tree: &DirTree,
    select: &SelectConfig,
    format: SizeFormat,
) -> io::Result<()> {
    for id in flat_listing(tree, select) {
        writeln!(
            out,
            "{} {}",
            size_column(format, tree.node(id).total_size),
            sanitize_terminal_text(&tree.path(id))
        )?;
    }
    Ok(())
}

/// Write whatever `config.mode` asks for.
pub fn write_report<W: Write>(
    out: &mut W,
    tree: &DirTree,
    select: &SelectConfig,
    config: &RenderConfig,
) -> io::Result<()> {
    match config.mode {
        OutputMode::Flat => write_flat(out, tree, select, config.format),
        OutputMode::Tree => write_tree(out, tree, select, config.format),
        OutputMode::Both => {
            write_tree(out, tree, select, config.format)?;
            write_flat(out, tree, select, config.format)
        }
    }
}
