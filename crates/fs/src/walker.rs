use std::{
    fs,
    io::Result,
    ops::ControlFlow,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::entry::{EntryKind, FsEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkOrder {
    /// Directories are visited once, before their children.
    #[default]
    Pre,
    /// Directories are visited before and again after their children.
    PrePost,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Descend into directories. Otherwise each root is a single entry.
    pub recursive: bool,
    pub order: WalkOrder,
}

/// Depth-first physical walk over `roots`.
///
/// Symlinks are reported, never followed. Entries that cannot be stat'ed
/// and directories that cannot be opened are handed to `visit` as
/// `EntryKind::Inaccessible` rather than skipped. Children are visited in
/// byte order of their paths. The walk stops as soon as `visit` breaks.
pub fn walk_tree<F>(roots: &[PathBuf], options: &WalkOptions, mut visit: F) -> ControlFlow<()>
where
    F: FnMut(FsEntry) -> ControlFlow<()>,
{
    debug!(
        "[walk_tree] {} roots, recursive={}, order={:?}",
        roots.len(),
        options.recursive,
        options.order
    );

    for root in roots {
        match fs::symlink_metadata(root) {
            Ok(metadata) => visit_path(root.clone(), &metadata, 0, options, &mut visit)?,
            Err(e) => visit(FsEntry::inaccessible(root.clone(), 0, e))?,
        }
    }

    ControlFlow::Continue(())
}

fn visit_path<F>(
    path: PathBuf,
    metadata: &fs::Metadata,
    depth: usize,
    options: &WalkOptions,
    visit: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(FsEntry) -> ControlFlow<()>,
{
    let entry = FsEntry::from_metadata(path, metadata, depth);
    if entry.kind != EntryKind::Dir || !options.recursive {
        return visit(entry);
    }

    let children = match read_children(&entry.full_path) {
        Ok(children) => children,
        Err(e) => return visit(FsEntry::inaccessible(entry.full_path, depth, e)),
    };

    let path = entry.full_path.clone();
    let birth_time = entry.birth_time;
    visit(entry)?;

    for child in children {
        match fs::symlink_metadata(&child) {
            Ok(metadata) => visit_path(child, &metadata, depth + 1, options, visit)?,
            Err(e) => visit(FsEntry::inaccessible(child, depth + 1, e))?,
        }
    }

    if options.order == WalkOrder::PrePost {
        let mut post = FsEntry::new(path, EntryKind::DirPost, depth);
        post.birth_time = birth_time;
        visit(post)?;
    }

    ControlFlow::Continue(())
}

/// List a directory up front so no handle stays open while descending.
fn read_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut children = Vec::new();

    for entry_res in fs::read_dir(dir)? {
        match entry_res {
            Ok(e) => children.push(e.path()),
            Err(e) => warn!("[walk] error reading entry in {:?}: {e}", dir),
        }
    }

    children.sort();
    Ok(children)
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
