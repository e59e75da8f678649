use std::{fs::Metadata, io, path::PathBuf, time::SystemTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Directory, visited before its children.
    Dir,
    /// Directory, visited again after its children (`WalkOrder::PrePost`).
    DirPost,
    /// Anything that is neither a directory nor a symlink: regular files,
    /// fifos, sockets, devices.
    File,
    /// Never followed.
    Symlink,
    /// Could not be stat'ed, or a directory that could not be opened.
    Inaccessible,
}

impl EntryKind {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let ft = metadata.file_type();
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        }
    }

    #[inline]
    pub fn is_dir(self) -> bool {
        matches!(self, EntryKind::Dir | EntryKind::DirPost)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Dir => "dir",
            EntryKind::DirPost => "dir-post",
            EntryKind::File => "file",
            EntryKind::Symlink => "symlink",
            EntryKind::Inaccessible => "inaccessible",
        }
    }
}

#[derive(Debug)]
pub struct FsEntry {
    pub full_path: PathBuf,
    pub kind: EntryKind,
    /// Levels below the walk root; roots are 0.
    pub depth: usize,
    /// Birth time, when the platform and filesystem report one.
    pub birth_time: Option<SystemTime>,
    /// Set for `EntryKind::Inaccessible`.
    pub error: Option<io::Error>,
}

impl FsEntry {
    pub fn new(full_path: PathBuf, kind: EntryKind, depth: usize) -> Self {
        Self {
            full_path,
            kind,
            depth,
            birth_time: None,
            error: None,
        }
    }

    pub fn from_metadata(full_path: PathBuf, metadata: &Metadata, depth: usize) -> Self {
        Self {
            birth_time: metadata.created().ok(),
            ..Self::new(full_path, EntryKind::from_metadata(metadata), depth)
        }
    }

    pub fn inaccessible(full_path: PathBuf, depth: usize, error: io::Error) -> Self {
        Self {
            error: Some(error),
            ..Self::new(full_path, EntryKind::Inaccessible, depth)
        }
    }
}
