mod entry;
mod error;
mod store;
mod walker;

pub use entry::{EntryKind, FsEntry};
pub use error::StoreError;
#[cfg(any(test, feature = "test-support"))]
pub use store::MemoryStore;
pub use store::{AttributeStore, XattrStore};
pub use walker::{WalkOptions, WalkOrder, walk_tree};
