use std::{
    ffi::{OsStr, OsString},
    path::Path,
};
#[cfg(any(test, feature = "test-support"))]
use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    io,
    path::PathBuf,
};

use log::trace;

use crate::error::StoreError;

/// Named blob attribute attached to filesystem entries.
///
/// Implementations never follow symlinks.
pub trait AttributeStore {
    /// `Ok(None)` when the entry has no such attribute.
    fn get(&self, path: &Path) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the attribute with `value`. Readers see either the old or
    /// the new value, never a mix.
    fn set(&self, path: &Path, value: &[u8]) -> Result<(), StoreError>;
}

/// Extended attribute backed store.
#[derive(Debug, Clone)]
pub struct XattrStore {
    name: OsString,
}

impl XattrStore {
    pub fn new(name: impl Into<OsString>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// Whether extended attributes exist on this platform at all.
    pub fn platform_supported() -> bool {
        xattr::SUPPORTED_PLATFORM
    }
}

impl AttributeStore for XattrStore {
    fn get(&self, path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        let value = xattr::get(path, &self.name)
            .map_err(|e| StoreError::new("read extended attribute", path, e))?;
        trace!(
            "[xattr] get {:?} on {}: {:?}",
            self.name,
            path.display(),
            value.as_ref().map(Vec::len)
        );
        Ok(value)
    }

    fn set(&self, path: &Path, value: &[u8]) -> Result<(), StoreError> {
        trace!(
            "[xattr] set {:?} on {}: {} bytes",
            self.name,
            path.display(),
            value.len()
        );
        xattr::set(path, &self.name, value)
            .map_err(|e| StoreError::new("write extended attribute", path, e))
    }
}

/// In-memory store keyed by path, for driving a walk without touching real
/// extended attributes.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<PathBuf, Vec<u8>>>,
    deny_reads: RefCell<HashSet<PathBuf>>,
    deny_writes: RefCell<HashSet<PathBuf>>,
}

#[cfg(any(test, feature = "test-support"))]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, value: impl Into<Vec<u8>>) {
        self.values.borrow_mut().insert(path.into(), value.into());
    }

    pub fn value(&self, path: &Path) -> Option<Vec<u8>> {
        self.values.borrow().get(path).cloned()
    }

    /// Make every later `get` on `path` fail.
    pub fn deny_reads(&self, path: impl Into<PathBuf>) {
        self.deny_reads.borrow_mut().insert(path.into());
    }

    /// Make every later `set` on `path` fail.
    pub fn deny_writes(&self, path: impl Into<PathBuf>) {
        self.deny_writes.borrow_mut().insert(path.into());
    }
}

#[cfg(any(test, feature = "test-support"))]
impl AttributeStore for MemoryStore {
    fn get(&self, path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        if self.deny_reads.borrow().contains(path) {
            return Err(StoreError::new(
                "read extended attribute",
                path,
                io::Error::from(io::ErrorKind::PermissionDenied),
            ));
        }
        Ok(self.value(path))
    }

    fn set(&self, path: &Path, value: &[u8]) -> Result<(), StoreError> {
        if self.deny_writes.borrow().contains(path) {
            return Err(StoreError::new(
                "write extended attribute",
                path,
                io::Error::from(io::ErrorKind::PermissionDenied),
            ));
        }
        self.insert(path, value);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
