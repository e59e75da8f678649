use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Failure reading or writing the attribute of one entry.
#[derive(Debug, Error)]
#[error("failed to {context} on {}: {source}", .path.display())]
pub struct StoreError {
    context: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl StoreError {
    pub fn new(context: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            context,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn context(&self) -> &'static str {
        self.context
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }

    /// Underlying OS error, without the path and context.
    pub fn io_error(&self) -> &io::Error {
        &self.source
    }
}
