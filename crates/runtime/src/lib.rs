mod config;
pub mod logging;

pub use config::{BLOB_CAPACITY, DOSATTRIB_XATTR_NAME, PROGRAM_LOG_LEVEL, PROGRAM_NAME};
