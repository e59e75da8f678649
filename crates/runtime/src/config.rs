pub const PROGRAM_NAME: &str = "dosattrib";
pub const PROGRAM_LOG_LEVEL: &str = "DOSATTRIB_LOG_LEVEL";

/// Extended attribute holding the record. On FreeBSD the `user.` prefix
/// selects the user namespace.
pub const DOSATTRIB_XATTR_NAME: &str = "user.DOSATTRIB";

/// Size of the buffer used to fetch and encode a blob. The largest layout
/// (version 2 with its legacy prefix) takes 68 bytes.
pub const BLOB_CAPACITY: usize = 128;
