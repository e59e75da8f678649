use thiserror::Error;

use crate::cursor::CursorError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("truncated header: no room for the version tag")]
    TruncatedHeader,

    #[error("truncated record reading {field}: needed {needed} bytes, {remaining} left")]
    TruncatedBuffer {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    #[error("unsupported DOSATTRIB version {0}")]
    UnsupportedVersion(u16),

    #[error("malformed legacy 0x<hex> attribute prefix")]
    InvalidLegacyPrefix,

    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

impl RecordError {
    pub(crate) fn truncated(field: &'static str, needed: usize, err: CursorError) -> Self {
        let remaining = match err {
            CursorError::Exhausted => 0,
            CursorError::Short { remaining, .. } => remaining,
        };
        RecordError::TruncatedBuffer {
            field,
            needed,
            remaining,
        }
    }
}
