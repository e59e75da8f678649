use bitflags::bitflags;
use thiserror::Error;

bitflags! {
    /// Windows file attribute bits as carried in a DOSATTRIB record.
    ///
    /// The wire field is 32 bits wide; only the low 16 have names. Unnamed
    /// bits are retained so a record survives a decode/encode cycle intact.
    /// `NORMAL` is not treated as exclusive of the other bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttributeFlags: u32 {
        const READONLY = 0x0001;
        const HIDDEN = 0x0002;
        const SYSTEM = 0x0004;
        const VOLUME = 0x0008;
        const DIRECTORY = 0x0010;
        const ARCHIVE = 0x0020;
        const DEVICE = 0x0040;
        const NORMAL = 0x0080;
        const TEMPORARY = 0x0100;
        const SPARSE = 0x0200;
        const REPARSE_POINT = 0x0400;
        const COMPRESSED = 0x0800;
        const OFFLINE = 0x1000;
        const NON_INDEXED = 0x2000;
        const ENCRYPTED = 0x4000;
        const INTEGRITY = 0x8000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeInfo {
    pub flag: AttributeFlags,
    /// Single-letter code used on the command line and in listings.
    pub code: char,
    pub description: &'static str,
}

/// Canonical display order. Letter codes are case-sensitive.
pub const ATTRIBUTE_TABLE: &[AttributeInfo] = &[
    info(AttributeFlags::READONLY, 'R', "Read-only file"),
    info(AttributeFlags::HIDDEN, 'H', "Hidden from directory listing"),
    info(AttributeFlags::SYSTEM, 'S', "System file or directory"),
    info(AttributeFlags::VOLUME, 'v', "Volume (reserved)"),
    info(AttributeFlags::DIRECTORY, 'D', "Directory"),
    info(AttributeFlags::ARCHIVE, 'A', "Archive"),
    info(AttributeFlags::DEVICE, 'd', "Device (reserved)"),
    info(AttributeFlags::NORMAL, 'N', "Normal"),
    info(AttributeFlags::TEMPORARY, 'T', "Temporary"),
    info(AttributeFlags::SPARSE, 's', "Sparse file (reserved)"),
    info(AttributeFlags::REPARSE_POINT, 'L', "Reparse point"),
    info(AttributeFlags::COMPRESSED, 'C', "Compressed"),
    info(AttributeFlags::OFFLINE, 'O', "Offline"),
    info(AttributeFlags::NON_INDEXED, 'I', "Non-indexed"),
    info(AttributeFlags::ENCRYPTED, 'E', "Encrypted"),
    info(AttributeFlags::INTEGRITY, 'V', "Integrity"),
];

const fn info(flag: AttributeFlags, code: char, description: &'static str) -> AttributeInfo {
    AttributeInfo {
        flag,
        code,
        description,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagsError {
    #[error("invalid attribute letter '{0}'")]
    InvalidAttributeLetter(char),
    #[error("empty attribute string")]
    Empty,
}

impl AttributeFlags {
    /// Mask that keeps every bit, named or not, when AND-ed.
    #[inline]
    pub const fn keep_all() -> Self {
        Self::from_bits_retain(u32::MAX)
    }

    /// Letter codes of the set bits, in table order.
    pub fn to_chars(self) -> String {
        ATTRIBUTE_TABLE
            .iter()
            .filter(|a| self.contains(a.flag))
            .map(|a| a.code)
            .collect()
    }

    /// Parse a run of letter codes. Any letter outside the table rejects the
    /// whole string.
    pub fn from_chars(s: &str) -> Result<Self, FlagsError> {
        if s.is_empty() {
            return Err(FlagsError::Empty);
        }

        s.chars().try_fold(Self::empty(), |acc, c| {
            ATTRIBUTE_TABLE
                .iter()
                .find(|a| a.code == c)
                .map(|a| acc | a.flag)
                .ok_or(FlagsError::InvalidAttributeLetter(c))
        })
    }

    /// Descriptions of the set bits, in table order.
    pub fn describe(self) -> Vec<&'static str> {
        ATTRIBUTE_TABLE
            .iter()
            .filter(|a| self.contains(a.flag))
            .map(|a| a.description)
            .collect()
    }
}

#[cfg(test)]
#[path = "flags_tests.rs"]
mod tests;
