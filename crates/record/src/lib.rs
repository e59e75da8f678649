mod cursor;
mod error;
mod flags;
pub mod nttime;
mod record;

pub use cursor::{ByteReader, ByteWriter, CursorError};
pub use error::RecordError;
pub use flags::{ATTRIBUTE_TABLE, AttributeFlags, AttributeInfo, FlagsError};
pub use record::{
    AttributeRecord, Decoded, MAX_VERSION, MIN_VERSION, SYNTHESIZED_VERSION, ValidFields,
    carries_legacy_prefix, encode, encoded_len, parse, to_bytes,
};
