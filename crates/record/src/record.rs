use bitflags::bitflags;
use log::{debug, trace};

use crate::{
    cursor::{ByteReader, ByteWriter, CursorError},
    error::RecordError,
    flags::AttributeFlags,
};

pub const MIN_VERSION: u16 = 1;
pub const MAX_VERSION: u16 = 5;
/// Layout used for a record made up for an entry that has no blob.
pub const SYNTHESIZED_VERSION: u16 = 5;

const LEGACY_PREFIX: &[u8] = b"0x";
const LEGACY_HEX_DIGITS: usize = 4;
/// Zero bytes allowed between the legacy prefix (or blob start) and the
/// version tag.
const MAX_LEADING_PADDING: usize = 2;
const RECORD_ALIGNMENT: usize = 4;

bitflags! {
    /// Which fields of a record carry a meaningful value.
    ///
    /// Versions 2 to 5 store this bitmap on the wire. Version 1 has none;
    /// there a field counts as valid iff its value is nonzero.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ValidFields: u32 {
        const ATTRIB = 0x01;
        const EA_SIZE = 0x02;
        const SIZE = 0x04;
        const ALLOC_SIZE = 0x08;
        const CREATE_TIME = 0x10;
        const CHANGE_TIME = 0x20;
        const ITIME = 0x40;
    }
}

/// Normalized decode of one DOSATTRIB blob, whatever its layout.
///
/// Fields that the layout does not carry stay zero and are not marked in
/// `valid`. Equality ignores `version` and `write_time` and never looks at
/// the value of a field that is not valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeRecord {
    pub version: u16,
    pub valid: ValidFields,
    pub attribs: AttributeFlags,
    pub ea_size: u32,
    pub size: u64,
    pub alloc_size: u64,
    pub create_time: u64,
    pub change_time: u64,
    /// Version 2 only; has no validity bit.
    pub write_time: u64,
    /// Version 4 only.
    pub itime: u64,
}

impl AttributeRecord {
    pub fn new(version: u16) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    /// Stand-in for an entry with no blob: newest layout, no bits set,
    /// only the attribs valid.
    pub fn synthesized() -> Self {
        Self {
            valid: ValidFields::ATTRIB,
            ..Self::new(SYNTHESIZED_VERSION)
        }
    }

    #[inline]
    pub fn is_valid(&self, field: ValidFields) -> bool {
        self.valid.contains(field)
    }

    pub fn create_time(&self) -> Option<u64> {
        self.is_valid(ValidFields::CREATE_TIME)
            .then_some(self.create_time)
    }

    pub fn set_create_time(&mut self, ticks: u64) {
        self.create_time = ticks;
        self.valid.insert(ValidFields::CREATE_TIME);
    }
}

impl PartialEq for AttributeRecord {
    fn eq(&self, other: &Self) -> bool {
        let present = self.valid & ValidFields::all();
        if present != other.valid & ValidFields::all() {
            return false;
        }

        let agrees = |field: ValidFields, same: bool| !present.contains(field) || same;

        agrees(ValidFields::ATTRIB, self.attribs == other.attribs)
            && agrees(ValidFields::EA_SIZE, self.ea_size == other.ea_size)
            && agrees(ValidFields::SIZE, self.size == other.size)
            && agrees(ValidFields::ALLOC_SIZE, self.alloc_size == other.alloc_size)
            && agrees(ValidFields::CREATE_TIME, self.create_time == other.create_time)
            && agrees(ValidFields::CHANGE_TIME, self.change_time == other.change_time)
            && agrees(ValidFields::ITIME, self.itime == other.itime)
    }
}

impl Eq for AttributeRecord {}

/// Result of parsing a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// `None` when the blob had no binary body: empty, padding only, or a
    /// bare legacy prefix.
    pub record: Option<AttributeRecord>,
    /// Value of a leading `0x<hex>` prefix. The binary `attribs` field wins
    /// when both are present.
    pub legacy_attribs: Option<AttributeFlags>,
    /// Bytes left after the layout; normally alignment padding.
    pub remaining: usize,
}

impl Decoded {
    /// Neither a binary record nor a legacy prefix was found.
    pub fn is_empty(&self) -> bool {
        self.record.is_none() && self.legacy_attribs.is_none()
    }
}

/// Whether `version` is written with the legacy `0x<hex>` prefix.
#[inline]
pub fn carries_legacy_prefix(version: u16) -> bool {
    matches!(version, 2 | 3)
}

/// Decode a raw DOSATTRIB blob.
pub fn parse(blob: &[u8]) -> Result<Decoded, RecordError> {
    trace!("[record] parsing {} byte blob: {:02x?}", blob.len(), blob);

    let (legacy_attribs, rest) = match split_legacy_prefix(blob)? {
        Some((attribs, tail)) => {
            debug!("[record] legacy prefix 0x{:x}", attribs.bits());
            (Some(attribs), tail)
        }
        None => (None, blob),
    };

    let padding = rest
        .iter()
        .take(MAX_LEADING_PADDING)
        .take_while(|&&b| b == 0)
        .count();
    let rest = &rest[padding..];

    if rest.is_empty() {
        return Ok(Decoded {
            record: None,
            legacy_attribs,
            remaining: 0,
        });
    }

    let mut reader = ByteReader::new(rest);
    let version = reader
        .get_u16()
        .map_err(|_| RecordError::TruncatedHeader)?;

    let record = decode_body(version, &mut reader)?;

    if reader.remaining() >= RECORD_ALIGNMENT {
        debug!(
            "[record] {} unread bytes after version {version} layout",
            reader.remaining()
        );
    }

    Ok(Decoded {
        record: Some(record),
        legacy_attribs,
        remaining: reader.remaining(),
    })
}

fn split_legacy_prefix(blob: &[u8]) -> Result<Option<(AttributeFlags, &[u8])>, RecordError> {
    let Some(after) = blob.strip_prefix(LEGACY_PREFIX) else {
        return Ok(None);
    };

    let digits = after.iter().take_while(|b| b.is_ascii_hexdigit()).count();
    if digits == 0 {
        return Ok(None);
    }

    let text = std::str::from_utf8(&after[..digits]).map_err(|_| RecordError::InvalidLegacyPrefix)?;
    let value = u32::from_str_radix(text, 16).map_err(|_| RecordError::InvalidLegacyPrefix)?;

    Ok(Some((AttributeFlags::from_bits_retain(value), &after[digits..])))
}

fn get_u32(r: &mut ByteReader<'_>, field: &'static str) -> Result<u32, RecordError> {
    r.get_u32().map_err(|e| RecordError::truncated(field, 4, e))
}

fn get_u64(r: &mut ByteReader<'_>, field: &'static str) -> Result<u64, RecordError> {
    r.get_u64().map_err(|e| RecordError::truncated(field, 8, e))
}

/// Like `get_u32`, but a record that ends exactly here yields `None`.
fn trailing_u32(r: &mut ByteReader<'_>, field: &'static str) -> Result<Option<u32>, RecordError> {
    match r.get_u32() {
        Ok(v) => Ok(Some(v)),
        Err(CursorError::Exhausted) => Ok(None),
        Err(e) => Err(RecordError::truncated(field, 4, e)),
    }
}

fn trailing_u64(r: &mut ByteReader<'_>, field: &'static str) -> Result<Option<u64>, RecordError> {
    match r.get_u64() {
        Ok(v) => Ok(Some(v)),
        Err(CursorError::Exhausted) => Ok(None),
        Err(e) => Err(RecordError::truncated(field, 8, e)),
    }
}

fn decode_body(version: u16, r: &mut ByteReader<'_>) -> Result<AttributeRecord, RecordError> {
    let mut rec = AttributeRecord::new(version);

    match version {
        1 => decode_v1(r, &mut rec)?,
        2..=5 => {
            check_embedded_version(version, get_u32(r, "version")?);
            rec.valid = ValidFields::from_bits_retain(get_u32(r, "valid_flags")?);
            rec.attribs = AttributeFlags::from_bits_retain(get_u32(r, "attribs")?);

            match version {
                2 | 3 => {
                    rec.ea_size = get_u32(r, "ea_size")?;
                    rec.size = get_u64(r, "size")?;
                    rec.alloc_size = get_u64(r, "alloc_size")?;
                    rec.create_time = get_u64(r, "create_time")?;
                    rec.change_time = get_u64(r, "change_time")?;
                    if version == 2 {
                        rec.write_time = get_u64(r, "write_time")?;
                    }
                }
                4 => {
                    rec.itime = get_u64(r, "itime")?;
                    rec.create_time = get_u64(r, "create_time")?;
                }
                _ => {
                    rec.create_time = get_u64(r, "create_time")?;
                }
            }
        }
        other => return Err(RecordError::UnsupportedVersion(other)),
    }

    Ok(rec)
}

/// Version 1 carries no bitmap and may stop after `attribs`.
fn decode_v1(r: &mut ByteReader<'_>, rec: &mut AttributeRecord) -> Result<(), RecordError> {
    check_embedded_version(1, get_u32(r, "version")?);
    rec.attribs = AttributeFlags::from_bits_retain(get_u32(r, "attribs")?);
    rec.valid = ValidFields::ATTRIB;

    rec.ea_size = trailing_u32(r, "ea_size")?.unwrap_or(0);
    rec.size = trailing_u64(r, "size")?.unwrap_or(0);
    rec.alloc_size = trailing_u64(r, "alloc_size")?.unwrap_or(0);
    rec.create_time = trailing_u64(r, "create_time")?.unwrap_or(0);
    rec.change_time = trailing_u64(r, "change_time")?.unwrap_or(0);

    rec.valid.set(ValidFields::EA_SIZE, rec.ea_size != 0);
    rec.valid.set(ValidFields::SIZE, rec.size != 0);
    rec.valid.set(ValidFields::ALLOC_SIZE, rec.alloc_size != 0);
    rec.valid.set(ValidFields::CREATE_TIME, rec.create_time != 0);
    rec.valid.set(ValidFields::CHANGE_TIME, rec.change_time != 0);

    Ok(())
}

fn check_embedded_version(tag: u16, embedded: u32) {
    if embedded != tag as u32 {
        debug!("[record] version tag {tag} disagrees with embedded version {embedded}");
    }
}

fn legacy_hex(attribs: AttributeFlags) -> String {
    format!("{:0width$X}", attribs.bits(), width = LEGACY_HEX_DIGITS)
}

/// Size of the layout after the version tag.
fn body_len(version: u16) -> Option<usize> {
    let len = match version {
        1 => 3 * 4 + 4 * 8,
        2 => 4 * 4 + 5 * 8,
        3 => 4 * 4 + 4 * 8,
        4 => 3 * 4 + 2 * 8,
        5 => 3 * 4 + 8,
        _ => return None,
    };
    Some(len)
}

/// Exact number of bytes `encode` writes for `record` as `version`,
/// including prefix and padding.
pub fn encoded_len(record: &AttributeRecord, version: u16) -> Result<usize, RecordError> {
    let body = body_len(version).ok_or(RecordError::UnsupportedVersion(version))?;

    let header = if carries_legacy_prefix(version) {
        // "0x" + digits + terminator + one alignment byte
        LEGACY_PREFIX.len() + legacy_hex(record.attribs).len() + 2
    } else {
        MAX_LEADING_PADDING
    };

    Ok((header + 2 + body).next_multiple_of(RECORD_ALIGNMENT))
}

/// Encode `record` using the `version` layout into `out`.
///
/// Returns the number of bytes written. On error `out` is left untouched.
pub fn encode(record: &AttributeRecord, version: u16, out: &mut [u8]) -> Result<usize, RecordError> {
    let needed = encoded_len(record, version)?;
    let available = out.len();
    if needed > available {
        return Err(RecordError::BufferTooSmall { needed, available });
    }

    let mut w = ByteWriter::new(&mut out[..needed]);
    write_record(&mut w, record, version)
        .map_err(|_| RecordError::BufferTooSmall { needed, available })?;

    debug!(
        "[record] encoded version {version} record, {} bytes",
        w.written()
    );
    Ok(w.written())
}

/// Encode into a freshly allocated buffer of exactly the right size.
pub fn to_bytes(record: &AttributeRecord, version: u16) -> Result<Vec<u8>, RecordError> {
    let mut buf = vec![0u8; encoded_len(record, version)?];
    let written = encode(record, version, &mut buf)?;
    buf.truncate(written);
    Ok(buf)
}

/// `version` must already be known to `body_len`.
fn write_record(
    w: &mut ByteWriter<'_>,
    rec: &AttributeRecord,
    version: u16,
) -> Result<(), CursorError> {
    if carries_legacy_prefix(version) {
        w.put_bytes(LEGACY_PREFIX)?;
        w.put_bytes(legacy_hex(rec.attribs).as_bytes())?;
        w.put_u8(0)?;
        w.put_u8(0)?;
    } else {
        w.put_bytes(&[0; MAX_LEADING_PADDING])?;
    }

    w.put_u16(version)?;
    w.put_u32(version as u32)?;

    if version == 1 {
        // Nonzero means valid here, so invalid fields must go out as zero.
        let valued = |field: ValidFields, v: u64| if rec.is_valid(field) { v } else { 0 };

        w.put_u32(rec.attribs.bits())?;
        w.put_u32(valued(ValidFields::EA_SIZE, rec.ea_size as u64) as u32)?;
        w.put_u64(valued(ValidFields::SIZE, rec.size))?;
        w.put_u64(valued(ValidFields::ALLOC_SIZE, rec.alloc_size))?;
        w.put_u64(valued(ValidFields::CREATE_TIME, rec.create_time))?;
        w.put_u64(valued(ValidFields::CHANGE_TIME, rec.change_time))?;
    } else {
        w.put_u32(rec.valid.bits())?;
        w.put_u32(rec.attribs.bits())?;

        match version {
            2 | 3 => {
                w.put_u32(rec.ea_size)?;
                w.put_u64(rec.size)?;
                w.put_u64(rec.alloc_size)?;
                w.put_u64(rec.create_time)?;
                w.put_u64(rec.change_time)?;
                if version == 2 {
                    w.put_u64(rec.write_time)?;
                }
            }
            4 => {
                w.put_u64(rec.itime)?;
                w.put_u64(rec.create_time)?;
            }
            _ => {
                w.put_u64(rec.create_time)?;
            }
        }
    }

    w.pad_to(RECORD_ALIGNMENT)
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
