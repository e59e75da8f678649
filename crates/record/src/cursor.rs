/// Why a cursor operation could not complete.
///
/// Version 1 records depend on telling these apart: a record that stops at a
/// field boundary never wrote its trailing fields, while one that stops
/// inside a field is truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// No bytes left at all.
    Exhausted,
    /// Some bytes left, but fewer than the field width.
    Short { needed: usize, remaining: usize },
}

/// Bounds-checked little-endian reader over a borrowed byte slice.
///
/// A failed read never advances the position.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Unread tail of the buffer.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
        let remaining = self.remaining();
        if remaining == 0 {
            return Err(CursorError::Exhausted);
        }
        if remaining < N {
            return Err(CursorError::Short {
                needed: N,
                remaining,
            });
        }

        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    pub fn get_u16(&mut self) -> Result<u16, CursorError> {
        self.take::<2>().map(u16::from_le_bytes)
    }

    pub fn get_u32(&mut self) -> Result<u32, CursorError> {
        self.take::<4>().map(u32::from_le_bytes)
    }

    pub fn get_u64(&mut self) -> Result<u64, CursorError> {
        self.take::<8>().map(u64::from_le_bytes)
    }
}

/// Bounds-checked little-endian writer into a borrowed, fixed-size buffer.
///
/// A failed write leaves both the position and the buffer untouched.
#[derive(Debug)]
pub struct ByteWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> ByteWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn written(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<(), CursorError> {
        let remaining = self.remaining();
        if remaining < bytes.len() {
            return Err(CursorError::Short {
                needed: bytes.len(),
                remaining,
            });
        }

        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        Ok(())
    }

    #[inline]
    pub fn put_u8(&mut self, v: u8) -> Result<(), CursorError> {
        self.put_bytes(&[v])
    }

    pub fn put_u16(&mut self, v: u16) -> Result<(), CursorError> {
        self.put_bytes(&v.to_le_bytes())
    }

    pub fn put_u32(&mut self, v: u32) -> Result<(), CursorError> {
        self.put_bytes(&v.to_le_bytes())
    }

    pub fn put_u64(&mut self, v: u64) -> Result<(), CursorError> {
        self.put_bytes(&v.to_le_bytes())
    }

    /// Write zero bytes until the total length is a multiple of `alignment`.
    pub fn pad_to(&mut self, alignment: usize) -> Result<(), CursorError> {
        debug_assert!(alignment.is_power_of_two());
        while self.pos & (alignment - 1) != 0 {
            self.put_u8(0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "cursor_tests.rs"]
mod tests;
