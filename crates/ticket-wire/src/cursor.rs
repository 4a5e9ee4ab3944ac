use crate::error::WireError;

/// Forward-only reader over a borrowed ticket buffer.
///
/// Every read either returns the full value and advances by the field's
/// exact encoded width, or fails with [`WireError::TruncatedInput`] and
/// leaves the position untouched. No read ever returns a partially filled
/// value.
///
/// ```text
///   buf:  [ consumed ........ | remaining ............ ]
///                             ^ position()
/// ```
///
/// Integers are big-endian unless the method name says otherwise. The only
/// little-endian field in the format is the gzip trailer's ISIZE.
///
/// # Example
///
/// ```rust
/// use ticket_wire::Cursor;
///
/// let data = [0x05, 0x00, 0x2A, 0x03, b'a', b'b', b'c'];
/// let mut cursor = Cursor::new(&data);
///
/// assert_eq!(cursor.read_u8().unwrap(), 5);
/// assert_eq!(cursor.read_u16_be().unwrap(), 42);
/// assert_eq!(cursor.read_string_u8().unwrap(), "abc");
/// assert!(cursor.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Byte offset of the next read, relative to the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Whether every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read exactly `len` bytes as a borrowed slice.
    ///
    /// # Errors
    ///
    /// [`WireError::TruncatedInput`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        if self.remaining() < len {
            return Err(WireError::TruncatedInput {
                offset: self.pos,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Read exactly `N` bytes into a stack array.
    ///
    /// # Errors
    ///
    /// [`WireError::TruncatedInput`] if fewer than `N` bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// # Errors
    ///
    /// [`WireError::TruncatedInput`] at end of buffer.
    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    /// # Errors
    ///
    /// [`WireError::TruncatedInput`] if fewer than 2 bytes remain.
    pub fn read_u16_be(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Read a 3-byte big-endian integer into the low 24 bits of a `u32`.
    ///
    /// # Errors
    ///
    /// [`WireError::TruncatedInput`] if fewer than 3 bytes remain.
    pub fn read_u24_be(&mut self) -> Result<u32, WireError> {
        let [a, b, c] = self.read_array::<3>()?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    /// # Errors
    ///
    /// [`WireError::TruncatedInput`] if fewer than 4 bytes remain.
    pub fn read_u32_be(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// # Errors
    ///
    /// [`WireError::TruncatedInput`] if fewer than 4 bytes remain.
    pub fn read_u32_le(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a byte run prefixed by a one-byte length.
    ///
    /// # Errors
    ///
    /// [`WireError::TruncatedInput`] if the prefix or the run is cut short.
    /// The cursor is restored to the prefix on failure.
    pub fn read_len_prefixed_u8(&mut self) -> Result<&'a [u8], WireError> {
        let start = self.pos;
        let len = self.read_u8()?;
        self.read_bytes(usize::from(len)).inspect_err(|_| self.pos = start)
    }

    /// Read a byte run prefixed by a big-endian `u16` length.
    ///
    /// # Errors
    ///
    /// [`WireError::TruncatedInput`] if the prefix or the run is cut short.
    /// The cursor is restored to the prefix on failure.
    pub fn read_len_prefixed_u16_be(&mut self) -> Result<&'a [u8], WireError> {
        let start = self.pos;
        let len = self.read_u16_be()?;
        self.read_bytes(usize::from(len)).inspect_err(|_| self.pos = start)
    }

    /// Read a string prefixed by a one-byte length.
    ///
    /// # Errors
    ///
    /// - [`WireError::TruncatedInput`] if the run is cut short.
    /// - [`WireError::InvalidUtf8`] if the bytes are not UTF-8.
    pub fn read_string_u8(&mut self) -> Result<String, WireError> {
        let offset = self.pos;
        let bytes = self.read_len_prefixed_u8()?;
        utf8(bytes, offset).map(str::to_owned)
    }

    /// Read a fixed-width string, dropping trailing NUL and space padding.
    ///
    /// # Errors
    ///
    /// - [`WireError::TruncatedInput`] if fewer than `width` bytes remain.
    /// - [`WireError::InvalidUtf8`] if the bytes are not UTF-8.
    pub fn read_fixed_string(&mut self, width: usize) -> Result<String, WireError> {
        let offset = self.pos;
        let bytes = self.read_bytes(width)?;
        let text = utf8(bytes, offset)?;
        Ok(text.trim_end_matches(['\0', ' ']).to_owned())
    }
}

fn utf8(bytes: &[u8], offset: usize) -> Result<&str, WireError> {
    std::str::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8 { offset })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_mixed_endianness() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x01, 0x02, 0x03, 0x04];
        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.read_u32_be().unwrap(), 0x0102_0304);
        assert_eq!(cursor.read_u32_le().unwrap(), 0x0403_0201);
        assert!(cursor.is_empty());
    }

    #[test]
    fn u24_reads_three_bytes() {
        let data = [0xAB, 0xCD, 0xEF, 0x11];
        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.read_u24_be().unwrap(), 0x00AB_CDEF);
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn truncated_read_does_not_advance() {
        let data = [0x00, 0x01, 0x02];
        let mut cursor = Cursor::new(&data);
        cursor.read_u8().unwrap();

        let err = cursor.read_u32_be().unwrap_err();
        assert!(matches!(
            err,
            WireError::TruncatedInput {
                offset: 1,
                needed: 4,
                remaining: 2
            }
        ));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_u16_be().unwrap(), 0x0102);
    }

    #[test]
    fn length_prefixed_run_restores_position_on_short_body() {
        // Prefix says 5 bytes, only 2 follow.
        let data = [0x05, b'h', b'i'];
        let mut cursor = Cursor::new(&data);
        let err = cursor.read_len_prefixed_u8().unwrap_err();
        assert!(err.is_truncated());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn u16_length_prefix() {
        let mut data = vec![0x01, 0x00];
        data.extend(std::iter::repeat_n(0xEE, 256));
        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.read_len_prefixed_u16_be().unwrap().len(), 256);
        assert!(cursor.is_empty());
    }

    #[test]
    fn fixed_string_strips_padding() {
        let data = *b"BUDAPEST\0\0  ";
        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.read_fixed_string(12).unwrap(), "BUDAPEST");
    }

    #[test]
    fn fixed_string_keeps_inner_spaces() {
        let data = *b"SZEGED NYUGATI\0\0";
        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.read_fixed_string(16).unwrap(), "SZEGED NYUGATI");
    }

    #[test]
    fn invalid_utf8_reports_field_offset() {
        let data = [0x00, 0x02, 0xC3, 0x28];
        let mut cursor = Cursor::new(&data);
        cursor.read_u8().unwrap();
        let err = cursor.read_string_u8().unwrap_err();
        assert!(matches!(err, WireError::InvalidUtf8 { offset: 1 }));
    }

    #[test]
    fn empty_buffer() {
        let mut cursor = Cursor::new(&[]);
        assert!(cursor.is_empty());
        assert!(cursor.read_u8().unwrap_err().is_truncated());
    }
}
