use crate::error::WireError;

/// Bounds-checked little-endian view over one contiguous block of bytes.
///
/// The view never copies: it borrows the caller's memory for `'a` and
/// decodes fixed-width values on demand. Every accessor checks
/// `offset + width <= len` with overflow-safe arithmetic and fails with
/// [`WireError::OutOfBounds`] otherwise. A short read is never padded,
/// truncated, or wrapped.
///
/// ```text
///   offset ──┐
///            ▼
///   ┌────┬────┬────┬────┬────┬────┐
///   │ b0 │ b1 │ b2 │ b3 │ .. │    │   get_int(offset) = i32::from_le_bytes([b0, b1, b2, b3])
///   └────┴────┴────┴────┴────┴────┘
///   ◄──────────── len ────────────►
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteView<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteView<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Physical length of the block in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The underlying bytes, with the view's lifetime.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Borrow `len` bytes starting at `offset` without copying.
    ///
    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if the range does not fit in the block.
    pub fn get_bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], WireError> {
        let end = offset.checked_add(len).ok_or(WireError::OutOfBounds {
            offset,
            width: len,
            len: self.bytes.len(),
        })?;
        self.bytes.get(offset..end).ok_or(WireError::OutOfBounds {
            offset,
            width: len,
            len: self.bytes.len(),
        })
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], WireError> {
        let slice = self.get_bytes(offset, N)?;
        // get_bytes returned exactly N bytes
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if `offset + 1 > len`.
    pub fn get_ubyte(&self, offset: usize) -> Result<u8, WireError> {
        Ok(self.array::<1>(offset)?[0])
    }

    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if `offset + 1 > len`.
    pub fn get_byte(&self, offset: usize) -> Result<i8, WireError> {
        Ok(i8::from_le_bytes(self.array(offset)?))
    }

    /// Any non-zero byte is `true`.
    ///
    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if `offset + 1 > len`.
    pub fn get_boolean(&self, offset: usize) -> Result<bool, WireError> {
        Ok(self.get_ubyte(offset)? != 0)
    }

    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if `offset + 2 > len`.
    pub fn get_short(&self, offset: usize) -> Result<i16, WireError> {
        Ok(i16::from_le_bytes(self.array(offset)?))
    }

    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if `offset + 2 > len`.
    pub fn get_ushort(&self, offset: usize) -> Result<u16, WireError> {
        Ok(u16::from_le_bytes(self.array(offset)?))
    }

    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if `offset + 4 > len`.
    pub fn get_int(&self, offset: usize) -> Result<i32, WireError> {
        Ok(i32::from_le_bytes(self.array(offset)?))
    }

    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if `offset + 4 > len`.
    pub fn get_uint(&self, offset: usize) -> Result<u32, WireError> {
        Ok(u32::from_le_bytes(self.array(offset)?))
    }

    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if `offset + 8 > len`.
    pub fn get_long(&self, offset: usize) -> Result<i64, WireError> {
        Ok(i64::from_le_bytes(self.array(offset)?))
    }

    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if `offset + 8 > len`.
    pub fn get_ulong(&self, offset: usize) -> Result<u64, WireError> {
        Ok(u64::from_le_bytes(self.array(offset)?))
    }

    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if `offset + 4 > len`.
    pub fn get_float(&self, offset: usize) -> Result<f32, WireError> {
        Ok(f32::from_le_bytes(self.array(offset)?))
    }

    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if `offset + 8 > len`.
    pub fn get_double(&self, offset: usize) -> Result<f64, WireError> {
        Ok(f64::from_le_bytes(self.array(offset)?))
    }
}
