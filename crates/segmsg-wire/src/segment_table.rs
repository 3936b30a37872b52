use crate::byte_view::ByteView;
use crate::error::WireError;

/// Upper bound on the number of segments a framed message may declare.
///
/// A hostile table could otherwise make the reader allocate a segment
/// list proportional to a 32-bit count read from four bytes of input.
pub const MAX_SEGMENTS: u32 = 512;

/// Alignment of the segment table and of the first segment body.
const TABLE_ALIGN: usize = 8;

/// Segment table that frames a multi-segment message in one byte stream.
///
/// ```text
/// ┌──────────────────────────────────────────────────┐
/// │ segment_count   (u32 LE)                         │
/// │ segment_len[0]  (u32 LE)                         │
/// │ ...                                              │
/// │ segment_len[n-1](u32 LE)                         │
/// │ zero padding to an 8-byte boundary               │
/// ├──────────────────────────────────────────────────┤
/// │ segment 0 body  [segment_len[0] bytes]           │
/// │ segment 1 body  [segment_len[1] bytes]           │
/// │ ...                                              │
/// └──────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentTable {
    /// Byte length of each segment, in segment-index order.
    pub lengths: Vec<u32>,
}

impl SegmentTable {
    /// Size in bytes of the table itself, including padding.
    #[must_use]
    pub fn encoded_len(segment_count: usize) -> usize {
        let raw = 4 + 4 * segment_count;
        raw.div_ceil(TABLE_ALIGN) * TABLE_ALIGN
    }

    /// Sum of all declared segment lengths.
    #[must_use]
    pub fn body_len(&self) -> u64 {
        self.lengths.iter().map(|&len| u64::from(len)).sum()
    }

    /// Parse the table at the front of `buf`.
    ///
    /// Returns the table and the number of bytes it occupies (the offset
    /// of segment 0's body).
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if `buf` ends inside the table.
    /// - [`WireError::TooManySegments`] if the count exceeds [`MAX_SEGMENTS`].
    pub fn read_from(buf: &[u8]) -> Result<(Self, usize), WireError> {
        let view = ByteView::new(buf);
        let count = view
            .get_uint(0)
            .map_err(|_| WireError::UnexpectedEof { offset: buf.len() })?;

        if count > MAX_SEGMENTS {
            return Err(WireError::TooManySegments {
                count,
                limit: MAX_SEGMENTS,
            });
        }

        // count <= MAX_SEGMENTS, so this cannot truncate
        let count = count as usize;
        let mut lengths = Vec::with_capacity(count);
        for i in 0..count {
            let len = view
                .get_uint(4 + 4 * i)
                .map_err(|_| WireError::UnexpectedEof { offset: buf.len() })?;
            lengths.push(len);
        }

        let table_len = Self::encoded_len(count);
        if buf.len() < table_len {
            return Err(WireError::UnexpectedEof { offset: buf.len() });
        }

        Ok((Self { lengths }, table_len))
    }

    /// Parse the table and slice out every segment body, without copying.
    ///
    /// # Errors
    ///
    /// All errors from [`read_from`](Self::read_from), plus:
    /// - [`WireError::UnexpectedEof`] if a declared body is cut short.
    /// - [`WireError::TrailingData`] if bytes follow the last body.
    pub fn split(buf: &[u8]) -> Result<Vec<&[u8]>, WireError> {
        let (table, mut cursor) = Self::read_from(buf)?;
        let mut segments = Vec::with_capacity(table.lengths.len());

        for &len in &table.lengths {
            let end = cursor
                .checked_add(len as usize)
                .ok_or(WireError::UnexpectedEof { offset: buf.len() })?;
            let body = buf
                .get(cursor..end)
                .ok_or(WireError::UnexpectedEof { offset: buf.len() })?;
            segments.push(body);
            cursor = end;
        }

        if cursor < buf.len() {
            return Err(WireError::TrailingData {
                extra_bytes: buf.len() - cursor,
            });
        }

        Ok(segments)
    }
}
