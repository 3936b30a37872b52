/// Errors raised while interpreting raw segment bytes.
///
/// Every variant carries the byte position where decoding went wrong so a
/// malformed message can be located with a hex dump. Offsets are relative
/// to the block being read (a segment for accessors and pointers, the whole
/// framed input for the segment table).
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// A fixed-width read would run past the end of the block.
    #[error("read of {width} bytes at offset {offset} exceeds length {len}")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    /// Input ended before the segment table or a segment body was complete.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// The segment table declares more segments than the reader accepts.
    #[error("segment table declares {count} segments, limit is {limit}")]
    TooManySegments { count: u32, limit: u32 },

    /// Bytes remain after the last declared segment body.
    #[error("unexpected data after last segment ({extra_bytes} bytes)")]
    TrailingData { extra_bytes: usize },

    /// A pointer word has bits set that its kind does not allow.
    #[error("malformed pointer at offset {offset}: {reason}")]
    MalformedPointer {
        offset: usize,
        reason: &'static str,
    },
}
