use segmsg_wire::WireError;

use crate::segment::SegmentId;

/// Errors raised while reading fields out of a segmented message.
///
/// Errors surface synchronously at the offending field access. The reader
/// never recovers locally: the caller decides whether a malformed message
/// aborts the decode or is skipped.
///
/// ```text
///   ReadError
///   ├── OutOfBounds        ← read past a segment's physical end
///   ├── InvalidSegment     ← segment index not present in the message
///   ├── MalformedPointer   ← pointer does not resolve to a usable target
///   ├── IndexOutOfRange    ← list element index >= element count
///   ├── InvalidUtf8        ← text list is not UTF-8
///   └── Framing(WireError) ← segment table could not be parsed
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// A fixed-width read would run past the end of a segment.
    #[error("read of {width} bytes at offset {offset} exceeds segment {segment} length {len}")]
    OutOfBounds {
        segment: SegmentId,
        offset: usize,
        width: usize,
        len: usize,
    },

    /// A segment index (from a reader or a far pointer) is not in the message.
    #[error("segment {index} does not exist (message has {count})")]
    InvalidSegment { index: SegmentId, count: usize },

    /// A pointer word cannot be followed to a valid target.
    #[error("malformed pointer in segment {segment} at offset {offset}: {reason}")]
    MalformedPointer {
        segment: SegmentId,
        offset: usize,
        reason: &'static str,
    },

    /// A list element index is past the end of the list.
    #[error("list index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A text field's bytes are not valid UTF-8.
    #[error("invalid UTF-8 in text at segment {segment} offset {offset}")]
    InvalidUtf8 { segment: SegmentId, offset: usize },

    /// The framed input's segment table is malformed.
    #[error("invalid segment table: {0}")]
    Framing(WireError),
}

impl ReadError {
    /// Attach the segment id to an error raised by a segment's byte view.
    #[must_use]
    pub fn in_segment(segment: SegmentId, err: WireError) -> Self {
        match err {
            WireError::OutOfBounds { offset, width, len } => Self::OutOfBounds {
                segment,
                offset,
                width,
                len,
            },
            WireError::MalformedPointer { offset, reason } => Self::MalformedPointer {
                segment,
                offset,
                reason,
            },
            other => Self::Framing(other),
        }
    }
}
