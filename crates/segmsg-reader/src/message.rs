use segmsg_wire::pointer::{LIST_HEADER_SIZE, ListHeader, Pointer};
use segmsg_wire::SegmentTable;
use tracing::{debug, trace, warn};

use crate::error::ReadError;
use crate::options::ReaderOptions;
use crate::reader::Reader;
use crate::segment::{Segment, SegmentId};

/// Where a message's bytes come from.
///
/// Collapses the different ways a caller can hand over an encoded message
/// into one value, resolved once when the [`MessageReader`] is built.
///
/// ```text
/// ┌───────────┬──────────────────────────────────────────────────────┐
/// │ Variant   │ Meaning                                              │
/// ├───────────┼──────────────────────────────────────────────────────┤
/// │ Single    │ The whole message is one block (segment 0)           │
/// │ Segments  │ Ordered blocks; block i becomes segment i            │
/// │ Framed    │ One buffer starting with a segment table             │
/// └───────────┴──────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug)]
pub enum MessageSource<'a> {
    Single(&'a [u8]),
    Segments(Vec<&'a [u8]>),
    Framed(&'a [u8]),
}

impl<'a> From<&'a [u8]> for MessageSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Single(bytes)
    }
}

impl<'a> From<Vec<&'a [u8]>> for MessageSource<'a> {
    fn from(blocks: Vec<&'a [u8]>) -> Self {
        Self::Segments(blocks)
    }
}

/// Where a pointer word leads once all far hops have been followed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Null,
    Struct {
        segment: SegmentId,
        offset: usize,
        /// Declared data size, `None` when the pointer leaves it unspecified.
        data_size: Option<u32>,
    },
    List {
        segment: SegmentId,
        /// Offset of the first element (just past the list header).
        base: usize,
        element_count: u32,
        stride: u32,
    },
}

/// Owner of every segment of one decoded message.
///
/// The message reader is the registry that turns a `(segment, offset)`
/// pair into bytes, and the only place far pointers are followed: a
/// pointer in segment A that targets segment B is always dereferenced
/// through [`resolve`](Self::resolve), never segment to segment.
///
/// Readers borrow the message, so the compiler enforces that no reader
/// outlives it. The message itself borrows the caller's bytes; nothing is
/// copied and the bytes must simply stay alive and unmodified while the
/// message exists.
///
/// # Example
///
/// ```rust
/// use segmsg_reader::{MessageReader, MessageSource, ReaderOptions};
///
/// let bytes = [0x05, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00];
/// let message = MessageReader::new(MessageSource::Single(&bytes), ReaderOptions::default()).unwrap();
/// let root = message.root(0);
/// assert_eq!(root.read_int(0).unwrap(), 5);
/// assert!(root.read_boolean(4).unwrap());
/// ```
#[derive(Debug)]
pub struct MessageReader<'a> {
    segments: Vec<Segment<'a>>,
    options: ReaderOptions,
}

impl<'a> MessageReader<'a> {
    /// Build a message from its source.
    ///
    /// # Errors
    ///
    /// - [`ReadError::Framing`] if a `Framed` source has a bad segment table.
    /// - [`ReadError::InvalidSegment`] if the source yields no segments.
    pub fn new(source: MessageSource<'a>, options: ReaderOptions) -> Result<Self, ReadError> {
        let blocks = match source {
            MessageSource::Single(bytes) => vec![bytes],
            MessageSource::Segments(blocks) => blocks,
            MessageSource::Framed(bytes) => {
                SegmentTable::split(bytes).map_err(ReadError::Framing)?
            }
        };

        if blocks.is_empty() {
            return Err(ReadError::InvalidSegment { index: 0, count: 0 });
        }

        let mut segments = Vec::with_capacity(blocks.len());
        for (index, bytes) in blocks.into_iter().enumerate() {
            let id = SegmentId::try_from(index).map_err(|_| ReadError::InvalidSegment {
                index: SegmentId::MAX,
                count: index,
            })?;
            segments.push(Segment::with_id(id, bytes));
        }

        let message = Self { segments, options };
        debug!(
            segments = message.segment_count(),
            total_bytes = message.total_size(),
            "message reader constructed"
        );
        Ok(message)
    }

    /// A one-segment message with default options.
    #[must_use]
    pub fn single(bytes: &'a [u8]) -> Self {
        Self {
            segments: vec![Segment::new(bytes)],
            options: ReaderOptions::default(),
        }
    }

    /// Look up a segment by index.
    ///
    /// # Errors
    ///
    /// [`ReadError::InvalidSegment`] if `index` is out of range.
    pub fn segment(&self, index: SegmentId) -> Result<&Segment<'a>, ReadError> {
        self.segments
            .get(index as usize)
            .ok_or(ReadError::InvalidSegment {
                index,
                count: self.segments.len(),
            })
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    #[must_use]
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Sum of all segment lengths in bytes.
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }

    /// Root reader over segment 0 at `offset`.
    ///
    /// The offset is not checked here; it is validated by each field read.
    #[must_use]
    pub fn root(&self, offset: usize) -> Reader<'_> {
        Reader::at(self, 0, offset, None)
    }

    /// Reader at an explicit segment and offset.
    ///
    /// # Errors
    ///
    /// [`ReadError::InvalidSegment`] if `segment` is out of range.
    pub fn reader_at(&self, segment: SegmentId, offset: usize) -> Result<Reader<'_>, ReadError> {
        Reader::new(self, segment, offset)
    }

    /// Follow the struct pointer stored at `offset` in segment 0.
    ///
    /// # Errors
    ///
    /// All errors from [`Reader::read_struct`].
    pub fn root_pointer(&self, offset: usize) -> Result<Reader<'_>, ReadError> {
        self.root(offset).read_struct(0)
    }

    /// Resolve the pointer word at `(segment, offset)`.
    ///
    /// Far pointers are followed through their landing pads, switching
    /// segments as needed, up to [`ReaderOptions::max_far_hops`] hops.
    /// A list target's header is read and the full element extent is
    /// bounds-checked before it is returned.
    ///
    /// # Errors
    ///
    /// - [`ReadError::InvalidSegment`] if `segment` or a far pointer's
    ///   target segment does not exist.
    /// - [`ReadError::OutOfBounds`] if a pointer word, landing pad, list
    ///   header, or list body does not fit in its segment.
    /// - [`ReadError::MalformedPointer`] if a word has inconsistent bits,
    ///   the far chain is too long, or a list has zero stride.
    pub fn resolve(&self, segment: SegmentId, offset: usize) -> Result<Target, ReadError> {
        let mut current = self.segment(segment)?;
        let mut at = offset;
        let mut hops = 0u8;

        loop {
            let pointer = Pointer::read_from(current.view(), at)
                .map_err(|e| ReadError::in_segment(current.id(), e))?;

            match pointer {
                Pointer::Null => return Ok(Target::Null),
                Pointer::Struct { target, data_size } => {
                    return Ok(Target::Struct {
                        segment: current.id(),
                        offset: target as usize,
                        data_size: (data_size != 0).then_some(data_size),
                    });
                }
                Pointer::List { header } => {
                    return Self::resolve_list(current, header as usize);
                }
                Pointer::Far {
                    segment: next,
                    landing_pad,
                } => {
                    if hops >= self.options.max_far_hops {
                        warn!(
                            segment = current.id(),
                            offset = at,
                            hops,
                            "far pointer chain exceeds hop limit"
                        );
                        return Err(ReadError::MalformedPointer {
                            segment: current.id(),
                            offset: at,
                            reason: "far pointer chain exceeds hop limit",
                        });
                    }
                    hops += 1;
                    trace!(
                        from = current.id(),
                        to = next,
                        landing_pad,
                        "following far pointer"
                    );
                    current = self.segment(next)?;
                    at = landing_pad as usize;
                }
            }
        }
    }

    fn resolve_list(segment: &Segment<'a>, header_offset: usize) -> Result<Target, ReadError> {
        let header = ListHeader::read_from(segment.view(), header_offset)
            .map_err(|e| ReadError::in_segment(segment.id(), e))?;

        if header.stride == 0 && header.element_count != 0 {
            return Err(ReadError::MalformedPointer {
                segment: segment.id(),
                offset: header_offset,
                reason: "non-empty list with zero stride",
            });
        }

        let base = header_offset + LIST_HEADER_SIZE;
        let body_len = header.body_len().ok_or(ReadError::MalformedPointer {
            segment: segment.id(),
            offset: header_offset,
            reason: "list extent overflows",
        })?;
        // Validates the whole extent up front so element reads cannot
        // stray outside the segment.
        segment.get_bytes_at(base, body_len)?;

        Ok(Target::List {
            segment: segment.id(),
            base,
            element_count: header.element_count,
            stride: header.stride,
        })
    }
}
