use std::fmt;

use crate::byte_view::ByteView;
use crate::error::WireError;

/// Size of a pointer word in bytes.
pub const POINTER_SIZE: usize = 8;

/// Size of the header that precedes the elements of every list.
pub const LIST_HEADER_SIZE: usize = 8;

/// Mask selecting the kind tag in the low half of a pointer word.
const KIND_MASK: u32 = 0b11;

/// The kind tag stored in the two low bits of a pointer word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Null = 0,
    Struct = 1,
    Far = 2,
    List = 3,
}

impl PointerKind {
    /// Extract the kind from the low half of a pointer word.
    #[must_use]
    pub fn from_lo(lo: u32) -> Self {
        match lo & KIND_MASK {
            0 => Self::Null,
            1 => Self::Struct,
            2 => Self::Far,
            _ => Self::List,
        }
    }
}

/// A decoded pointer word.
///
/// Pointer words are 8 bytes, read as two little-endian `u32` halves:
///
/// ```text
/// ┌─────────┬────────┬──────────────────────────────┬───────────────────────────────┐
/// │ lo & 3  │ Kind   │ lo >> 2                      │ hi                            │
/// ├─────────┼────────┼──────────────────────────────┼───────────────────────────────┤
/// │ 0       │ Null   │ 0                            │ 0                             │
/// │ 1       │ Struct │ target offset (same segment) │ declared data size, 0 = none  │
/// │ 2       │ Far    │ landing pad offset           │ target segment index          │
/// │ 3       │ List   │ list header offset           │ reserved, 0                   │
/// └─────────┴────────┴──────────────────────────────┴───────────────────────────────┘
/// ```
///
/// Offsets are absolute byte offsets within a segment. A far pointer's
/// landing pad is itself a pointer word, read from the target segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pointer {
    Null,
    Struct { target: u32, data_size: u32 },
    Far { segment: u32, landing_pad: u32 },
    List { header: u32 },
}

impl Pointer {
    /// Decode a pointer from its two halves.
    ///
    /// `offset` is only used to locate the word in error reports.
    ///
    /// # Errors
    ///
    /// [`WireError::MalformedPointer`] if a null word has stray bits or a
    /// list pointer's reserved half is non-zero.
    pub fn decode(lo: u32, hi: u32, offset: usize) -> Result<Self, WireError> {
        let payload = lo >> 2;
        match PointerKind::from_lo(lo) {
            PointerKind::Null => {
                if lo != 0 || hi != 0 {
                    return Err(WireError::MalformedPointer {
                        offset,
                        reason: "null pointer with non-zero bits",
                    });
                }
                Ok(Self::Null)
            }
            PointerKind::Struct => Ok(Self::Struct {
                target: payload,
                data_size: hi,
            }),
            PointerKind::Far => Ok(Self::Far {
                segment: hi,
                landing_pad: payload,
            }),
            PointerKind::List => {
                if hi != 0 {
                    return Err(WireError::MalformedPointer {
                        offset,
                        reason: "list pointer reserved half is non-zero",
                    });
                }
                Ok(Self::List { header: payload })
            }
        }
    }

    /// Read and decode the pointer word at `offset` in `view`.
    ///
    /// # Errors
    ///
    /// - [`WireError::OutOfBounds`] if the word does not fit.
    /// - [`WireError::MalformedPointer`] if its bits are inconsistent.
    pub fn read_from(view: &ByteView<'_>, offset: usize) -> Result<Self, WireError> {
        let lo = view.get_uint(offset)?;
        let hi = view.get_uint(offset + 4)?;
        Self::decode(lo, hi, offset)
    }

    #[must_use]
    pub fn kind(&self) -> PointerKind {
        match self {
            Self::Null => PointerKind::Null,
            Self::Struct { .. } => PointerKind::Struct,
            Self::Far { .. } => PointerKind::Far,
            Self::List { .. } => PointerKind::List,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Struct {
                target,
                data_size: 0,
            } => write!(f, "struct -> {target:#06x}"),
            Self::Struct { target, data_size } => {
                write!(f, "struct -> {target:#06x} ({data_size} bytes)")
            }
            Self::Far {
                segment,
                landing_pad,
            } => write!(f, "far -> segment {segment} pad {landing_pad:#06x}"),
            Self::List { header } => write!(f, "list -> {header:#06x}"),
        }
    }
}

/// The 8-byte header at the target of a list pointer.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────┐
/// │ Offset │ Size    │ Description                  │
/// ├────────┼─────────┼──────────────────────────────┤
/// │ 0x00   │ 4 bytes │ Element count                │
/// │ 0x04   │ 4 bytes │ Element stride in bytes      │
/// │ 0x08   │ ...     │ count × stride element bytes │
/// └────────┴─────────┴──────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListHeader {
    pub element_count: u32,
    pub stride: u32,
}

impl ListHeader {
    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if the header does not fit in `view`.
    pub fn read_from(view: &ByteView<'_>, offset: usize) -> Result<Self, WireError> {
        Ok(Self {
            element_count: view.get_uint(offset)?,
            stride: view.get_uint(offset + 4)?,
        })
    }

    /// Total bytes occupied by the elements, or `None` on overflow.
    #[must_use]
    pub fn body_len(&self) -> Option<usize> {
        usize::try_from(u64::from(self.element_count) * u64::from(self.stride)).ok()
    }
}
