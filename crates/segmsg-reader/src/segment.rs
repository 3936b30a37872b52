use segmsg_wire::{ByteView, WireError};

use crate::error::ReadError;

/// Dense, 0-based index of a segment within its message.
pub type SegmentId = u32;

/// A fixed-width value that can be decoded from a segment.
///
/// Implemented for every primitive a generated reader exposes. `DEFAULT`
/// is the schema default returned for fields past a struct's declared
/// size.
pub trait Primitive: Copy {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Value of an absent field.
    const DEFAULT: Self;

    /// Decode `Self` from `view` at `offset`.
    ///
    /// # Errors
    ///
    /// [`WireError::OutOfBounds`] if `offset + WIDTH` exceeds the view.
    fn read(view: &ByteView<'_>, offset: usize) -> Result<Self, WireError>;
}

macro_rules! primitive {
    ($ty:ty, $width:expr, $default:expr, $getter:ident) => {
        impl Primitive for $ty {
            const WIDTH: usize = $width;
            const DEFAULT: Self = $default;

            fn read(view: &ByteView<'_>, offset: usize) -> Result<Self, WireError> {
                view.$getter(offset)
            }
        }
    };
}

primitive!(bool, 1, false, get_boolean);
primitive!(i8, 1, 0, get_byte);
primitive!(u8, 1, 0, get_ubyte);
primitive!(i16, 2, 0, get_short);
primitive!(u16, 2, 0, get_ushort);
primitive!(i32, 4, 0, get_int);
primitive!(u32, 4, 0, get_uint);
primitive!(i64, 8, 0, get_long);
primitive!(u64, 8, 0, get_ulong);
primitive!(f32, 4, 0.0, get_float);
primitive!(f64, 8, 0.0, get_double);

/// One contiguous block of a message.
///
/// A segment does not point back at its message. It knows its own index,
/// and decode contexts that need to reach another segment go through the
/// [`MessageReader`](crate::MessageReader) handle they carry. The segment
/// borrows its bytes; nothing is copied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<'a> {
    id: SegmentId,
    view: ByteView<'a>,
}

impl<'a> Segment<'a> {
    /// A standalone segment that belongs to no multi-segment message.
    ///
    /// It takes index 0, which is also what a single-block message assigns
    /// to its only segment.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_id(0, bytes)
    }

    /// A segment at position `id` of a multi-segment message.
    #[must_use]
    pub fn with_id(id: SegmentId, bytes: &'a [u8]) -> Self {
        Self {
            id,
            view: ByteView::new(bytes),
        }
    }

    #[must_use]
    pub fn id(&self) -> SegmentId {
        self.id
    }

    #[must_use]
    pub fn view(&self) -> &ByteView<'a> {
        &self.view
    }

    /// Physical length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.view.as_bytes()
    }

    /// Decode any [`Primitive`] at `offset`.
    ///
    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if the value does not fit.
    pub fn get_at<T: Primitive>(&self, offset: usize) -> Result<T, ReadError> {
        T::read(&self.view, offset).map_err(|e| ReadError::in_segment(self.id, e))
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if `offset + 4` exceeds the segment.
    pub fn get_int_at(&self, offset: usize) -> Result<i32, ReadError> {
        self.get_at(offset)
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if `offset + 2` exceeds the segment.
    pub fn get_short_at(&self, offset: usize) -> Result<i16, ReadError> {
        self.get_at(offset)
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if `offset` is not inside the segment.
    pub fn get_boolean_at(&self, offset: usize) -> Result<bool, ReadError> {
        self.get_at(offset)
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if `offset + 8` exceeds the segment.
    pub fn get_long_at(&self, offset: usize) -> Result<i64, ReadError> {
        self.get_at(offset)
    }

    /// Borrow `len` bytes at `offset`.
    ///
    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if the range does not fit.
    pub fn get_bytes_at(&self, offset: usize, len: usize) -> Result<&'a [u8], ReadError> {
        self.view
            .get_bytes(offset, len)
            .map_err(|e| ReadError::in_segment(self.id, e))
    }
}
