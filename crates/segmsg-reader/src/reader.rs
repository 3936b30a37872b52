use segmsg_wire::POINTER_SIZE;

use crate::error::ReadError;
use crate::list::ListReader;
use crate::message::{MessageReader, Target};
use crate::segment::{Primitive, Segment, SegmentId};

/// A cursor saying "a value lives at byte `offset` of segment `segment`".
///
/// `Reader` is the base every generated type wraps. Field accessors take
/// a byte offset relative to the cursor and delegate to the owning
/// [`MessageReader`] for the bytes, so pointer following lives in one
/// place no matter how many schema types exist.
///
/// Readers are `Copy`, read-only, and borrow their message; any number of
/// them may be used at once, from any thread.
///
/// ```text
///   Reader { segment: 1, offset: 0x40, data_size: Some(16) }
///
///   segment 1:  ... │ 0x40 ───────── 16 bytes ───────── │ ...
///                     ▲ read_int(0)       ▲ read_int(12)   ▲ read_int(16) → default
/// ```
///
/// The offset is validated lazily: a reader may point past valid data as
/// long as no field is read from it.
#[derive(Clone, Copy, Debug)]
pub struct Reader<'a> {
    message: &'a MessageReader<'a>,
    segment: SegmentId,
    offset: usize,
    data_size: Option<u32>,
    /// Stands in for a null struct pointer; has no bytes behind it.
    absent: bool,
}

impl<'a> Reader<'a> {
    /// Reader at `(segment, offset)` of `message`.
    ///
    /// # Errors
    ///
    /// [`ReadError::InvalidSegment`] if `segment` is not in the message.
    pub fn new(
        message: &'a MessageReader<'a>,
        segment: SegmentId,
        offset: usize,
    ) -> Result<Self, ReadError> {
        message.segment(segment)?;
        Ok(Self::at(message, segment, offset, None))
    }

    /// Caller guarantees `segment` exists in `message`.
    pub(crate) fn at(
        message: &'a MessageReader<'a>,
        segment: SegmentId,
        offset: usize,
        data_size: Option<u32>,
    ) -> Self {
        Self {
            message,
            segment,
            offset,
            data_size,
            absent: false,
        }
    }

    #[must_use]
    pub fn message(&self) -> &'a MessageReader<'a> {
        self.message
    }

    #[must_use]
    pub fn segment_id(&self) -> SegmentId {
        self.segment
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Declared data size, if this reader came from a sized struct pointer
    /// or a list element.
    #[must_use]
    pub fn data_size(&self) -> Option<u32> {
        self.data_size
    }

    fn segment(&self) -> Result<&'a Segment<'a>, ReadError> {
        self.message.segment(self.segment)
    }

    /// True when a field of `width` bytes at `field` lies beyond the
    /// declared data size and the message returns defaults for it.
    fn past_declared_end(&self, field: usize, width: usize) -> bool {
        self.message.options().defaults_past_end
            && self
                .data_size
                .is_some_and(|size| field.saturating_add(width) > size as usize)
    }

    /// Absolute offset of a `width`-byte field, checked against the
    /// segment's physical length.
    fn locate(&self, field: usize, width: usize) -> Result<usize, ReadError> {
        let segment = self.segment()?;
        let out_of_bounds = || ReadError::OutOfBounds {
            segment: self.segment,
            offset: self.offset.saturating_add(field),
            width,
            len: segment.len(),
        };
        let at = self.offset.checked_add(field).ok_or_else(out_of_bounds)?;
        match at.checked_add(width) {
            Some(end) if end <= segment.len() => Ok(at),
            _ => Err(out_of_bounds()),
        }
    }

    /// Reader for an absent struct: every field reads as its default.
    fn empty_struct(&self) -> Self {
        Self {
            absent: true,
            ..Self::at(self.message, self.segment, 0, Some(0))
        }
    }

    fn empty_list(&self) -> ListReader<'a> {
        ListReader::new(self.message, self.segment, 0, 0, 0)
    }

    /// Decode any [`Primitive`] at `field` bytes past the cursor.
    ///
    /// Physical bounds are checked before the declared data size, so a
    /// default is only returned for bytes that exist in the segment.
    ///
    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if the value extends past the segment.
    pub fn read<T: Primitive>(&self, field: usize) -> Result<T, ReadError> {
        if self.absent {
            return Ok(T::DEFAULT);
        }
        let at = self.locate(field, T::WIDTH)?;
        if self.past_declared_end(field, T::WIDTH) {
            return Ok(T::DEFAULT);
        }
        self.segment()?.get_at(at)
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if the field extends past the segment.
    pub fn read_int(&self, field: usize) -> Result<i32, ReadError> {
        self.read(field)
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if the field extends past the segment.
    pub fn read_short(&self, field: usize) -> Result<i16, ReadError> {
        self.read(field)
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if the field is past the segment.
    pub fn read_boolean(&self, field: usize) -> Result<bool, ReadError> {
        self.read(field)
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if the field is past the segment.
    pub fn read_byte(&self, field: usize) -> Result<i8, ReadError> {
        self.read(field)
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if the field is past the segment.
    pub fn read_ubyte(&self, field: usize) -> Result<u8, ReadError> {
        self.read(field)
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if the field extends past the segment.
    pub fn read_ushort(&self, field: usize) -> Result<u16, ReadError> {
        self.read(field)
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if the field extends past the segment.
    pub fn read_uint(&self, field: usize) -> Result<u32, ReadError> {
        self.read(field)
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if the field extends past the segment.
    pub fn read_long(&self, field: usize) -> Result<i64, ReadError> {
        self.read(field)
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if the field extends past the segment.
    pub fn read_ulong(&self, field: usize) -> Result<u64, ReadError> {
        self.read(field)
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if the field extends past the segment.
    pub fn read_float(&self, field: usize) -> Result<f32, ReadError> {
        self.read(field)
    }

    /// # Errors
    ///
    /// [`ReadError::OutOfBounds`] if the field extends past the segment.
    pub fn read_double(&self, field: usize) -> Result<f64, ReadError> {
        self.read(field)
    }

    /// Resolve the pointer word at `field`. A word past the declared data
    /// size reads as null.
    fn resolve_field(&self, field: usize) -> Result<(usize, Target), ReadError> {
        if self.absent {
            return Ok((self.offset, Target::Null));
        }
        let at = self.locate(field, POINTER_SIZE)?;
        if self.past_declared_end(field, POINTER_SIZE) {
            return Ok((at, Target::Null));
        }
        let target = self.message.resolve(self.segment, at)?;
        Ok((at, target))
    }

    /// Follow the struct pointer at `field` to a nested reader.
    ///
    /// Near pointers stay in this segment; far pointers may move the new
    /// reader to another segment. The returned reader shares this reader's
    /// message and carries the pointer's declared data size.
    ///
    /// A null pointer yields an empty struct whose fields all read as
    /// defaults, unless [`ReaderOptions::defaults_past_end`] is off.
    ///
    /// # Errors
    ///
    /// - [`ReadError::OutOfBounds`] if the pointer word or a landing pad is
    ///   past the end of its segment.
    /// - [`ReadError::InvalidSegment`] if a far pointer names a missing segment.
    /// - [`ReadError::MalformedPointer`] if the word is not a struct pointer,
    ///   is null under strict options, or the far chain is too long.
    ///
    /// [`ReaderOptions::defaults_past_end`]: crate::ReaderOptions::defaults_past_end
    pub fn read_struct(&self, field: usize) -> Result<Reader<'a>, ReadError> {
        let (at, target) = self.resolve_field(field)?;
        match target {
            Target::Struct {
                segment,
                offset,
                data_size,
            } => Ok(Self::at(self.message, segment, offset, data_size)),
            Target::Null if self.message.options().defaults_past_end => Ok(self.empty_struct()),
            Target::Null => Err(ReadError::MalformedPointer {
                segment: self.segment,
                offset: at,
                reason: "null struct pointer",
            }),
            Target::List { .. } => Err(ReadError::MalformedPointer {
                segment: self.segment,
                offset: at,
                reason: "expected struct pointer, found list",
            }),
        }
    }

    /// Follow the list pointer at `field`.
    ///
    /// The list header at the target gives the element count and stride;
    /// the whole element extent is bounds-checked here, so element reads
    /// through the returned [`ListReader`] stay inside the segment. A null
    /// pointer yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`ReadError::OutOfBounds`] if the pointer, header, or elements do
    ///   not fit in their segment.
    /// - [`ReadError::InvalidSegment`] if a far pointer names a missing segment.
    /// - [`ReadError::MalformedPointer`] if the word is not a list pointer or
    ///   the list is inconsistent.
    pub fn read_list(&self, field: usize) -> Result<ListReader<'a>, ReadError> {
        let (at, target) = self.resolve_field(field)?;
        match target {
            Target::List {
                segment,
                base,
                element_count,
                stride,
            } => Ok(ListReader::new(
                self.message,
                segment,
                base,
                element_count,
                stride,
            )),
            Target::Null => Ok(self.empty_list()),
            Target::Struct { .. } => Err(ReadError::MalformedPointer {
                segment: self.segment,
                offset: at,
                reason: "expected list pointer, found struct",
            }),
        }
    }

    /// Borrow the byte list at `field`.
    ///
    /// # Errors
    ///
    /// All errors from [`read_list`](Self::read_list), plus
    /// [`ReadError::MalformedPointer`] if the list stride is not 1.
    pub fn read_data(&self, field: usize) -> Result<&'a [u8], ReadError> {
        self.read_list(field)?.as_bytes()
    }

    /// Borrow the UTF-8 text stored as a byte list at `field`.
    ///
    /// # Errors
    ///
    /// All errors from [`read_data`](Self::read_data), plus
    /// [`ReadError::InvalidUtf8`] if the bytes are not UTF-8.
    pub fn read_text(&self, field: usize) -> Result<&'a str, ReadError> {
        let list = self.read_list(field)?;
        let bytes = list.as_bytes()?;
        std::str::from_utf8(bytes).map_err(|_| ReadError::InvalidUtf8 {
            segment: list.segment_id(),
            offset: list.base(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageSource;
    use crate::options::ReaderOptions;
    use proptest::prelude::*;

    fn pointer(lo: u32, hi: u32) -> [u8; 8] {
        let mut buf = [0u8; 8];
        buf[0..4].copy_from_slice(&lo.to_le_bytes());
        buf[4..8].copy_from_slice(&hi.to_le_bytes());
        buf
    }

    fn near_struct(target: u32, size: u32) -> [u8; 8] {
        pointer((target << 2) | 1, size)
    }

    fn list_at(header: u32) -> [u8; 8] {
        pointer((header << 2) | 3, 0)
    }

    // 16-byte segment from the format description
    const SCENARIO: [u8; 16] = [
        0x05, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00,
    ];

    #[test]
    fn scenario_fields() {
        let message = MessageReader::single(&SCENARIO);
        let root = message.root(0);
        assert_eq!(root.read_int(0).unwrap(), 5);
        assert!(root.read_boolean(4).unwrap());
        assert_eq!(root.read_int(8).unwrap(), 42);
    }

    #[test]
    fn root_offset_shifts_fields() {
        let message = MessageReader::single(&SCENARIO);
        let reader = message.root(8);
        assert_eq!(reader.read_int(0).unwrap(), 42);
        assert_eq!(reader.read_long(0).unwrap(), 42);
    }

    #[test]
    fn straddling_read_is_out_of_bounds() {
        let bytes = [0u8; 4];
        let message = MessageReader::single(&bytes);
        assert!(matches!(
            message.root(0).read_int(1),
            Err(ReadError::OutOfBounds {
                segment: 0,
                offset: 1,
                width: 4,
                len: 4
            })
        ));
    }

    #[test]
    fn reader_past_data_is_fine_until_read() {
        let bytes = [0u8; 4];
        let message = MessageReader::single(&bytes);
        let reader = message.root(1000);
        assert_eq!(reader.offset(), 1000);
        assert!(reader.read_boolean(0).is_err());
    }

    #[test]
    fn offset_overflow_is_out_of_bounds() {
        let message = MessageReader::single(&SCENARIO);
        let reader = message.root(usize::MAX);
        assert!(matches!(
            reader.read_int(8),
            Err(ReadError::OutOfBounds {
                offset: usize::MAX,
                width: 4,
                len: 16,
                ..
            })
        ));
        let near_end = message.root(usize::MAX - 2);
        match near_end.read_int(0) {
            Err(ReadError::OutOfBounds { offset, width, .. }) => {
                assert_eq!(offset, usize::MAX - 2);
                assert_eq!(width, 4);
            }
            other => panic!("expected OutOfBounds, got {other:?}"),
        }
    }

    #[test]
    fn struct_pointer_near() {
        let mut bytes = near_struct(8, 8).to_vec();
        bytes.extend_from_slice(&17i32.to_le_bytes());
        bytes.extend_from_slice(&(-3i16).to_le_bytes());
        bytes.extend_from_slice(&[1, 0]);

        let message = MessageReader::single(&bytes);
        let nested = message.root(0).read_struct(0).unwrap();
        assert_eq!(nested.segment_id(), 0);
        assert_eq!(nested.offset(), 8);
        assert_eq!(nested.data_size(), Some(8));
        assert_eq!(nested.read_int(0).unwrap(), 17);
        assert_eq!(nested.read_short(4).unwrap(), -3);
        assert!(nested.read_boolean(6).unwrap());
    }

    #[test]
    fn fields_past_declared_size_read_as_default() {
        // declared size 4, but 16 physical bytes follow
        let mut bytes = near_struct(8, 4).to_vec();
        bytes.extend_from_slice(&9i32.to_le_bytes());
        bytes.extend_from_slice(&0x7777_7777i32.to_le_bytes());
        bytes.extend_from_slice(&[0xFF; 8]);

        let message = MessageReader::single(&bytes);
        let nested = message.root(0).read_struct(0).unwrap();
        assert_eq!(nested.read_int(0).unwrap(), 9);
        assert_eq!(nested.read_int(4).unwrap(), 0);
        assert!(!nested.read_boolean(4).unwrap());
        // partly past the declared end
        assert_eq!(nested.read_long(0).unwrap(), 0);
        assert!(nested.read_list(4).unwrap().is_empty());
    }

    #[test]
    fn strict_options_ignore_declared_size() {
        let mut bytes = near_struct(8, 4).to_vec();
        bytes.extend_from_slice(&9i32.to_le_bytes());
        bytes.extend_from_slice(&0x7777_7777i32.to_le_bytes());

        let message =
            MessageReader::new(MessageSource::Single(&bytes), ReaderOptions::strict()).unwrap();
        let nested = message.root(0).read_struct(0).unwrap();
        assert_eq!(nested.read_int(4).unwrap(), 0x7777_7777);
        // physical end still enforced
        assert!(matches!(
            nested.read_int(8),
            Err(ReadError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn physical_end_wins_past_declared_size() {
        // struct at 1000 in a 16-byte segment, declaring 4 data bytes
        let mut bytes = near_struct(1000, 4).to_vec();
        bytes.extend_from_slice(&[0u8; 8]);

        let message = MessageReader::single(&bytes);
        let nested = message.root(0).read_struct(0).unwrap();
        assert!(matches!(
            nested.read_int(0),
            Err(ReadError::OutOfBounds { offset: 1000, .. })
        ));
        assert!(matches!(
            nested.read_int(4),
            Err(ReadError::OutOfBounds {
                segment: 0,
                offset: 1004,
                width: 4,
                len: 16
            })
        ));
        assert!(matches!(
            nested.read_list(8),
            Err(ReadError::OutOfBounds { offset: 1008, .. })
        ));
    }

    #[test]
    fn defaults_stop_at_physical_end() {
        // 4-byte struct in the last word: field 4 is still in the segment,
        // field 8 is not
        let mut bytes = near_struct(8, 4).to_vec();
        bytes.extend_from_slice(&6i32.to_le_bytes());
        bytes.extend_from_slice(&[0xAB; 4]);

        let message = MessageReader::single(&bytes);
        let nested = message.root(0).read_struct(0).unwrap();
        assert_eq!(nested.read_int(4).unwrap(), 0);
        assert!(matches!(
            nested.read_int(8),
            Err(ReadError::OutOfBounds { offset: 16, .. })
        ));
    }

    #[test]
    fn physical_end_wins_inside_declared_size() {
        // declares 16 bytes but the segment ends after 4
        let mut bytes = near_struct(8, 16).to_vec();
        bytes.extend_from_slice(&1i32.to_le_bytes());

        let message = MessageReader::single(&bytes);
        let nested = message.root(0).read_struct(0).unwrap();
        assert_eq!(nested.read_int(0).unwrap(), 1);
        assert!(matches!(
            nested.read_int(4),
            Err(ReadError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn null_struct_pointer() {
        let bytes = [0u8; 8];
        let message = MessageReader::single(&bytes);
        let empty = message.root(0).read_struct(0).unwrap();
        assert_eq!(empty.read_int(0).unwrap(), 0);
        // no bytes behind an absent struct, so any field reads as default
        assert_eq!(empty.read_long(4096).unwrap(), 0);
        assert!(empty.read_list(64).unwrap().is_empty());
        assert_eq!(empty.read_struct(0).unwrap().read_short(2).unwrap(), 0);

        let strict =
            MessageReader::new(MessageSource::Single(&bytes), ReaderOptions::strict()).unwrap();
        assert!(matches!(
            strict.root(0).read_struct(0),
            Err(ReadError::MalformedPointer {
                reason: "null struct pointer",
                ..
            })
        ));
    }

    #[test]
    fn wrong_pointer_kind() {
        let mut bytes = list_at(8).to_vec();
        bytes.extend_from_slice(&[0u8; 8]);
        bytes.extend_from_slice(&near_struct(0, 0));

        let message = MessageReader::single(&bytes);
        let root = message.root(0);
        assert!(matches!(
            root.read_struct(0),
            Err(ReadError::MalformedPointer { .. })
        ));
        assert!(matches!(
            root.read_list(16),
            Err(ReadError::MalformedPointer { .. })
        ));
    }

    #[test]
    fn text_and_data() {
        let mut bytes = list_at(16).to_vec();
        bytes.extend_from_slice(&list_at(32));
        bytes.extend_from_slice(&5u32.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(b"hello\0\0\0");
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&[0xC3, 0x28]);

        let message = MessageReader::single(&bytes);
        let root = message.root(0);
        assert_eq!(root.read_text(0).unwrap(), "hello");
        assert_eq!(root.read_data(0).unwrap(), b"hello");
        assert_eq!(root.read_data(8).unwrap(), &[0xC3u8, 0x28]);
        assert!(matches!(
            root.read_text(8),
            Err(ReadError::InvalidUtf8 { offset: 40, .. })
        ));
    }

    #[test]
    fn null_text_is_empty() {
        let message = MessageReader::single(&[0u8; 8]);
        assert_eq!(message.root(0).read_text(0).unwrap(), "");
    }

    #[test]
    fn new_validates_segment() {
        let message = MessageReader::single(&[0u8; 4]);
        assert!(Reader::new(&message, 0, 0).is_ok());
        assert!(matches!(
            Reader::new(&message, 1, 0),
            Err(ReadError::InvalidSegment { index: 1, count: 1 })
        ));
    }

    proptest! {
        #[test]
        fn read_int_matches_le_or_fails(
            bytes in prop::collection::vec(any::<u8>(), 0..64),
            field in 0usize..80,
        ) {
            let message = MessageReader::single(&bytes);
            match message.root(0).read_int(field) {
                Ok(value) => {
                    let expected = i32::from_le_bytes(bytes[field..field + 4].try_into().unwrap());
                    prop_assert_eq!(value, expected);
                }
                Err(ReadError::OutOfBounds { .. }) => prop_assert!(field + 4 > bytes.len()),
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }

        #[test]
        fn pointer_reads_never_panic(
            bytes in prop::collection::vec(any::<u8>(), 0..128),
            field in 0usize..128,
        ) {
            let message = MessageReader::single(&bytes);
            let root = message.root(0);
            let _ = root.read_struct(field).and_then(|s| s.read_long(0));
            let _ = root.read_text(field);
            if let Ok(list) = root.read_list(field) {
                for element in &list {
                    let _ = element.read_int(0);
                }
            }
        }
    }
}
