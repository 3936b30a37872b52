use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::error::ReadError;
use crate::message::MessageReader;
use crate::reader::Reader;
use crate::segment::SegmentId;

/// A resolved list: `len` elements of `stride` bytes starting at `base`.
///
/// The element extent was bounds-checked when the list pointer was
/// resolved, so element access only checks the index. Each element is
/// exposed as a [`Reader`] whose declared data size is the stride; struct
/// elements narrower than the reading schema expects therefore read their
/// missing fields as defaults.
///
/// ```text
///   base
///    │◄─ stride ─►│◄─ stride ─►│     │◄─ stride ─►│
///    ├────────────┼────────────┼ ... ┼────────────┤
///    │ element 0  │ element 1  │     │ element n-1│
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ListReader<'a> {
    message: &'a MessageReader<'a>,
    segment: SegmentId,
    base: usize,
    len: u32,
    stride: u32,
}

impl<'a> ListReader<'a> {
    /// Caller guarantees the extent `base .. base + len * stride` lies
    /// inside `segment`.
    pub(crate) fn new(
        message: &'a MessageReader<'a>,
        segment: SegmentId,
        base: usize,
        len: u32,
        stride: u32,
    ) -> Self {
        Self {
            message,
            segment,
            base,
            len,
            stride,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes per element.
    #[must_use]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    #[must_use]
    pub fn segment_id(&self) -> SegmentId {
        self.segment
    }

    /// Offset of element 0 within the segment.
    #[must_use]
    pub fn base(&self) -> usize {
        self.base
    }

    fn element(&self, index: usize) -> Reader<'a> {
        let offset = self.base + index * self.stride as usize;
        Reader::at(self.message, self.segment, offset, Some(self.stride))
    }

    /// Reader for element `index`.
    ///
    /// # Errors
    ///
    /// [`ReadError::IndexOutOfRange`] if `index >= len`.
    pub fn get(&self, index: usize) -> Result<Reader<'a>, ReadError> {
        if index >= self.len() {
            return Err(ReadError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(self.element(index))
    }

    /// Element `index` wrapped in a generated type.
    ///
    /// # Errors
    ///
    /// [`ReadError::IndexOutOfRange`] if `index >= len`.
    pub fn get_as<T: From<Reader<'a>>>(&self, index: usize) -> Result<T, ReadError> {
        self.get(index).map(T::from)
    }

    /// # Errors
    ///
    /// [`ReadError::IndexOutOfRange`] if `index >= len`.
    pub fn get_int(&self, index: usize) -> Result<i32, ReadError> {
        self.get(index)?.read_int(0)
    }

    /// # Errors
    ///
    /// [`ReadError::IndexOutOfRange`] if `index >= len`.
    pub fn get_short(&self, index: usize) -> Result<i16, ReadError> {
        self.get(index)?.read_short(0)
    }

    /// # Errors
    ///
    /// [`ReadError::IndexOutOfRange`] if `index >= len`.
    pub fn get_boolean(&self, index: usize) -> Result<bool, ReadError> {
        self.get(index)?.read_boolean(0)
    }

    /// # Errors
    ///
    /// [`ReadError::IndexOutOfRange`] if `index >= len`.
    pub fn get_ubyte(&self, index: usize) -> Result<u8, ReadError> {
        self.get(index)?.read_ubyte(0)
    }

    /// # Errors
    ///
    /// [`ReadError::IndexOutOfRange`] if `index >= len`.
    pub fn get_long(&self, index: usize) -> Result<i64, ReadError> {
        self.get(index)?.read_long(0)
    }

    /// Borrow the list body as raw bytes.
    ///
    /// # Errors
    ///
    /// [`ReadError::MalformedPointer`] if the list is non-empty and its
    /// stride is not 1.
    pub fn as_bytes(&self) -> Result<&'a [u8], ReadError> {
        if self.len != 0 && self.stride != 1 {
            return Err(ReadError::MalformedPointer {
                segment: self.segment,
                offset: self.base,
                reason: "byte list must have stride 1",
            });
        }
        self.message
            .segment(self.segment)?
            .get_bytes_at(self.base, self.len())
    }

    #[must_use]
    pub fn iter(&self) -> ListIter<'a> {
        ListIter {
            list: *self,
            front: 0,
            back: self.len(),
        }
    }

    /// View the list as elements of generated type `T`.
    #[must_use]
    pub fn typed<T: From<Reader<'a>>>(self) -> TypedList<'a, T> {
        TypedList {
            list: self,
            _element: PhantomData,
        }
    }
}

impl<'a> IntoIterator for ListReader<'a> {
    type Item = Reader<'a>;
    type IntoIter = ListIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &ListReader<'a> {
    type Item = Reader<'a>;
    type IntoIter = ListIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the element readers of a [`ListReader`].
#[derive(Clone, Debug)]
pub struct ListIter<'a> {
    list: ListReader<'a>,
    front: usize,
    back: usize,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = Reader<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let element = self.list.element(self.front);
        self.front += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for ListIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.list.element(self.back))
    }
}

impl ExactSizeIterator for ListIter<'_> {}

impl FusedIterator for ListIter<'_> {}

/// A [`ListReader`] whose elements are a generated struct type.
#[derive(Debug)]
pub struct TypedList<'a, T> {
    list: ListReader<'a>,
    _element: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedList<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedList<'_, T> {}

impl<'a, T: From<Reader<'a>>> TypedList<'a, T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// # Errors
    ///
    /// [`ReadError::IndexOutOfRange`] if `index >= len`.
    pub fn get(&self, index: usize) -> Result<T, ReadError> {
        self.list.get_as(index)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = T> + DoubleEndedIterator + use<'a, T> {
        self.list.iter().map(T::from)
    }

    #[must_use]
    pub fn untyped(&self) -> ListReader<'a> {
        self.list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_pointer(header: u32) -> [u8; 8] {
        let mut buf = [0u8; 8];
        buf[0..4].copy_from_slice(&((header << 2) | 3).to_le_bytes());
        buf
    }

    fn header(count: u32, stride: u32) -> Vec<u8> {
        let mut buf = count.to_le_bytes().to_vec();
        buf.extend_from_slice(&stride.to_le_bytes());
        buf
    }

    fn int_list(values: &[i32]) -> Vec<u8> {
        let count = u32::try_from(values.len()).unwrap();
        let mut bytes = list_pointer(8).to_vec();
        bytes.extend(header(count, 4));
        for value in values {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn int_elements() {
        let bytes = int_list(&[3, -1, 40]);
        let message = MessageReader::single(&bytes);
        let list = message.root(0).read_list(0).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.stride(), 4);
        assert_eq!(list.base(), 16);
        assert_eq!(list.get_int(0).unwrap(), 3);
        assert_eq!(list.get_int(1).unwrap(), -1);
        assert_eq!(list.get_int(2).unwrap(), 40);
    }

    #[test]
    fn index_out_of_range() {
        let bytes = int_list(&[1, 2]);
        let message = MessageReader::single(&bytes);
        let list = message.root(0).read_list(0).unwrap();
        assert!(matches!(
            list.get(2),
            Err(ReadError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(list.get_int(usize::MAX).is_err());
    }

    #[test]
    fn iteration_both_ends() {
        let bytes = int_list(&[10, 20, 30, 40]);
        let message = MessageReader::single(&bytes);
        let list = message.root(0).read_list(0).unwrap();

        let forward: Vec<i32> = list.iter().map(|r| r.read_int(0).unwrap()).collect();
        assert_eq!(forward, [10, 20, 30, 40]);

        let backward: Vec<i32> = list.iter().rev().map(|r| r.read_int(0).unwrap()).collect();
        assert_eq!(backward, [40, 30, 20, 10]);

        let mut iter = list.iter();
        assert_eq!(iter.len(), 4);
        iter.next();
        iter.next_back();
        assert_eq!(iter.len(), 2);
    }

    #[test]
    fn struct_elements_read_defaults_past_stride() {
        // two 4-byte struct elements read by a schema expecting 8 bytes
        let mut bytes = list_pointer(8).to_vec();
        bytes.extend(header(2, 4));
        bytes.extend_from_slice(&7i32.to_le_bytes());
        bytes.extend_from_slice(&8i32.to_le_bytes());

        let message = MessageReader::single(&bytes);
        let list = message.root(0).read_list(0).unwrap();
        let first = list.get(0).unwrap();
        assert_eq!(first.data_size(), Some(4));
        assert_eq!(first.read_int(0).unwrap(), 7);
        // overlaps element 1, which the stride hides
        assert_eq!(first.read_int(4).unwrap(), 0);

        // past the declared stride and past the segment end
        let second = list.get(1).unwrap();
        assert_eq!(second.read_int(0).unwrap(), 8);
        assert!(matches!(
            second.read_int(4),
            Err(ReadError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn byte_lists() {
        let mut bytes = list_pointer(8).to_vec();
        bytes.extend(header(3, 1));
        bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);

        let message = MessageReader::single(&bytes);
        let list = message.root(0).read_list(0).unwrap();
        assert_eq!(list.as_bytes().unwrap(), &[0xAAu8, 0xBB, 0xCC]);
        assert_eq!(list.get_ubyte(2).unwrap(), 0xCC);

        let ints = int_list(&[1]);
        let message = MessageReader::single(&ints);
        let list = message.root(0).read_list(0).unwrap();
        assert!(matches!(
            list.as_bytes(),
            Err(ReadError::MalformedPointer { .. })
        ));
    }

    #[test]
    fn empty_list_from_null() {
        let message = MessageReader::single(&[0u8; 8]);
        let list = message.root(0).read_list(0).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);
        assert_eq!(list.as_bytes().unwrap(), &[] as &[u8]);
    }

    #[derive(Debug)]
    struct Wrapped<'a>(Reader<'a>);

    impl<'a> From<Reader<'a>> for Wrapped<'a> {
        fn from(reader: Reader<'a>) -> Self {
            Self(reader)
        }
    }

    #[test]
    fn typed_list() {
        let bytes = int_list(&[5, 6]);
        let message = MessageReader::single(&bytes);
        let typed = message.root(0).read_list(0).unwrap().typed::<Wrapped<'_>>();
        assert_eq!(typed.len(), 2);
        assert_eq!(typed.get(1).unwrap().0.read_int(0).unwrap(), 6);
        let values: Vec<i32> = typed.iter().map(|w| w.0.read_int(0).unwrap()).collect();
        assert_eq!(values, [5, 6]);
        assert!(typed.get(2).is_err());
    }
}
