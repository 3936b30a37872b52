//! Test-only message encoder.
//!
//! Writes segmented messages byte by byte from the wire format rules alone,
//! without calling into `segmsg-wire` or `segmsg-reader`, so the reader is
//! always checked against an independent implementation.
//!
//! ```text
//! let mut b = MessageBuilder::new();
//! let root = b.alloc(0, 8);             // root pointer word
//! let body = b.alloc(0, 16);            // struct body
//! b.put_struct_pointer(0, root, body, 16);
//! b.put_int(0, body, 5);
//! let framed = b.to_framed();           // segment table + bodies
//! ```

/// Bytes per pointer word and per list header.
pub const WORD: usize = 8;

const TAG_STRUCT: u32 = 1;
const TAG_FAR: u32 = 2;
const TAG_LIST: u32 = 3;

/// Growable multi-segment message under construction.
///
/// Every allocation is zero-filled and rounded up to a whole word, so a
/// freshly allocated pointer slot already reads as null.
#[derive(Clone, Debug)]
pub struct MessageBuilder {
    segments: Vec<Vec<u8>>,
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBuilder {
    /// A builder holding one empty segment.
    pub fn new() -> Self {
        Self {
            segments: vec![Vec::new()],
        }
    }

    /// Append an empty segment and return its index.
    pub fn add_segment(&mut self) -> u32 {
        self.segments.push(Vec::new());
        u32::try_from(self.segments.len() - 1).unwrap()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Reserve `len` zeroed bytes (rounded up to a word) at the end of
    /// `segment` and return their offset.
    pub fn alloc(&mut self, segment: u32, len: usize) -> usize {
        let seg = &mut self.segments[segment as usize];
        let offset = seg.len();
        seg.resize(offset + len.div_ceil(WORD) * WORD, 0);
        offset
    }

    /// Append raw bytes to `segment` without padding.
    pub fn append_raw(&mut self, segment: u32, bytes: &[u8]) -> usize {
        let seg = &mut self.segments[segment as usize];
        let offset = seg.len();
        seg.extend_from_slice(bytes);
        offset
    }

    pub fn put_bytes(&mut self, segment: u32, offset: usize, bytes: &[u8]) {
        self.segments[segment as usize][offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub fn put_int(&mut self, segment: u32, offset: usize, value: i32) {
        self.put_bytes(segment, offset, &value.to_le_bytes());
    }

    pub fn put_uint(&mut self, segment: u32, offset: usize, value: u32) {
        self.put_bytes(segment, offset, &value.to_le_bytes());
    }

    pub fn put_short(&mut self, segment: u32, offset: usize, value: i16) {
        self.put_bytes(segment, offset, &value.to_le_bytes());
    }

    pub fn put_long(&mut self, segment: u32, offset: usize, value: i64) {
        self.put_bytes(segment, offset, &value.to_le_bytes());
    }

    pub fn put_boolean(&mut self, segment: u32, offset: usize, value: bool) {
        self.put_bytes(segment, offset, &[u8::from(value)]);
    }

    fn put_word(&mut self, segment: u32, offset: usize, lo: u32, hi: u32) {
        self.put_uint(segment, offset, lo);
        self.put_uint(segment, offset + 4, hi);
    }

    /// Near struct pointer at `at` to a body at `target` in the same segment.
    pub fn put_struct_pointer(&mut self, segment: u32, at: usize, target: usize, data_size: u32) {
        self.put_word(segment, at, payload(target) | TAG_STRUCT, data_size);
    }

    /// Far pointer at `at` to the landing pad at `pad` in `target_segment`.
    pub fn put_far_pointer(&mut self, segment: u32, at: usize, target_segment: u32, pad: usize) {
        self.put_word(segment, at, payload(pad) | TAG_FAR, target_segment);
    }

    /// List pointer at `at` to the list header at `header`.
    pub fn put_list_pointer(&mut self, segment: u32, at: usize, header: usize) {
        self.put_word(segment, at, payload(header) | TAG_LIST, 0);
    }

    pub fn put_list_header(&mut self, segment: u32, at: usize, count: u32, stride: u32) {
        self.put_word(segment, at, count, stride);
    }

    /// Allocate a struct body and return its offset.
    pub fn alloc_struct(&mut self, segment: u32, data_size: u32) -> usize {
        self.alloc(segment, data_size as usize)
    }

    /// Allocate a list header plus `count * stride` element bytes.
    ///
    /// Returns `(header, base)` where `base` is the offset of element 0.
    pub fn alloc_list(&mut self, segment: u32, count: u32, stride: u32) -> (usize, usize) {
        let header = self.alloc(segment, WORD + count as usize * stride as usize);
        self.put_list_header(segment, header, count, stride);
        (header, header + WORD)
    }

    /// Allocate a byte list holding `bytes` and return its header offset.
    pub fn alloc_data(&mut self, segment: u32, bytes: &[u8]) -> usize {
        let count = u32::try_from(bytes.len()).unwrap();
        let (header, base) = self.alloc_list(segment, count, 1);
        self.put_bytes(segment, base, bytes);
        header
    }

    /// Write a far pointer at `(segment, at)` whose landing pad, allocated in
    /// `target_segment`, is a near struct pointer to `target`.
    pub fn put_far_struct(
        &mut self,
        segment: u32,
        at: usize,
        target_segment: u32,
        target: usize,
        data_size: u32,
    ) {
        let pad = self.alloc(target_segment, WORD);
        self.put_struct_pointer(target_segment, pad, target, data_size);
        self.put_far_pointer(segment, at, target_segment, pad);
    }

    /// Write a far pointer at `(segment, at)` whose landing pad, allocated in
    /// `target_segment`, is a list pointer to `header`.
    pub fn put_far_list(&mut self, segment: u32, at: usize, target_segment: u32, header: usize) {
        let pad = self.alloc(target_segment, WORD);
        self.put_list_pointer(target_segment, pad, header);
        self.put_far_pointer(segment, at, target_segment, pad);
    }

    pub fn segment(&self, index: u32) -> &[u8] {
        &self.segments[index as usize]
    }

    /// Borrow every segment in order.
    pub fn segments(&self) -> Vec<&[u8]> {
        self.segments.iter().map(Vec::as_slice).collect()
    }

    /// Segment 0 only, for single-block messages.
    pub fn into_single(mut self) -> Vec<u8> {
        self.segments.swap_remove(0)
    }

    /// Encode as one buffer: segment count, segment lengths, zero padding to
    /// a word boundary, then the bodies back to back.
    pub fn to_framed(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&u32::try_from(self.segments.len()).unwrap().to_le_bytes());
        for seg in &self.segments {
            out.extend_from_slice(&u32::try_from(seg.len()).unwrap().to_le_bytes());
        }
        out.resize(out.len().div_ceil(WORD) * WORD, 0);
        for seg in &self.segments {
            out.extend_from_slice(seg);
        }
        out
    }
}

fn payload(offset: usize) -> u32 {
    u32::try_from(offset).unwrap() << 2
}
