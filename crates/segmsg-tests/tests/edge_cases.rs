//! Edge cases the reader must handle without panicking or misreading:
//!
//! - **Schema evolution**: a struct written by an older schema declares a
//!   smaller data size; newer fields past it read as defaults unless the
//!   message uses strict options.
//! - **Null pointers**: a null struct is an empty struct (or an error under
//!   strict options); a null list is empty.
//! - **Bounds**: reads that straddle a segment end fail, never truncate,
//!   even for fields past a struct's declared size.
//! - **Malformed words**: stray bits and far cycles are rejected.

use segmsg_reader::{MessageReader, MessageSource, ReadError, Reader, ReaderOptions};
use segmsg_tests::{MessageBuilder, TREE_NODE_SIZE, TreeNode};

fn strict(bytes: &[u8]) -> MessageReader<'_> {
    MessageReader::new(MessageSource::Single(bytes), ReaderOptions::strict()).unwrap()
}

/// A `TreeNode` written by a schema that only had `value` and `is_leaf`,
/// followed by 16 bytes of unrelated data.
fn old_schema_node() -> Vec<u8> {
    let mut b = MessageBuilder::new();
    let root = b.alloc(0, 8);
    let body = b.alloc_struct(0, 8);
    b.put_int(0, body, 99);
    b.put_boolean(0, body + 4, true);
    b.put_struct_pointer(0, root, body, 8);
    let junk = b.alloc(0, 16);
    b.put_long(0, junk, -1);
    b.put_long(0, junk + 8, -1);
    b.into_single()
}

// ── Schema evolution ──────────────────────────────────────────────────────────

#[test]
fn fields_past_declared_size_default() {
    let bytes = old_schema_node();
    let message = MessageReader::single(&bytes);
    let node = TreeNode::from(message.root_pointer(0).unwrap());

    assert_eq!(node.reader().data_size(), Some(8));
    assert_eq!(node.value().unwrap(), 99);
    assert!(node.is_leaf().unwrap());
    assert_eq!(node.depth().unwrap(), 0);
    assert!(node.children().unwrap().is_empty());
    assert_eq!(node.label().unwrap(), "");
}

#[test]
fn strict_options_read_past_declared_size() {
    let bytes = old_schema_node();
    let message = strict(&bytes);
    let node = TreeNode::from(message.root_pointer(0).unwrap());

    assert_eq!(node.value().unwrap(), 99);
    // the bytes after the 8-byte body are 0xFF.., which decode as a
    // malformed list pointer rather than a default
    assert!(node.children().is_err());
}

#[test]
fn declared_size_larger_than_segment() {
    let mut b = MessageBuilder::new();
    let root = b.alloc(0, 8);
    let body = b.alloc_struct(0, 8);
    b.put_struct_pointer(0, root, body, TREE_NODE_SIZE);
    let bytes = b.into_single();

    let message = MessageReader::single(&bytes);
    let node = TreeNode::from(message.root_pointer(0).unwrap());
    assert_eq!(node.value().unwrap(), 0);
    assert!(matches!(
        node.children(),
        Err(ReadError::OutOfBounds { .. })
    ));
}

#[test]
fn declared_size_does_not_hide_physical_end() {
    // the node body sits in the last word, so fields past its declared
    // 8 bytes are also past the segment end
    let mut b = MessageBuilder::new();
    let root = b.alloc(0, 8);
    let body = b.alloc_struct(0, 8);
    b.put_int(0, body, 5);
    b.put_struct_pointer(0, root, body, 8);
    let bytes = b.into_single();

    let message = MessageReader::single(&bytes);
    let node = TreeNode::from(message.root_pointer(0).unwrap());
    assert_eq!(node.value().unwrap(), 5);
    assert!(matches!(
        node.children(),
        Err(ReadError::OutOfBounds { offset: 16, width: 8, len: 16, .. })
    ));
    assert!(matches!(node.label(), Err(ReadError::OutOfBounds { .. })));
}

#[test]
fn stray_struct_pointer_fails_every_field() {
    let mut b = MessageBuilder::new();
    let root = b.alloc(0, 16);
    b.put_struct_pointer(0, root, 1000, 4);
    let bytes = b.into_single();

    let message = MessageReader::single(&bytes);
    let node = TreeNode::from(message.root_pointer(0).unwrap());
    assert!(matches!(
        node.value(),
        Err(ReadError::OutOfBounds { offset: 1000, .. })
    ));
    assert!(matches!(
        node.is_leaf(),
        Err(ReadError::OutOfBounds { offset: 1004, .. })
    ));
    assert!(node.children().is_err());
}

// ── Null pointers ─────────────────────────────────────────────────────────────

#[test]
fn null_struct_is_empty_by_default() {
    let bytes = [0u8; 8];
    let message = MessageReader::single(&bytes);
    let node = TreeNode::from(message.root_pointer(0).unwrap());
    assert_eq!(node.value().unwrap(), 0);
    assert!(!node.is_leaf().unwrap());
    assert_eq!(node.label().unwrap(), "");
    assert_eq!(node.children().unwrap().len(), 0);
}

#[test]
fn null_struct_is_error_when_strict() {
    let bytes = [0u8; 8];
    let message = strict(&bytes);
    assert!(matches!(
        message.root_pointer(0),
        Err(ReadError::MalformedPointer { segment: 0, offset: 0, .. })
    ));
    // lists stay lenient
    assert!(message.root(0).read_list(0).unwrap().is_empty());
}

// ── Bounds ────────────────────────────────────────────────────────────────────

#[test]
fn four_byte_segment_straddling_read() {
    let bytes = [1u8, 2, 3, 4];
    let message = MessageReader::single(&bytes);
    let root = message.root(0);
    assert_eq!(root.read_int(0).unwrap(), 0x0403_0201);
    assert!(matches!(
        root.read_int(1),
        Err(ReadError::OutOfBounds {
            segment: 0,
            offset: 1,
            width: 4,
            len: 4
        })
    ));
    assert!(root.read_short(3).is_err());
    assert!(root.read_boolean(4).is_err());
    assert!(root.read_struct(0).is_err());
}

#[test]
fn empty_segment() {
    let message = MessageReader::single(&[]);
    assert_eq!(message.total_size(), 0);
    assert!(matches!(
        message.root(0).read_boolean(0),
        Err(ReadError::OutOfBounds { len: 0, .. })
    ));
}

#[test]
fn reader_for_missing_segment() {
    let message = MessageReader::single(&[0u8; 8]);
    assert!(matches!(
        Reader::new(&message, 1, 0),
        Err(ReadError::InvalidSegment { index: 1, count: 1 })
    ));
    assert!(message.reader_at(0, 4).is_ok());
}

// ── Malformed words ───────────────────────────────────────────────────────────

#[test]
fn null_word_with_stray_bits() {
    let mut b = MessageBuilder::new();
    let root = b.alloc(0, 8);
    b.put_uint(0, root + 4, 1);
    let bytes = b.into_single();

    let message = MessageReader::single(&bytes);
    assert!(matches!(
        message.root(0).read_struct(0),
        Err(ReadError::MalformedPointer { segment: 0, offset: 0, .. })
    ));
}

#[test]
fn far_cycle_terminates() {
    let mut b = MessageBuilder::new();
    let root = b.alloc(0, 8);
    let s1 = b.add_segment();
    let pad = b.alloc(s1, 8);
    b.put_far_pointer(0, root, s1, pad);
    b.put_far_pointer(s1, pad, 0, root);

    let message =
        MessageReader::new(MessageSource::Segments(b.segments()), ReaderOptions::default())
            .unwrap();
    assert!(matches!(
        message.root(0).read_struct(0),
        Err(ReadError::MalformedPointer { .. })
    ));
}

#[test]
fn list_pointer_where_struct_expected() {
    let mut b = MessageBuilder::new();
    let root = b.alloc(0, 8);
    let header = b.alloc(0, 8);
    b.put_list_pointer(0, root, header);
    let bytes = b.into_single();

    let message = MessageReader::single(&bytes);
    assert!(matches!(
        message.root_pointer(0),
        Err(ReadError::MalformedPointer { .. })
    ));
}
