#![no_main]

use libfuzzer_sys::fuzz_target;
use segmsg_wire::SegmentTable;

// Fuzz target: segment table framing.
//
// Catches bugs in:
// - Segment count of zero or above MAX_SEGMENTS
// - Length table running past the buffer
// - Padding after an odd number of length words
// - Declared bodies longer than the remaining bytes
// - Trailing data detection
fuzz_target!(|data: &[u8]| {
    if let Ok(segments) = SegmentTable::split(data) {
        let table_len = SegmentTable::encoded_len(segments.len());
        let body_len: usize = segments.iter().map(|s| s.len()).sum();
        assert_eq!(table_len + body_len, data.len());
    }
});
