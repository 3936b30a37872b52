#![no_main]

use libfuzzer_sys::fuzz_target;
use segmsg_wire::{ByteView, ListHeader, Pointer};

// Fuzz target: pointer word and list header decoding at every offset.
//
// The first byte picks the offset, the rest is the segment body.
fuzz_target!(|data: &[u8]| {
    let Some((&offset, body)) = data.split_first() else {
        return;
    };
    let view = ByteView::new(body);
    let offset = usize::from(offset);

    if let Ok(pointer) = Pointer::read_from(&view, offset) {
        let _ = pointer.to_string();
        let _ = pointer.kind();
    }
    if let Ok(header) = ListHeader::read_from(&view, offset) {
        let _ = header.body_len();
    }
});
