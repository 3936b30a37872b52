#![no_main]

use libfuzzer_sys::fuzz_target;
use segmsg_reader::{MessageReader, MessageSource, Reader, ReaderOptions};

const MAX_DEPTH: usize = 6;
const MAX_FAN_OUT: usize = 8;

/// Walks every pointer slot of `reader` as both a struct and a list.
/// Lists in hostile input can alias their parents, so depth and fan-out
/// are capped.
fn walk(reader: Reader<'_>, depth: usize) {
    for field in (0..32).step_by(8) {
        let _ = reader.read_long(field);
        let _ = reader.read_text(field);
        if depth == 0 {
            continue;
        }
        if let Ok(nested) = reader.read_struct(field) {
            walk(nested, depth - 1);
        }
        if let Ok(list) = reader.read_list(field) {
            for element in list.iter().take(MAX_FAN_OUT) {
                walk(element, depth - 1);
            }
        }
    }
}

// Fuzz target: open a framed message and traverse it from the root.
fuzz_target!(|data: &[u8]| {
    for options in [ReaderOptions::default(), ReaderOptions::strict()] {
        let Ok(message) = MessageReader::new(MessageSource::Framed(data), options) else {
            return;
        };
        if let Ok(root) = message.root_pointer(0) {
            walk(root, MAX_DEPTH);
        }
    }
});
