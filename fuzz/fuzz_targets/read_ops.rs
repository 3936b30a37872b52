#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use segmsg_reader::{MessageReader, MessageSource, ReadError, Reader, ReaderOptions};

#[derive(Debug, Arbitrary)]
enum Op {
    Int(u16),
    Long(u16),
    Double(u16),
    Boolean(u16),
    Text(u16),
    Data(u16),
    Struct(u16),
    List { field: u16, index: u16 },
    Resolve { segment: u8, offset: u16 },
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    segments: Vec<Vec<u8>>,
    root: u16,
    strict: bool,
    max_far_hops: u8,
    ops: Vec<Op>,
}

// Fuzz target: arbitrary sequences of reads over arbitrary segments.
//
// Every read must return either a value or a typed error; reads that
// straddle a segment end must never succeed.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(input) = FuzzInput::arbitrary(&mut u) else {
        return;
    };
    if input.segments.is_empty() || input.segments.len() > 16 {
        return;
    }

    let base = if input.strict {
        ReaderOptions::strict()
    } else {
        ReaderOptions::default()
    };
    let options = ReaderOptions {
        max_far_hops: input.max_far_hops % 8,
        ..base
    };
    let blocks = input.segments.iter().map(Vec::as_slice).collect();
    let Ok(message) = MessageReader::new(MessageSource::Segments(blocks), options) else {
        return;
    };

    let mut cursor: Reader<'_> = message.root(usize::from(input.root));
    for op in input.ops.iter().take(64) {
        match *op {
            Op::Int(field) => {
                let field = usize::from(field);
                check_width(&cursor, field, 4, &cursor.read_int(field));
            }
            Op::Long(field) => {
                let field = usize::from(field);
                check_width(&cursor, field, 8, &cursor.read_long(field));
            }
            Op::Double(field) => {
                let _ = cursor.read_double(usize::from(field));
            }
            Op::Boolean(field) => {
                let _ = cursor.read_boolean(usize::from(field));
            }
            Op::Text(field) => {
                if let Ok(text) = cursor.read_text(usize::from(field)) {
                    assert!(std::str::from_utf8(text.as_bytes()).is_ok());
                }
            }
            Op::Data(field) => {
                let _ = cursor.read_data(usize::from(field));
            }
            Op::Struct(field) => {
                if let Ok(nested) = cursor.read_struct(usize::from(field)) {
                    cursor = nested;
                }
            }
            Op::List { field, index } => {
                if let Ok(list) = cursor.read_list(usize::from(field)) {
                    let index = usize::from(index);
                    match list.get(index) {
                        Ok(element) => cursor = element,
                        Err(ReadError::IndexOutOfRange { len, .. }) => assert!(index >= len),
                        Err(_) => {}
                    }
                }
            }
            Op::Resolve { segment, offset } => {
                let _ = message.resolve(u32::from(segment), usize::from(offset));
            }
        }
    }
});

/// A read that succeeded must have fit inside the reader's segment, unless
/// it was answered with a default past the declared data size.
fn check_width<T>(reader: &Reader<'_>, field: usize, width: usize, result: &Result<T, ReadError>) {
    if result.is_err() || reader.data_size().is_some() {
        return;
    }
    let Ok(segment) = reader.message().segment(reader.segment_id()) else {
        return;
    };
    assert!(reader.offset() + field + width <= segment.len());
}
