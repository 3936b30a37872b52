/// Implementation of `segmsg pointer`.
///
/// Decodes the pointer word at `--segment`/`--offset`, then resolves it
/// through the message reader (following far pointers) and prints where it
/// leads.
///
/// # Output format
///
/// ```text
/// pointer: far -> segment 1 pad 0x0000
/// target:  struct in segment 1 at 0x0008, 4 data bytes
/// ```
use anyhow::{Context, Result};
use segmsg_reader::{MessageReader, ReadError, SegmentId, Target};
use segmsg_wire::Pointer;

use crate::{GlobalArgs, PointerArgs, source};

/// Run the `segmsg pointer` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the pointer cannot be
/// resolved (missing segment, out-of-bounds word, malformed chain).
pub fn run(args: &PointerArgs, global: &GlobalArgs) -> Result<()> {
    let bytes = source::read_file(&args.file)?;
    let message = source::open(&bytes, &args.file, global)?;

    let output = render(&message, args.segment, args.offset).with_context(|| {
        format!(
            "cannot resolve pointer at segment {} offset {:#x}",
            args.segment, args.offset
        )
    })?;
    print!("{output}");
    Ok(())
}

/// Describe the pointer word at `(segment, offset)` and its resolved target.
///
/// # Errors
///
/// Any [`ReadError`] raised while decoding or resolving the word.
pub fn render(
    message: &MessageReader<'_>,
    segment: SegmentId,
    offset: usize,
) -> Result<String, ReadError> {
    let target = message.resolve(segment, offset)?;
    let word = Pointer::read_from(message.segment(segment)?.view(), offset)
        .map_err(|e| ReadError::in_segment(segment, e))?;

    Ok(format!("pointer: {word}\ntarget:  {}\n", describe(&target)))
}

fn describe(target: &Target) -> String {
    match *target {
        Target::Null => "null".to_string(),
        Target::Struct {
            segment,
            offset,
            data_size: Some(size),
        } => format!("struct in segment {segment} at {offset:#06x}, {size} data bytes"),
        Target::Struct {
            segment,
            offset,
            data_size: None,
        } => format!("struct in segment {segment} at {offset:#06x}, size unspecified"),
        Target::List {
            segment,
            base,
            element_count,
            stride,
        } => format!(
            "list in segment {segment} at {base:#06x}, {element_count} elements of {stride} bytes"
        ),
    }
}
