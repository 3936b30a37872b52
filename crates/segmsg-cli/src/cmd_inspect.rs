/// Implementation of `segmsg inspect`.
///
/// Opens a message file, prints its segment table, then dumps every
/// segment one 8-byte word per line. Each word is shown in hex next to its
/// decoding as a pointer word; words that are plain data still decode to
/// something, so the annotation column is a reading aid, not a verdict.
///
/// # Output format
///
/// ```text
/// Message: 2 segments, 28 bytes
/// Segment 0 (16 bytes)
///   0000  02000000 01000000  far -> segment 1 pad 0x0000
///   0008  05000000 00000000  struct -> 0x0001
/// Segment 1 (12 bytes)
///   0000  21000000 04000000  struct -> 0x0008 (4 bytes)
///   0008  63000000           (partial word)
/// ```
use anyhow::{Context, Result};
use segmsg_reader::{MessageReader, Segment, SegmentId};
use segmsg_wire::{POINTER_SIZE, Pointer};

use crate::{GlobalArgs, InspectArgs, source};

/// Run the `segmsg inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, its segment table is
/// malformed, or `--segment` names a segment that does not exist.
pub fn run(args: &InspectArgs, global: &GlobalArgs) -> Result<()> {
    let bytes = source::read_file(&args.file)?;
    let message = source::open(&bytes, &args.file, global)?;

    if let Some(index) = args.segment {
        message
            .segment(index)
            .with_context(|| format!("cannot inspect {}", args.file.display()))?;
    }

    print!("{}", render(&message, args.segment));
    Ok(())
}

/// Render the segment table and word dump, optionally for one segment only.
pub fn render(message: &MessageReader<'_>, only: Option<SegmentId>) -> String {
    let count = message.segment_count();
    let mut out = format!(
        "Message: {count} segment{}, {} bytes\n",
        if count == 1 { "" } else { "s" },
        message.total_size()
    );

    for segment in message.segments() {
        if only.is_some_and(|index| index != segment.id()) {
            continue;
        }
        out.push_str(&format!("Segment {} ({} bytes)\n", segment.id(), segment.len()));
        for (i, word) in segment.as_bytes().chunks(POINTER_SIZE).enumerate() {
            let offset = i * POINTER_SIZE;
            let hex = word_hex(word);
            let note = annotate(segment, offset, word.len());
            out.push_str(&format!("  {offset:04x}  {hex:<17}  {note}\n"));
        }
    }
    out
}

// ── Word formatting helpers ───────────────────────────────────────────────────

/// Hex of one word, split into its two 4-byte halves.
fn word_hex(word: &[u8]) -> String {
    if word.len() > 4 {
        format!("{} {}", hex::encode(&word[..4]), hex::encode(&word[4..]))
    } else {
        hex::encode(word)
    }
}

fn annotate(segment: &Segment<'_>, offset: usize, width: usize) -> String {
    if width < POINTER_SIZE {
        return "(partial word)".to_string();
    }
    match Pointer::read_from(segment.view(), offset) {
        Ok(pointer) => pointer.to_string(),
        Err(_) => "-".to_string(),
    }
}
