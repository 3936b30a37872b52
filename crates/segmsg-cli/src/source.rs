/// Loading a message file according to the global flags.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use segmsg_reader::{MessageReader, MessageSource, ReaderOptions};
use tracing::debug;

use crate::GlobalArgs;

/// Read the whole file into memory.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("cannot read {}", path.display()))
}

/// Reader options selected by `--strict` and `--max-far-hops`.
pub fn options(global: &GlobalArgs) -> ReaderOptions {
    let mut options = if global.strict {
        ReaderOptions::strict()
    } else {
        ReaderOptions::default()
    };
    if let Some(hops) = global.max_far_hops {
        options.max_far_hops = hops;
    }
    options
}

/// Build a message over `bytes`: framed by default, one segment with
/// `--single`.
///
/// # Errors
///
/// Returns an error if the segment table is malformed.
pub fn open<'a>(bytes: &'a [u8], path: &Path, global: &GlobalArgs) -> Result<MessageReader<'a>> {
    debug!(path = %path.display(), len = bytes.len(), single = global.single, "opening message");
    let source = if global.single {
        MessageSource::Single(bytes)
    } else {
        MessageSource::Framed(bytes)
    };
    MessageReader::new(source, options(global))
        .with_context(|| format!("failed to open {}", path.display()))
}
