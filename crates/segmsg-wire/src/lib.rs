#![warn(clippy::pedantic)]

pub mod byte_view;
pub mod error;
pub mod pointer;
pub mod segment_table;

pub use byte_view::ByteView;
pub use error::WireError;
pub use pointer::{LIST_HEADER_SIZE, ListHeader, POINTER_SIZE, Pointer, PointerKind};
pub use segment_table::{MAX_SEGMENTS, SegmentTable};
