#![warn(clippy::pedantic)]

pub mod error;
pub mod generated;
pub mod list;
pub mod message;
pub mod options;
pub mod reader;
pub mod segment;

pub use error::ReadError;
pub use list::{ListIter, ListReader, TypedList};
pub use message::{MessageReader, MessageSource, Target};
pub use options::ReaderOptions;
pub use reader::Reader;
pub use segment::{Primitive, Segment, SegmentId};
