//! Template for schema-generated reader types.
//!
//! A generated type is a newtype around [`Reader`](crate::Reader): it owns
//! one reader by composition and exposes one accessor per schema field,
//! each a single call to the matching `read_*` method at the byte offset
//! the schema compiler assigned.
//!
//! ```text
//!   reader_struct! {
//!       pub struct Point {
//!           x @ 0: int,
//!           y @ 4: int,
//!           tag @ 8: text,
//!       }
//!   }
//!
//!   Point<'a> ── wraps ──► Reader<'a> ── borrows ──► MessageReader<'a>
//!     .x()   → reader.read_int(0)
//!     .tag() → reader.read_text(8)
//! ```
//!
//! Field kinds:
//!
//! ```text
//! ┌──────────────┬────────────────────────┬──────────────────┐
//! │ Kind         │ Accessor returns       │ Reader call      │
//! ├──────────────┼────────────────────────┼──────────────────┤
//! │ boolean      │ bool                   │ read_boolean     │
//! │ byte / ubyte │ i8 / u8                │ read_byte / ...  │
//! │ short        │ i16                    │ read_short       │
//! │ ushort       │ u16                    │ read_ushort      │
//! │ int / uint   │ i32 / u32              │ read_int / ...   │
//! │ long / ulong │ i64 / u64              │ read_long / ...  │
//! │ float        │ f32                    │ read_float       │
//! │ double       │ f64                    │ read_double      │
//! │ text         │ &str                   │ read_text        │
//! │ data         │ &[u8]                  │ read_data        │
//! │ list         │ ListReader             │ read_list        │
//! │ (struct T)   │ T                      │ read_struct      │
//! │ (list T)     │ TypedList<T>           │ read_list        │
//! └──────────────┴────────────────────────┴──────────────────┘
//! ```

/// Define a generated reader type.
///
/// Each field is written `name @ offset: kind`, where `kind` is one of the
/// kinds listed in the [module docs](crate::generated). The generated type
/// is `Copy`, implements `From<Reader>`, and can be used as the element type
/// of a [`TypedList`](crate::TypedList).
///
/// ```rust
/// use segmsg_reader::{MessageReader, reader_struct};
///
/// reader_struct! {
///     /// A 2D point.
///     pub struct Point {
///         x @ 0: int,
///         y @ 4: int,
///     }
/// }
///
/// let bytes = [3, 0, 0, 0, 0xFC, 0xFF, 0xFF, 0xFF];
/// let message = MessageReader::single(&bytes);
/// let point = Point::from(message.root(0));
/// assert_eq!(point.x().unwrap(), 3);
/// assert_eq!(point.y().unwrap(), -4);
/// ```
#[macro_export]
macro_rules! reader_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$field_meta:meta])* $field:ident @ $offset:literal : $kind:tt ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug)]
        $vis struct $name<'a>($crate::Reader<'a>);

        impl<'a> ::core::convert::From<$crate::Reader<'a>> for $name<'a> {
            fn from(reader: $crate::Reader<'a>) -> Self {
                Self(reader)
            }
        }

        #[allow(clippy::missing_errors_doc)]
        impl<'a> $name<'a> {
            #[must_use]
            pub fn new(reader: $crate::Reader<'a>) -> Self {
                Self(reader)
            }

            /// The underlying reader.
            #[must_use]
            pub fn reader(&self) -> $crate::Reader<'a> {
                self.0
            }

            $(
                $crate::reader_struct!(@accessor 'a, $(#[$field_meta])* $field, $offset, $kind);
            )*
        }
    };

    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, boolean) => {
        $crate::reader_struct!(@primitive $(#[$m])* $field, $offset, bool, read_boolean);
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, byte) => {
        $crate::reader_struct!(@primitive $(#[$m])* $field, $offset, i8, read_byte);
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, ubyte) => {
        $crate::reader_struct!(@primitive $(#[$m])* $field, $offset, u8, read_ubyte);
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, short) => {
        $crate::reader_struct!(@primitive $(#[$m])* $field, $offset, i16, read_short);
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, ushort) => {
        $crate::reader_struct!(@primitive $(#[$m])* $field, $offset, u16, read_ushort);
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, int) => {
        $crate::reader_struct!(@primitive $(#[$m])* $field, $offset, i32, read_int);
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, uint) => {
        $crate::reader_struct!(@primitive $(#[$m])* $field, $offset, u32, read_uint);
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, long) => {
        $crate::reader_struct!(@primitive $(#[$m])* $field, $offset, i64, read_long);
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, ulong) => {
        $crate::reader_struct!(@primitive $(#[$m])* $field, $offset, u64, read_ulong);
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, float) => {
        $crate::reader_struct!(@primitive $(#[$m])* $field, $offset, f32, read_float);
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, double) => {
        $crate::reader_struct!(@primitive $(#[$m])* $field, $offset, f64, read_double);
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, text) => {
        $(#[$m])*
        pub fn $field(&self) -> ::core::result::Result<&$lt str, $crate::ReadError> {
            self.0.read_text($offset)
        }
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, data) => {
        $(#[$m])*
        pub fn $field(&self) -> ::core::result::Result<&$lt [u8], $crate::ReadError> {
            self.0.read_data($offset)
        }
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, list) => {
        $(#[$m])*
        pub fn $field(&self) -> ::core::result::Result<$crate::ListReader<$lt>, $crate::ReadError> {
            self.0.read_list($offset)
        }
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, (struct $ty:ident)) => {
        $(#[$m])*
        pub fn $field(&self) -> ::core::result::Result<$ty<$lt>, $crate::ReadError> {
            self.0.read_struct($offset).map($ty::from)
        }
    };
    (@accessor $lt:lifetime, $(#[$m:meta])* $field:ident, $offset:literal, (list $ty:ident)) => {
        $(#[$m])*
        pub fn $field(
            &self,
        ) -> ::core::result::Result<$crate::TypedList<$lt, $ty<$lt>>, $crate::ReadError> {
            self.0.read_list($offset).map($crate::ListReader::typed)
        }
    };

    (@primitive $(#[$m:meta])* $field:ident, $offset:literal, $ty:ty, $read:ident) => {
        $(#[$m])*
        pub fn $field(&self) -> ::core::result::Result<$ty, $crate::ReadError> {
            self.0.$read($offset)
        }
    };
}
