/// Configuration for a [`MessageReader`](crate::MessageReader).
///
/// ```text
/// ┌───────────────────┬─────────┬─────────────────────────────────────────────┐
/// │ Field             │ Default │ Purpose                                     │
/// ├───────────────────┼─────────┼─────────────────────────────────────────────┤
/// │ defaults_past_end │ true    │ Fields past a struct's declared data size   │
/// │                   │         │ read as zero / false / null                 │
/// │ max_far_hops      │ 4       │ Far pointers followed before a chain is     │
/// │                   │         │ rejected as malformed                       │
/// └───────────────────┴─────────┴─────────────────────────────────────────────┘
/// ```
///
/// With `defaults_past_end` set, a reader created from a struct pointer
/// that declares a data size treats any field extending beyond that size
/// as absent and returns the field's default instead of decoding the
/// bytes. This is what lets an older writer's smaller struct be read by a
/// newer schema. Physical bounds are checked first: reads past the
/// segment's end fail with
/// [`ReadError::OutOfBounds`](crate::ReadError::OutOfBounds) either way.
///
/// With it cleared, declared sizes are ignored, only physical bounds
/// apply, and a null struct pointer is an error rather than an empty
/// struct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Return schema defaults for fields past a struct's declared size.
    pub defaults_past_end: bool,

    /// Upper bound on far-pointer hops while resolving one pointer.
    ///
    /// A well-formed message needs one hop (far pointer to a near landing
    /// pad). The bound stops a cyclic chain of far pointers from looping.
    pub max_far_hops: u8,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            defaults_past_end: true,
            max_far_hops: 4,
        }
    }
}

impl ReaderOptions {
    /// Options that enforce physical bounds only.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            defaults_past_end: false,
            ..Self::default()
        }
    }
}
