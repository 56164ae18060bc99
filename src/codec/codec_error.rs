/// Reasons an inbound frame can be rejected.
///
/// A failed frame is rejected on its own; the connection and the dispatch
/// table stay usable for subsequent frames.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The buffer ended before the declared frame structure was complete.
    Truncated { expected: usize, actual: usize },

    /// The leading tag byte has no resolver, neither built-in nor
    /// registered. Typically the sender loaded an extension set this
    /// process did not.
    UnknownType { tag: i8 },

    /// Payload bytes did not parse as a valid body. `offset` and `len`
    /// identify the offending byte range within the frame.
    BadBody {
        offset: usize,
        len: usize,
        reason: String,
    },
}
