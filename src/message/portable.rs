use crate::message::CloneError;

/// Failure reported by a domain codec when payload bytes do not parse.
#[derive(Debug, Clone, PartialEq)]
pub struct PortableDecodeError {
    pub reason: String,
}

/// External contract of a domain object carried by
/// [`PortableMessage`](crate::message::PortableMessage).
///
/// The byte encoding belongs entirely to the implementor; the bus treats it
/// as opaque payload. Freezing and cloning are explicit capabilities rather
/// than conventions: a frozen object may be shared across deliveries, a
/// mutable one is deep-cloned per delivery so no subscriber observes
/// another's mutations.
pub trait Portable: Send + Sync + 'static {
    /// Stable identifier naming this payload kind. Used for idempotent
    /// registry registration, so it must not change between processes that
    /// are expected to interoperate.
    const PORTABLE_ID: &'static str;

    /// Serializes the object to its byte form.
    fn encode(&self) -> Vec<u8>;

    /// Rebuilds an object from bytes produced by [`Portable::encode`].
    fn decode(bytes: &[u8]) -> Result<Self, PortableDecodeError>
    where
        Self: Sized;

    /// Whether the object is immutable and safe to share between
    /// deliveries.
    fn is_frozen(&self) -> bool;

    /// Produces an independent, mutable copy of the object.
    fn deep_clone(&self) -> Result<Self, CloneError>
    where
        Self: Sized;
}
