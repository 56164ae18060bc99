use std::any::Any;
use std::sync::Arc;

/// Failure to produce an independent copy of a message body for
/// redelivery. Fatal for that delivery attempt only; other deliveries of
/// the same message are unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct CloneError {
    pub reason: String,
}

/// Capability set shared by every wire message variant.
///
/// A variant owns everything after the leading tag byte of its frame; the
/// tag itself is written by the provided [`WireMessage::encode`] and
/// consumed by the dispatch layer. `body_len` and `write_body` must agree
/// for the same instance: transports query the length first and then write,
/// and both calls must observe the same bytes.
pub trait WireMessage: Send + Sync + 'static {
    /// Single-byte wire discriminator for this variant.
    fn wire_tag(&self) -> i8;

    /// Number of bytes [`WireMessage::write_body`] will produce.
    fn body_len(&self) -> usize;

    /// Appends the body section (everything after the tag byte) to `out`.
    fn write_body(&self, out: &mut Vec<u8>);

    /// Returns a message safe to hand to one more local subscriber.
    ///
    /// Variants with immutable bodies return the same instance. Mutable
    /// bodies are deep-cloned so subscribers cannot observe each other's
    /// mutations.
    fn copy_for_delivery(self: Arc<Self>) -> Result<Arc<dyn WireMessage>, CloneError>;

    /// Downcast support for consumers that dispatched through the flat tag
    /// namespace and need the concrete variant back.
    fn as_any(&self) -> &dyn Any;

    /// Encodes the complete frame: `[tag][body...]`.
    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.body_len());
        out.push(self.wire_tag() as u8);
        self.write_body(&mut out);
        out
    }
}
