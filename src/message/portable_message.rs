use once_cell::sync::OnceCell;
use std::any::Any;
use std::sync::Arc;

use crate::codec::{BodyCodec, DecodeError};
use crate::constants::{BODY_PAYLOAD_OFFSET, BODY_PRESENCE_OFFSET, TAG_PORTABLE};
use crate::message::{CloneError, Portable, WireMessage};

/// Message variant carrying one independently serializable domain object.
///
/// The body's byte form is computed on demand and cached: whichever of
/// [`WireMessage::body_len`] or [`WireMessage::write_body`] runs first
/// performs the encode, and every later call on the same instance reuses
/// the cached bytes. A transport that measures a frame before writing it
/// therefore triggers exactly one domain encode, even when the instance is
/// shared between sender threads.
///
/// The body is fixed once the message is built. Mutation happens only via
/// [`WireMessage::copy_for_delivery`], which hands out a fresh instance
/// with an empty cache.
pub struct PortableMessage<B: Portable> {
    /// Point-to-point send vs. publish. Owned by the transport.
    pub send: bool,
    /// Destination address. Owned by the transport.
    pub address: String,
    body: Option<B>,
    encoded: OnceCell<Vec<u8>>,
}

impl<B: Portable> PortableMessage<B> {
    pub fn new(send: bool, address: impl Into<String>, body: Option<B>) -> Self {
        Self {
            send,
            address: address.into(),
            body,
            encoded: OnceCell::new(),
        }
    }

    /// Decodes a message from a full frame starting at the tag byte.
    ///
    /// A presence byte of `0` yields an absent body. A domain codec failure
    /// rejects the whole frame; no partially initialized message is ever
    /// returned. Addressing metadata is not part of the frame — the
    /// transport fills it in after dispatch.
    pub fn from_frame(frame: &[u8]) -> Result<Self, DecodeError> {
        let body = match BodyCodec::read(frame, BODY_PRESENCE_OFFSET)? {
            None => None,
            Some(payload) => match B::decode(payload) {
                Ok(body) => Some(body),
                Err(err) => {
                    return Err(DecodeError::BadBody {
                        offset: BODY_PAYLOAD_OFFSET,
                        len: payload.len(),
                        reason: err.reason,
                    });
                }
            },
        };

        Ok(Self::new(false, String::new(), body))
    }

    pub fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    fn ensure_encoded(&self, body: &B) -> &[u8] {
        self.encoded.get_or_init(|| body.encode())
    }
}

impl<B: Portable> WireMessage for PortableMessage<B> {
    fn wire_tag(&self) -> i8 {
        TAG_PORTABLE
    }

    fn body_len(&self) -> usize {
        match &self.body {
            None => BodyCodec::measure(None),
            Some(body) => BodyCodec::measure(Some(self.ensure_encoded(body))),
        }
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        match &self.body {
            None => BodyCodec::write(out, None),
            Some(body) => BodyCodec::write(out, Some(self.ensure_encoded(body))),
        }
    }

    fn copy_for_delivery(self: Arc<Self>) -> Result<Arc<dyn WireMessage>, CloneError> {
        match &self.body {
            Some(body) if !body.is_frozen() => {
                let clone = body.deep_clone()?;
                Ok(Arc::new(Self::new(self.send, self.address.clone(), Some(clone))))
            }
            // Absent or frozen bodies cannot be mutated out from under a
            // subscriber; the instance itself is safe to share.
            _ => Ok(self),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
