use std::sync::Arc;

use crate::codec::DecodeError;
use crate::constants::{
    TAG_BOOLEAN, TAG_BUFFER, TAG_BYTE, TAG_DOUBLE, TAG_FLOAT, TAG_INT, TAG_JSON_ARRAY,
    TAG_JSON_OBJECT, TAG_LONG, TAG_PING, TAG_PORTABLE, TAG_REPLY_FAILURE, TAG_SHORT, TAG_STRING,
};
use crate::message::{
    BooleanMessage, BufferMessage, ByteMessage, DoubleMessage, FloatMessage, IntMessage,
    JsonArrayMessage, JsonObjectMessage, LongMessage, MessageFactory, PingMessage, Portable,
    PortableMessage, ReplyFailureMessage, ShortMessage, StringMessage, TypeRegistry, WireMessage,
};

/// Turns an inbound frame into a concrete message instance.
///
/// The leading byte is the type tag. Tags in the user window are resolved
/// through the [`TypeRegistry`]; every other tag is dispatched over a fixed
/// table of built-in variants. From the sender's perspective the two form
/// one flat numeric namespace — a frame does not record which side of the
/// split its tag lives on.
///
/// The reserved portable tag needs a domain type to decode into; bind one
/// with [`MessageDecoder::with_portable`]. Without a binding, portable
/// frames are rejected as unknown.
pub struct MessageDecoder {
    portable: Option<MessageFactory>,
}

impl MessageDecoder {
    pub fn new() -> Self {
        Self { portable: None }
    }

    /// Binds domain type `B` to the reserved portable tag. The binding is
    /// build-time configuration in the same sense as the tag constants:
    /// both ends of a connection must agree on it.
    pub fn with_portable<B: Portable>(mut self) -> Self {
        self.portable = Some(Arc::new(|frame: &[u8]| {
            PortableMessage::<B>::from_frame(frame).map(|msg| Arc::new(msg) as Arc<dyn WireMessage>)
        }));
        self
    }

    /// Decodes one frame. A failure rejects that frame only; the decoder
    /// and the registry remain usable.
    pub fn decode(
        &self,
        registry: &TypeRegistry,
        frame: &[u8],
    ) -> Result<Arc<dyn WireMessage>, DecodeError> {
        let tag = match frame.first() {
            Some(&byte) => byte as i8,
            None => {
                return Err(DecodeError::Truncated {
                    expected: 1,
                    actual: 0,
                });
            }
        };

        if TypeRegistry::is_user_tag(tag) {
            return registry.resolve(tag, frame);
        }

        match tag {
            TAG_PING => Ok(Arc::new(PingMessage::from_frame(frame)?)),
            TAG_BUFFER => Ok(Arc::new(BufferMessage::from_frame(frame)?)),
            TAG_BOOLEAN => Ok(Arc::new(BooleanMessage::from_frame(frame)?)),
            TAG_BYTE => Ok(Arc::new(ByteMessage::from_frame(frame)?)),
            TAG_DOUBLE => Ok(Arc::new(DoubleMessage::from_frame(frame)?)),
            TAG_FLOAT => Ok(Arc::new(FloatMessage::from_frame(frame)?)),
            TAG_INT => Ok(Arc::new(IntMessage::from_frame(frame)?)),
            TAG_LONG => Ok(Arc::new(LongMessage::from_frame(frame)?)),
            TAG_SHORT => Ok(Arc::new(ShortMessage::from_frame(frame)?)),
            TAG_STRING => Ok(Arc::new(StringMessage::from_frame(frame)?)),
            TAG_JSON_OBJECT => Ok(Arc::new(JsonObjectMessage::from_frame(frame)?)),
            TAG_JSON_ARRAY => Ok(Arc::new(JsonArrayMessage::from_frame(frame)?)),
            TAG_REPLY_FAILURE => Ok(Arc::new(ReplyFailureMessage::from_frame(frame)?)),
            TAG_PORTABLE => match &self.portable {
                Some(factory) => factory(frame),
                None => {
                    tracing::warn!(tag, "portable frame received without a bound domain type");
                    Err(DecodeError::UnknownType { tag })
                }
            },
            other => {
                tracing::warn!(tag = other, "unrecognized wire tag");
                Err(DecodeError::UnknownType { tag: other })
            }
        }
    }
}
