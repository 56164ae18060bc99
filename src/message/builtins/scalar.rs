use std::any::Any;
use std::sync::Arc;

use crate::codec::{BodyCodec, DecodeError};
use crate::constants::{
    BODY_ABSENT, BODY_PAYLOAD_OFFSET, BODY_PRESENCE_OFFSET, BODY_PRESENT, TAG_BOOLEAN, TAG_BUFFER,
    TAG_BYTE, TAG_DOUBLE, TAG_FLOAT, TAG_INT, TAG_LONG, TAG_SHORT, TAG_STRING,
};
use crate::message::{CloneError, WireMessage};

// Fixed-width variants carry `[presence:1][value:N]?` bodies; there is no
// length field because N is implied by the tag.
fn read_fixed<const N: usize>(frame: &[u8]) -> Result<Option<[u8; N]>, DecodeError> {
    let presence = *frame
        .get(BODY_PRESENCE_OFFSET)
        .ok_or(DecodeError::Truncated {
            expected: BODY_PRESENCE_OFFSET + 1,
            actual: frame.len(),
        })?;

    match presence {
        BODY_ABSENT => Ok(None),
        BODY_PRESENT => {
            let start = BODY_PRESENCE_OFFSET + 1;
            let bytes = frame.get(start..start + N).ok_or(DecodeError::Truncated {
                expected: start + N,
                actual: frame.len(),
            })?;
            Ok(Some(bytes.try_into().expect("value slice length checked")))
        }
        other => Err(DecodeError::BadBody {
            offset: BODY_PRESENCE_OFFSET,
            len: 1,
            reason: format!("invalid presence byte {other}"),
        }),
    }
}

macro_rules! scalar_message {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $tag:expr) => {
        $(#[$doc])*
        pub struct $name {
            body: Option<$ty>,
        }

        impl $name {
            pub fn new(body: Option<$ty>) -> Self {
                Self { body }
            }

            pub fn from_frame(frame: &[u8]) -> Result<Self, DecodeError> {
                let body = read_fixed::<{ size_of::<$ty>() }>(frame)?.map(<$ty>::from_be_bytes);
                Ok(Self { body })
            }

            pub fn body(&self) -> Option<$ty> {
                self.body
            }
        }

        impl WireMessage for $name {
            fn wire_tag(&self) -> i8 {
                $tag
            }

            fn body_len(&self) -> usize {
                match self.body {
                    None => 1,
                    Some(_) => 1 + size_of::<$ty>(),
                }
            }

            fn write_body(&self, out: &mut Vec<u8>) {
                match self.body {
                    None => out.push(BODY_ABSENT),
                    Some(value) => {
                        out.push(BODY_PRESENT);
                        out.extend(&value.to_be_bytes());
                    }
                }
            }

            fn copy_for_delivery(self: Arc<Self>) -> Result<Arc<dyn WireMessage>, CloneError> {
                // Scalar bodies are immutable; the instance is shareable.
                Ok(self)
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

scalar_message!(
    /// Single signed-byte body.
    ByteMessage,
    i8,
    TAG_BYTE
);
scalar_message!(ShortMessage, i16, TAG_SHORT);
scalar_message!(IntMessage, i32, TAG_INT);
scalar_message!(LongMessage, i64, TAG_LONG);
scalar_message!(FloatMessage, f32, TAG_FLOAT);
scalar_message!(
    /// IEEE-754 double body, transmitted big-endian like the integer
    /// variants.
    DoubleMessage,
    f64,
    TAG_DOUBLE
);

/// Boolean body, one byte on the wire. Bytes other than 0 and 1 are
/// rejected rather than coerced.
pub struct BooleanMessage {
    body: Option<bool>,
}

impl BooleanMessage {
    pub fn new(body: Option<bool>) -> Self {
        Self { body }
    }

    pub fn from_frame(frame: &[u8]) -> Result<Self, DecodeError> {
        let body = match read_fixed::<1>(frame)? {
            None => None,
            Some([0]) => Some(false),
            Some([1]) => Some(true),
            Some([other]) => {
                return Err(DecodeError::BadBody {
                    offset: BODY_PRESENCE_OFFSET + 1,
                    len: 1,
                    reason: format!("invalid boolean byte {other}"),
                });
            }
        };
        Ok(Self { body })
    }

    pub fn body(&self) -> Option<bool> {
        self.body
    }
}

impl WireMessage for BooleanMessage {
    fn wire_tag(&self) -> i8 {
        TAG_BOOLEAN
    }

    fn body_len(&self) -> usize {
        match self.body {
            None => 1,
            Some(_) => 2,
        }
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        match self.body {
            None => out.push(BODY_ABSENT),
            Some(value) => {
                out.push(BODY_PRESENT);
                out.push(value as u8);
            }
        }
    }

    fn copy_for_delivery(self: Arc<Self>) -> Result<Arc<dyn WireMessage>, CloneError> {
        Ok(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// UTF-8 string body with presence/length framing.
pub struct StringMessage {
    body: Option<String>,
}

impl StringMessage {
    pub fn new(body: Option<String>) -> Self {
        Self { body }
    }

    pub fn from_frame(frame: &[u8]) -> Result<Self, DecodeError> {
        let body = match BodyCodec::read(frame, BODY_PRESENCE_OFFSET)? {
            None => None,
            Some(payload) => match String::from_utf8(payload.to_vec()) {
                Ok(text) => Some(text),
                Err(err) => {
                    return Err(DecodeError::BadBody {
                        offset: BODY_PAYLOAD_OFFSET,
                        len: payload.len(),
                        reason: err.to_string(),
                    });
                }
            },
        };
        Ok(Self { body })
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

impl WireMessage for StringMessage {
    fn wire_tag(&self) -> i8 {
        TAG_STRING
    }

    fn body_len(&self) -> usize {
        BodyCodec::measure(self.body.as_ref().map(|s| s.as_bytes()))
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        BodyCodec::write(out, self.body.as_ref().map(|s| s.as_bytes()));
    }

    fn copy_for_delivery(self: Arc<Self>) -> Result<Arc<dyn WireMessage>, CloneError> {
        Ok(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Raw byte-buffer body with presence/length framing. Buffers are handed
/// to subscribers as mutable data, so each delivery copy is independent.
pub struct BufferMessage {
    body: Option<Vec<u8>>,
}

impl BufferMessage {
    pub fn new(body: Option<Vec<u8>>) -> Self {
        Self { body }
    }

    pub fn from_frame(frame: &[u8]) -> Result<Self, DecodeError> {
        let body = BodyCodec::read(frame, BODY_PRESENCE_OFFSET)?.map(|payload| payload.to_vec());
        Ok(Self { body })
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

impl WireMessage for BufferMessage {
    fn wire_tag(&self) -> i8 {
        TAG_BUFFER
    }

    fn body_len(&self) -> usize {
        BodyCodec::measure(self.body.as_deref())
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        BodyCodec::write(out, self.body.as_deref());
    }

    fn copy_for_delivery(self: Arc<Self>) -> Result<Arc<dyn WireMessage>, CloneError> {
        match &self.body {
            None => Ok(self),
            Some(_) => Ok(Arc::new(Self {
                body: self.body.clone(),
            })),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
