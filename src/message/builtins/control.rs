use std::any::Any;
use std::sync::Arc;

use crate::codec::DecodeError;
use crate::constants::{TAG_PING, TAG_REPLY_FAILURE};
use crate::message::{CloneError, WireMessage};

/// Keep-alive probe. Its frame is the tag byte alone.
pub struct PingMessage;

impl PingMessage {
    pub fn from_frame(_frame: &[u8]) -> Result<Self, DecodeError> {
        Ok(Self)
    }
}

impl WireMessage for PingMessage {
    fn wire_tag(&self) -> i8 {
        TAG_PING
    }

    fn body_len(&self) -> usize {
        0
    }

    fn write_body(&self, _out: &mut Vec<u8>) {}

    fn copy_for_delivery(self: Arc<Self>) -> Result<Arc<dyn WireMessage>, CloneError> {
        Ok(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Failure notification for a send that could not be delivered or handled.
///
/// Body: `[code:4][length:4][utf8 message]`, always present — a failure
/// without a reason is not a meaningful frame.
pub struct ReplyFailureMessage {
    code: i32,
    message: String,
}

impl ReplyFailureMessage {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn from_frame(frame: &[u8]) -> Result<Self, DecodeError> {
        let code_bytes = frame.get(1..5).ok_or(DecodeError::Truncated {
            expected: 5,
            actual: frame.len(),
        })?;
        let code = i32::from_be_bytes(code_bytes.try_into().expect("code field is 4 bytes"));

        let len_bytes = frame.get(5..9).ok_or(DecodeError::Truncated {
            expected: 9,
            actual: frame.len(),
        })?;
        let len = u32::from_be_bytes(len_bytes.try_into().expect("length field is 4 bytes")) as usize;

        let payload = frame.get(9..9 + len).ok_or(DecodeError::Truncated {
            expected: 9 + len,
            actual: frame.len(),
        })?;
        let message = String::from_utf8(payload.to_vec()).map_err(|err| DecodeError::BadBody {
            offset: 9,
            len,
            reason: err.to_string(),
        })?;

        Ok(Self { code, message })
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl WireMessage for ReplyFailureMessage {
    fn wire_tag(&self) -> i8 {
        TAG_REPLY_FAILURE
    }

    fn body_len(&self) -> usize {
        4 + 4 + self.message.len()
    }

    fn write_body(&self, out: &mut Vec<u8>) {
        out.extend(&self.code.to_be_bytes());
        out.extend(&(self.message.len() as u32).to_be_bytes());
        out.extend_from_slice(self.message.as_bytes());
    }

    fn copy_for_delivery(self: Arc<Self>) -> Result<Arc<dyn WireMessage>, CloneError> {
        Ok(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
