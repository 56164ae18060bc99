use once_cell::sync::OnceCell;
use serde_json::{Map, Value};
use std::any::Any;
use std::sync::Arc;

use crate::codec::{BodyCodec, DecodeError};
use crate::constants::{BODY_PAYLOAD_OFFSET, BODY_PRESENCE_OFFSET, TAG_JSON_ARRAY, TAG_JSON_OBJECT};
use crate::message::{CloneError, WireMessage};

// The JSON variants share the portable variant's cache discipline: the
// serialized form is computed by whichever of body_len/write_body runs
// first and reused afterwards.

/// JSON object body. The payload must parse to a JSON object; any other
/// JSON shape is rejected.
pub struct JsonObjectMessage {
    body: Option<Map<String, Value>>,
    encoded: OnceCell<Vec<u8>>,
}

impl JsonObjectMessage {
    pub fn new(body: Option<Map<String, Value>>) -> Self {
        Self {
            body,
            encoded: OnceCell::new(),
        }
    }

    pub fn from_frame(frame: &[u8]) -> Result<Self, DecodeError> {
        let body = match BodyCodec::read(frame, BODY_PRESENCE_OFFSET)? {
            None => None,
            Some(payload) => match serde_json::from_slice::<Value>(payload) {
                Ok(Value::Object(map)) => Some(map),
                Ok(other) => {
                    return Err(DecodeError::BadBody {
                        offset: BODY_PAYLOAD_OFFSET,
                        len: payload.len(),
                        reason: format!("expected a JSON object, got {}", json_kind(&other)),
                    });
                }
                Err(err) => {
                    return Err(DecodeError::BadBody {
                        offset: BODY_PAYLOAD_OFFSET,
                        len: payload.len(),
                        reason: err.to_string(),
                    });
                }
            },
        };
        Ok(Self::new(body))
    }

    pub fn body(&self) -> Option<&Map<String, Value>> {
        self.body.as_ref()
    }

    fn ensure_encoded(&self, body: &Map<String, Value>) -> &[u8] {
        self.encoded
            .get_or_init(|| serde_json::to_vec(body).expect("serializing a JSON value cannot fail"))
    }
}

impl WireMessage for JsonObjectMessage {
    fn wire_tag(&self) -> i8 {
        TAG_JSON_OBJECT
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
            None => Ok(self),
            // JSON bodies follow the buffer rule: each subscriber gets an
            // independent copy.
            Some(_) => Ok(Arc::new(Self::new(self.body.clone()))),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// JSON array body. The payload must parse to a JSON array.
pub struct JsonArrayMessage {
    body: Option<Vec<Value>>,
    encoded: OnceCell<Vec<u8>>,
}

impl JsonArrayMessage {
    pub fn new(body: Option<Vec<Value>>) -> Self {
        Self {
            body,
            encoded: OnceCell::new(),
        }
    }

    pub fn from_frame(frame: &[u8]) -> Result<Self, DecodeError> {
        let body = match BodyCodec::read(frame, BODY_PRESENCE_OFFSET)? {
            None => None,
            Some(payload) => match serde_json::from_slice::<Value>(payload) {
                Ok(Value::Array(items)) => Some(items),
                Ok(other) => {
                    return Err(DecodeError::BadBody {
                        offset: BODY_PAYLOAD_OFFSET,
                        len: payload.len(),
                        reason: format!("expected a JSON array, got {}", json_kind(&other)),
                    });
                }
                Err(err) => {
                    return Err(DecodeError::BadBody {
                        offset: BODY_PAYLOAD_OFFSET,
                        len: payload.len(),
                        reason: err.to_string(),
                    });
                }
            },
        };
        Ok(Self::new(body))
    }

    pub fn body(&self) -> Option<&[Value]> {
        self.body.as_deref()
    }

    fn ensure_encoded(&self, body: &[Value]) -> &[u8] {
        self.encoded
            .get_or_init(|| serde_json::to_vec(body).expect("serializing a JSON value cannot fail"))
    }
}

impl WireMessage for JsonArrayMessage {
    fn wire_tag(&self) -> i8 {
        TAG_JSON_ARRAY
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
            None => Ok(self),
            Some(_) => Ok(Arc::new(Self::new(self.body.clone()))),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
