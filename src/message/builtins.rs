mod control;
mod json;
mod scalar;

pub use control::{PingMessage, ReplyFailureMessage};
pub use json::{JsonArrayMessage, JsonObjectMessage};
pub use scalar::{
    BooleanMessage, BufferMessage, ByteMessage, DoubleMessage, FloatMessage, IntMessage,
    LongMessage, ShortMessage, StringMessage,
};
