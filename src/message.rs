mod builtins;
mod message_decoder;
mod portable;
mod portable_message;
mod type_registry;
mod wire_message;

pub use builtins::{
    BooleanMessage, BufferMessage, ByteMessage, DoubleMessage, FloatMessage, IntMessage,
    JsonArrayMessage, JsonObjectMessage, LongMessage, PingMessage, ReplyFailureMessage,
    ShortMessage, StringMessage,
};
pub use message_decoder::MessageDecoder;
pub use portable::{Portable, PortableDecodeError};
pub use portable_message::PortableMessage;
pub use type_registry::{MessageFactory, RegistryError, TypeRegistry};
pub use wire_message::{CloneError, WireMessage};
