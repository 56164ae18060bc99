mod body_codec;
mod codec_error;

pub use body_codec::BodyCodec;
pub use codec_error::DecodeError;
