// Reserved wire tags. These form a fixed, build-time namespace: every peer
// on a connection must agree on them out-of-band. Tags 3 and 5 are retired
// and decode as unknown.
pub const TAG_PING: i8 = 0;
pub const TAG_BUFFER: i8 = 1;
pub const TAG_BOOLEAN: i8 = 2;
pub const TAG_BYTE: i8 = 4;
pub const TAG_DOUBLE: i8 = 6;
pub const TAG_FLOAT: i8 = 7;
pub const TAG_INT: i8 = 8;
pub const TAG_LONG: i8 = 9;
pub const TAG_SHORT: i8 = 10;
pub const TAG_STRING: i8 = 11;
pub const TAG_JSON_OBJECT: i8 = 12;
pub const TAG_JSON_ARRAY: i8 = 13;

/// Tag of the framed domain-object variant (`PortableMessage`).
pub const TAG_PORTABLE: i8 = 80;

pub const TAG_REPLY_FAILURE: i8 = 100;

/// First tag of the contiguous window reserved for externally registered
/// message variants.
pub const USER_TAG_FIRST: i8 = 40;

/// Number of registrable slots in the user window. The window covers tags
/// `USER_TAG_FIRST..USER_TAG_FIRST + USER_TAG_COUNT`.
pub const USER_TAG_COUNT: usize = 20;

// Body section layout for presence-framed variants. Offsets are relative to
// the start of the frame (the tag byte).
pub const BODY_PRESENCE_OFFSET: usize = 1;
pub const BODY_LENGTH_OFFSET: usize = 2;

/// Size in bytes of the big-endian payload length field.
pub const BODY_LENGTH_FIELD_SIZE: usize = 4;

/// Byte offset where the payload begins when a body is present.
pub const BODY_PAYLOAD_OFFSET: usize = BODY_LENGTH_OFFSET + BODY_LENGTH_FIELD_SIZE;

/// Presence byte marking an absent body; nothing follows it.
pub const BODY_ABSENT: u8 = 0;

/// Presence byte marking a present body; a 4-byte length and that many
/// payload bytes follow.
pub const BODY_PRESENT: u8 = 1;
