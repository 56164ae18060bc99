//! Pluggable wire-level message types for message-bus transports.
//!
//! A transport hands inbound frames to [`message::MessageDecoder`], which
//! routes on the leading tag byte: built-in variants are constructed from a
//! fixed table, while tags in the user window are resolved through a
//! [`message::TypeRegistry`] of externally registered factories. The
//! [`message::PortableMessage`] variant carries an arbitrary serializable
//! domain object with a lazy, compute-once binary encoding.

pub mod codec;
pub mod constants;
pub mod message;
