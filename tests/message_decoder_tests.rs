use std::sync::Arc;

use rand::Rng;
use serde_json::{Map, json};
use wirebus::codec::DecodeError;
use wirebus::constants::{TAG_JSON_OBJECT, TAG_PORTABLE};
use wirebus::message::{
    BooleanMessage, BufferMessage, CloneError, JsonObjectMessage, LongMessage, MessageDecoder,
    PingMessage, Portable, PortableDecodeError, PortableMessage, ReplyFailureMessage,
    StringMessage, TypeRegistry, WireMessage,
};

#[derive(bitcode::Encode, bitcode::Decode, Clone, Debug, PartialEq)]
struct Order {
    sku: String,
    quantity: u32,
}

impl Portable for Order {
    const PORTABLE_ID: &'static str = "demo.Order";

    fn encode(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    fn decode(bytes: &[u8]) -> Result<Self, PortableDecodeError> {
        bitcode::decode(bytes).map_err(|err| PortableDecodeError {
            reason: err.to_string(),
        })
    }

    fn is_frozen(&self) -> bool {
        false
    }

    fn deep_clone(&self) -> Result<Self, CloneError> {
        Ok(self.clone())
    }
}

#[test]
fn builtin_variants_round_trip_through_the_decoder() {
    let registry = TypeRegistry::new();
    let decoder = MessageDecoder::new();

    let frame = StringMessage::new(Some("hello bus".to_string())).encode();
    let message = decoder.decode(&registry, &frame).expect("decode failed");
    let string = message
        .as_any()
        .downcast_ref::<StringMessage>()
        .expect("expected a string message");
    assert_eq!(string.body(), Some("hello bus"));

    let frame = LongMessage::new(Some(-7_000_000_000)).encode();
    let message = decoder.decode(&registry, &frame).expect("decode failed");
    let long = message
        .as_any()
        .downcast_ref::<LongMessage>()
        .expect("expected a long message");
    assert_eq!(long.body(), Some(-7_000_000_000));

    let mut object = Map::new();
    object.insert("level".to_string(), json!("info"));
    object.insert("count".to_string(), json!(3));
    let frame = JsonObjectMessage::new(Some(object.clone())).encode();
    let message = decoder.decode(&registry, &frame).expect("decode failed");
    let decoded = message
        .as_any()
        .downcast_ref::<JsonObjectMessage>()
        .expect("expected a JSON object message");
    assert_eq!(decoded.body(), Some(&object));

    let frame = PingMessage.encode();
    assert_eq!(frame.len(), 1);
    let message = decoder.decode(&registry, &frame).expect("decode failed");
    assert!(message.as_any().downcast_ref::<PingMessage>().is_some());

    let frame = ReplyFailureMessage::new(2, "no handlers").encode();
    let message = decoder.decode(&registry, &frame).expect("decode failed");
    let failure = message
        .as_any()
        .downcast_ref::<ReplyFailureMessage>()
        .expect("expected a reply failure message");
    assert_eq!(failure.code(), 2);
    assert_eq!(failure.message(), "no handlers");
}

#[test]
fn buffer_bodies_survive_random_payloads() {
    let registry = TypeRegistry::new();
    let decoder = MessageDecoder::new();
    let mut rng = rand::rng();

    let payload: Vec<u8> = (0..64).map(|_| rng.random()).collect();
    let frame = BufferMessage::new(Some(payload.clone())).encode();

    let message = decoder.decode(&registry, &frame).expect("decode failed");
    let buffer = message
        .as_any()
        .downcast_ref::<BufferMessage>()
        .expect("expected a buffer message");
    assert_eq!(buffer.body(), Some(&payload[..]));
}

#[test]
fn portable_frames_decode_through_the_bound_domain_type() {
    let registry = TypeRegistry::new();
    let decoder = MessageDecoder::new().with_portable::<Order>();

    let order = Order {
        sku: "D-4".to_string(),
        quantity: 12,
    };
    let frame = PortableMessage::new(true, "orders", Some(order.clone())).encode();

    let message = decoder.decode(&registry, &frame).expect("decode failed");
    let decoded = message
        .as_any()
        .downcast_ref::<PortableMessage<Order>>()
        .expect("expected a portable order message");
    assert_eq!(decoded.body(), Some(&order));
}

#[test]
fn portable_frames_without_a_binding_are_unknown() {
    let registry = TypeRegistry::new();
    let decoder = MessageDecoder::new();

    let frame = [TAG_PORTABLE as u8, 0];
    match decoder.decode(&registry, &frame) {
        Err(DecodeError::UnknownType { tag }) => assert_eq!(tag, TAG_PORTABLE),
        other => panic!("expected UnknownType, got {:?}", other.err()),
    }
}

#[test]
fn user_window_tags_dispatch_through_the_registry() {
    let registry = TypeRegistry::new();
    registry
        .register(
            "demo.Order",
            41,
            Arc::new(|frame: &[u8]| {
                BufferMessage::from_frame(frame).map(|msg| Arc::new(msg) as Arc<dyn WireMessage>)
            }),
        )
        .expect("registration failed");

    let decoder = MessageDecoder::new();
    let frame = [41u8, 1, 0, 0, 0, 5, 0x01, 0x02, 0x03, 0x04, 0x05];

    let message = decoder.decode(&registry, &frame).expect("decode failed");
    let buffer = message
        .as_any()
        .downcast_ref::<BufferMessage>()
        .expect("expected a buffer message");
    assert_eq!(buffer.body(), Some(&[0x01u8, 0x02, 0x03, 0x04, 0x05][..]));
}

#[test]
fn unrecognized_tags_fail_with_unknown_type() {
    let registry = TypeRegistry::new();
    let decoder = MessageDecoder::new();

    // 99: neither built-in nor inside the user window.
    // 45: inside the window, never registered.
    // 5: retired reserved tag.
    // -128: garbage byte with the sign bit set.
    for tag in [99i8, 45, 5, -128] {
        let frame = [tag as u8, 0];
        match decoder.decode(&registry, &frame) {
            Err(DecodeError::UnknownType { tag: reported }) => assert_eq!(reported, tag),
            other => panic!("tag {tag}: expected UnknownType, got {:?}", other.err()),
        }
    }
}

#[test]
fn an_empty_buffer_is_truncated() {
    let registry = TypeRegistry::new();
    let decoder = MessageDecoder::new();

    match decoder.decode(&registry, &[]) {
        Err(err) => assert_eq!(
            err,
            DecodeError::Truncated {
                expected: 1,
                actual: 0,
            }
        ),
        Ok(_) => panic!("empty buffer must be rejected"),
    }
}

#[test]
fn json_object_frames_with_the_wrong_shape_are_rejected() {
    let registry = TypeRegistry::new();
    let decoder = MessageDecoder::new();

    let payload = b"[1,2]";
    let mut frame = vec![TAG_JSON_OBJECT as u8, 1];
    frame.extend(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);

    match decoder.decode(&registry, &frame) {
        Err(DecodeError::BadBody { offset, len, reason }) => {
            assert_eq!(offset, 6);
            assert_eq!(len, payload.len());
            assert!(reason.contains("expected a JSON object"), "reason: {reason}");
        }
        other => panic!("expected BadBody, got {:?}", other.err()),
    }
}

#[test]
fn delivery_copies_follow_each_variants_mutability() {
    // Buffers are mutable data: every subscriber gets an independent copy.
    let buffer = Arc::new(BufferMessage::new(Some(vec![1, 2, 3])));
    let copy = Arc::clone(&buffer)
        .copy_for_delivery()
        .expect("copy failed");
    let copy = copy
        .as_any()
        .downcast_ref::<BufferMessage>()
        .expect("expected a buffer message");
    assert!(!std::ptr::eq(copy, buffer.as_ref()));
    assert_eq!(copy.body(), buffer.body());

    // Scalars are immutable: the instance itself is redelivered.
    let boolean = Arc::new(BooleanMessage::new(Some(true)));
    let copy = Arc::clone(&boolean)
        .copy_for_delivery()
        .expect("copy failed");
    let copy = copy
        .as_any()
        .downcast_ref::<BooleanMessage>()
        .expect("expected a boolean message");
    assert!(std::ptr::eq(copy, boolean.as_ref()));
}

#[test]
fn a_bad_frame_does_not_poison_the_decoder() {
    let registry = TypeRegistry::new();
    let decoder = MessageDecoder::new();

    let bad = [99u8, 1, 2, 3];
    assert!(decoder.decode(&registry, &bad).is_err());

    // The same decoder and registry keep working afterwards.
    let frame = StringMessage::new(Some("still alive".to_string())).encode();
    let message = decoder.decode(&registry, &frame).expect("decode failed");
    let string = message
        .as_any()
        .downcast_ref::<StringMessage>()
        .expect("expected a string message");
    assert_eq!(string.body(), Some("still alive"));
}

#[test]
fn value_kind_is_reported_for_mismatched_json() {
    let registry = TypeRegistry::new();
    let decoder = MessageDecoder::new();

    let payload = b"42";
    let mut frame = vec![TAG_JSON_OBJECT as u8, 1];
    frame.extend(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);

    match decoder.decode(&registry, &frame) {
        Err(DecodeError::BadBody { reason, .. }) => {
            assert!(reason.contains("number"), "reason: {reason}");
        }
        other => panic!("expected BadBody, got {:?}", other.err()),
    }
}
