use crate::codec::DecodeError;
use crate::constants::{BODY_ABSENT, BODY_LENGTH_FIELD_SIZE, BODY_PRESENT};

/// Reads and writes the presence-framed body section shared by the
/// variable-length message variants.
///
/// The section is `[presence:1][length:4]?[payload:length]?`: a `0`
/// presence byte encodes an absent body in a single byte, a `1` is followed
/// by a big-endian payload length and the payload itself.
pub struct BodyCodec;

impl BodyCodec {
    /// Number of bytes [`BodyCodec::write`] will produce for `payload`.
    pub fn measure(payload: Option<&[u8]>) -> usize {
        match payload {
            None => 1,
            Some(p) => 1 + BODY_LENGTH_FIELD_SIZE + p.len(),
        }
    }

    /// Appends the body section to `out`.
    pub fn write(out: &mut Vec<u8>, payload: Option<&[u8]>) {
        match payload {
            None => out.push(BODY_ABSENT),
            Some(p) => {
                out.push(BODY_PRESENT);
                out.extend(&(p.len() as u32).to_be_bytes());
                out.extend_from_slice(p);
            }
        }
    }

    /// Reads a body section starting at offset `at` in `frame`.
    ///
    /// Returns the payload slice, or `None` for an absent body. The slice
    /// borrows from `frame`; decoding it is the caller's concern.
    pub fn read(frame: &[u8], at: usize) -> Result<Option<&[u8]>, DecodeError> {
        let presence = *frame.get(at).ok_or(DecodeError::Truncated {
            expected: at + 1,
            actual: frame.len(),
        })?;

        match presence {
            BODY_ABSENT => Ok(None),
            BODY_PRESENT => {
                let len_end = at + 1 + BODY_LENGTH_FIELD_SIZE;
                let len_bytes = frame.get(at + 1..len_end).ok_or(DecodeError::Truncated {
                    expected: len_end,
                    actual: frame.len(),
                })?;
                let len =
                    u32::from_be_bytes(len_bytes.try_into().expect("length field is 4 bytes"))
                        as usize;

                let payload = frame
                    .get(len_end..len_end + len)
                    .ok_or(DecodeError::Truncated {
                        expected: len_end + len,
                        actual: frame.len(),
                    })?;

                Ok(Some(payload))
            }
            other => Err(DecodeError::BadBody {
                offset: at,
                len: 1,
                reason: format!("invalid presence byte {other}"),
            }),
        }
    }
}
