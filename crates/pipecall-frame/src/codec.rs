use crate::error::{FrameError, Result};

/// Frame header: payload length as a 4-byte native-order unsigned integer.
pub const HEADER_SIZE: usize = 4;

/// Largest payload a header can describe.
pub const MAX_PAYLOAD: usize = u32::MAX as usize;

/// Default number of consecutive transient read failures tolerated.
pub const DEFAULT_RETRY_BUDGET: u32 = 10;

/// Encode the length header for a payload of `len` bytes.
///
/// Wire format, identical in both directions and sent as two pipe messages:
/// ```text
/// ┌─────────────────────┐  ┌─────────────────────┐
/// │ Length (4B, native) │  │ Payload (UTF-8)      │
/// └─────────────────────┘  └─────────────────────┘
///      message 1                message 2
/// ```
pub fn encode_header(len: usize) -> Result<[u8; HEADER_SIZE]> {
    let len = u32::try_from(len).map_err(|_| FrameError::PayloadTooLarge {
        size: len,
        max: MAX_PAYLOAD,
    })?;
    Ok(len.to_ne_bytes())
}

/// Decode a length header. Anything other than exactly 4 bytes is a protocol
/// violation.
pub fn decode_header(header: &[u8]) -> Result<u32> {
    let bytes: [u8; HEADER_SIZE] =
        header
            .try_into()
            .map_err(|_| FrameError::MalformedHeader {
                actual_len: header.len(),
            })?;
    Ok(u32::from_ne_bytes(bytes))
}

/// Configuration for the read engine.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Consecutive transient read failures tolerated before the pipe is
    /// declared broken. Reset by every delivered chunk. Default: 10.
    pub retry_budget: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            retry_budget: DEFAULT_RETRY_BUDGET,
        }
    }
}
