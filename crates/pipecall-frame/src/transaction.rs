use pipecall_transport::{Connection, RawPipe};
use tracing::debug;

use crate::codec::{decode_header, encode_header, FrameConfig, HEADER_SIZE};
use crate::error::{FrameError, Result};
use crate::reader::read_payload;
use crate::writer::write_message;

/// Run one request/response exchange (blocking).
///
/// The request goes out as a header message followed by a body message, and
/// the response is read back the same way. No step is skipped or reordered.
/// On failure the connection is left as the engines left it; a framing
/// mismatch is never resynchronized, so the caller must reconnect.
pub fn transact<P: RawPipe>(
    conn: &mut Connection<P>,
    request: &str,
    config: &FrameConfig,
) -> Result<String> {
    let body = request.as_bytes();
    let header = encode_header(body.len())?;

    send_all(conn, &header)?;
    send_all(conn, body)?;

    let header = read_payload(conn, HEADER_SIZE, config)?;
    let response_len = decode_header(&header)? as usize;

    let response = read_payload(conn, response_len, config)?;
    if response.len() != response_len {
        return Err(FrameError::TruncatedResponse {
            expected: response_len,
            actual: response.len(),
        });
    }

    debug!(
        pipe = %conn.name(),
        request_len = body.len(),
        response_len,
        "transaction complete"
    );
    Ok(String::from_utf8(response.to_vec())?)
}

fn send_all<P: RawPipe>(conn: &mut Connection<P>, message: &[u8]) -> Result<()> {
    let written = write_message(conn, message)?;
    if written != message.len() {
        return Err(FrameError::IncompleteWrite {
            expected: message.len(),
            written,
        });
    }
    Ok(())
}
