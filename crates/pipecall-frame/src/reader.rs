use bytes::{Bytes, BytesMut};
use pipecall_transport::{Connection, RawPipe, ReadOutcome};
use tracing::{debug, trace, warn};

use crate::codec::FrameConfig;
use crate::error::{FrameError, Result};

/// Read the next logical payload of `expected_len` bytes (blocking).
///
/// The payload is reassembled from as many pipe messages and partial
/// messages as it takes. Reading stops at the first empty chunk or once at
/// least `expected_len` bytes have arrived; at least one OS read is always
/// issued, so an empty payload consumes its empty message.
///
/// A closed pipe ends the read early and closes the connection; whatever
/// arrived is returned, so callers must compare the returned length with
/// what they expected. The final chunk is kept whole even when it overshoots
/// `expected_len`; exact size checks belong to the caller.
///
/// Transient OS failures are retried up to `config.retry_budget` times in a
/// row. Exhausting the budget closes the connection and fails with
/// [`FrameError::BrokenPipe`].
pub fn read_payload<P: RawPipe>(
    conn: &mut Connection<P>,
    expected_len: usize,
    config: &FrameConfig,
) -> Result<Bytes> {
    let mut chunks: Vec<Bytes> = Vec::new();
    let mut total = 0usize;
    let mut retries_left = config.retry_budget;

    loop {
        let chunk = match conn.read_chunk()? {
            ReadOutcome::Chunk(chunk) | ReadOutcome::ChunkContinues(chunk) => {
                retries_left = config.retry_budget;
                chunk
            }
            ReadOutcome::TransientError(code) => {
                if retries_left == 0 {
                    warn!(pipe = %conn.name(), code, "read retries exhausted; closing connection");
                    conn.close();
                    return Err(FrameError::BrokenPipe { code });
                }
                retries_left -= 1;
                debug!(pipe = %conn.name(), code, retries_left, "transient read failure");
                continue;
            }
            ReadOutcome::Closed => {
                debug!(pipe = %conn.name(), total, expected_len, "pipe closed by peer");
                conn.close();
                break;
            }
        };

        if chunk.is_empty() {
            break;
        }

        total += chunk.len();
        trace!(len = chunk.len(), total, expected_len, "payload chunk");
        chunks.push(chunk);

        if total >= expected_len {
            break;
        }
    }

    Ok(concat(chunks, total))
}

fn concat(mut chunks: Vec<Bytes>, total: usize) -> Bytes {
    match chunks.len() {
        0 => Bytes::new(),
        1 => chunks.pop().unwrap_or_default(),
        _ => {
            let mut out = BytesMut::with_capacity(total);
            for chunk in &chunks {
                out.extend_from_slice(chunk);
            }
            out.freeze()
        }
    }
}
