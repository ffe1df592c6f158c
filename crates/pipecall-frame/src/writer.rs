use pipecall_transport::{Connection, RawPipe};
use tracing::{trace, warn};

use crate::error::{FrameError, Result};

/// Write `payload` as one discrete pipe message (blocking).
///
/// Exactly one OS write is issued. Returns the byte count the OS accepted;
/// a short count is not an error here. Any OS failure closes the connection,
/// since a message pipe cannot resume a half-written message.
pub fn write_message<P: RawPipe>(conn: &mut Connection<P>, payload: &[u8]) -> Result<usize> {
    let outcome = conn.pipe_mut()?.write_message(payload);
    match outcome {
        Ok(written) => {
            trace!(pipe = %conn.name(), len = payload.len(), written, "wrote message");
            Ok(written)
        }
        Err(code) => {
            warn!(pipe = %conn.name(), code, "pipe write failed; closing connection");
            conn.close();
            Err(FrameError::WriteFailed { code })
        }
    }
}

#[cfg(test)]
mod tests {
    use pipecall_transport::mock::MockPipe;
    use pipecall_transport::{ConnectionConfig, TransportError};

    use super::*;

    fn connection(pipe: MockPipe) -> Connection<MockPipe> {
        Connection::from_pipe("mock", pipe, ConnectionConfig::default())
    }

    #[test]
    fn write_single_message() {
        let mut conn = connection(MockPipe::new());

        let written = write_message(&mut conn, b"hello").unwrap();

        assert_eq!(written, 5);
        assert_eq!(conn.get_ref().written(), vec![&b"hello"[..]]);
        assert!(conn.is_active());
    }

    #[test]
    fn each_write_is_a_separate_message() {
        let mut conn = connection(MockPipe::new());

        write_message(&mut conn, b"one").unwrap();
        write_message(&mut conn, b"two").unwrap();

        assert_eq!(conn.get_ref().written(), vec![&b"one"[..], &b"two"[..]]);
    }

    #[test]
    fn large_payload_is_one_message() {
        let payload = vec![0x5A; 3 * 4096 + 17];
        let mut conn = connection(MockPipe::new());

        write_message(&mut conn, &payload).unwrap();

        let written = conn.get_ref().written();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].as_ref(), payload.as_slice());
    }

    #[test]
    fn write_failure_closes_connection() {
        let mut conn = connection(MockPipe::new().failing_write(0, 232));

        let err = write_message(&mut conn, b"x").unwrap_err();

        assert!(matches!(err, FrameError::WriteFailed { code: 232 }));
        assert!(!conn.is_active());
        assert_eq!(conn.get_ref().close_calls(), 1);
    }

    #[test]
    fn short_write_is_reported_not_rejected() {
        let mut conn = connection(MockPipe::new().short_write(0, 2));

        let written = write_message(&mut conn, b"abcd").unwrap();

        assert_eq!(written, 2);
        assert!(conn.is_active());
    }

    #[test]
    fn write_on_closed_connection_fails_fast() {
        let mut conn = connection(MockPipe::new());
        conn.close();

        let err = write_message(&mut conn, b"x").unwrap_err();

        assert!(matches!(
            err,
            FrameError::Transport(TransportError::AlreadyClosed)
        ));
        assert!(conn.get_ref().written().is_empty());
        assert_eq!(conn.get_ref().close_calls(), 1);
    }
}
