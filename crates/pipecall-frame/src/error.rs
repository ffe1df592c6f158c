use pipecall_transport::{OsErrorCode, TransportError};

/// Errors that can occur while moving framed payloads over a connection.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Connection-level error, including use of a closed connection.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The OS rejected a write. The connection has been closed.
    #[error("pipe write failed (os error {code})")]
    WriteFailed { code: OsErrorCode },

    /// Reads kept failing until the retry budget ran out. The connection has
    /// been closed.
    #[error("broken pipe: read failed after retries (last os error {code})")]
    BrokenPipe { code: OsErrorCode },

    /// A response header was not exactly 4 bytes.
    #[error("malformed response header ({actual_len} bytes, expected 4)")]
    MalformedHeader { actual_len: usize },

    /// The response body was shorter or longer than its header declared.
    #[error("response truncated: expected {expected} bytes, got {actual}")]
    TruncatedResponse { expected: usize, actual: usize },

    /// The OS accepted only part of a request message.
    #[error("incomplete write: {written} of {expected} bytes accepted")]
    IncompleteWrite { expected: usize, written: usize },

    /// The payload does not fit in a 4-byte length header.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The response body was not valid UTF-8.
    #[error("response is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

impl FrameError {
    /// Whether the connection can no longer carry transactions.
    ///
    /// Framing violations leave the pipe open but out of sync, so they count
    /// as fatal too: the caller must reconnect before the next call.
    pub fn requires_reconnect(&self) -> bool {
        match self {
            FrameError::Transport(_)
            | FrameError::WriteFailed { .. }
            | FrameError::BrokenPipe { .. }
            | FrameError::MalformedHeader { .. }
            | FrameError::TruncatedResponse { .. }
            | FrameError::IncompleteWrite { .. } => true,
            FrameError::PayloadTooLarge { .. } | FrameError::InvalidUtf8(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
