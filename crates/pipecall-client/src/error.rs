/// Errors that can occur in RPC client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level error (connect, mode set, closed connection).
    #[error("transport error: {0}")]
    Transport(#[from] pipecall_transport::TransportError),

    /// Frame-level error (write, read, framing, decoding).
    #[error("frame error: {0}")]
    Frame(#[from] pipecall_frame::FrameError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the failed call left the client without a usable connection.
    ///
    /// A caller that wants to retry the whole call can do so after such an
    /// error; the client reconnects on its next call.
    pub fn requires_reconnect(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Frame(err) => err.requires_reconnect(),
            ClientError::Json(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
