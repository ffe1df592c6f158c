/// Raw OS error code as reported by the platform (Win32 `GetLastError` on Windows).
pub type OsErrorCode = u32;

/// Errors that can occur while managing a pipe connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Opening the named pipe failed.
    #[error("failed to open pipe {path} (os error {code})")]
    ConnectFailed { path: String, code: OsErrorCode },

    /// The pipe opened but could not be switched into message read mode.
    #[error("failed to set message read mode on {path} (os error {code})")]
    ModeSetFailed { path: String, code: OsErrorCode },

    /// The connection has already been closed.
    #[error("connection already closed")]
    AlreadyClosed,

    /// Named pipes are not available on this platform.
    #[error("named pipes are not supported on this platform: {path}")]
    Unsupported { path: String },
}

pub type Result<T> = std::result::Result<T, TransportError>;
