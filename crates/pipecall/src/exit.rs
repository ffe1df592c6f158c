use std::fmt;
use std::io;

use pipecall_client::ClientError;
use pipecall_frame::FrameError;
use pipecall_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => USAGE,
        io::ErrorKind::InvalidData => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    let code = match err {
        TransportError::Unsupported { .. } => FAILURE,
        TransportError::ConnectFailed { .. }
        | TransportError::ModeSetFailed { .. }
        | TransportError::AlreadyClosed => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Transport(err) => transport_error(context, err),
        FrameError::WriteFailed { .. }
        | FrameError::BrokenPipe { .. }
        | FrameError::IncompleteWrite { .. } => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        FrameError::MalformedHeader { .. }
        | FrameError::TruncatedResponse { .. }
        | FrameError::PayloadTooLarge { .. }
        | FrameError::InvalidUtf8(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

pub fn client_error(context: &str, err: ClientError) -> CliError {
    match err {
        ClientError::Transport(err) => transport_error(context, err),
        ClientError::Frame(err) => frame_error(context, err),
        ClientError::Json(err) => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_failure_is_transport_error() {
        let err = transport_error(
            "call failed",
            TransportError::ConnectFailed {
                path: r"\\.\pipe\missing".to_string(),
                code: 2,
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert!(err.message.starts_with("call failed: "));
    }

    #[test]
    fn protocol_violations_are_invalid_data() {
        let err = frame_error("call failed", FrameError::MalformedHeader { actual_len: 2 });
        assert_eq!(err.code, DATA_INVALID);

        let err = client_error(
            "call failed",
            ClientError::Frame(FrameError::TruncatedResponse {
                expected: 10,
                actual: 6,
            }),
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn nested_transport_error_keeps_its_code() {
        let err = client_error(
            "send failed",
            ClientError::Frame(FrameError::Transport(TransportError::AlreadyClosed)),
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
    }

    #[test]
    fn broken_pipe_is_transport_error() {
        let err = frame_error("send failed", FrameError::BrokenPipe { code: 121 });
        assert_eq!(err.code, TRANSPORT_ERROR);
    }
}
