use crate::error::{OsErrorCode, Result, TransportError};
use crate::traits::{RawPipe, ReadOutcome};

/// Named pipe placeholder for platforms without named pipes.
///
/// Uninhabited: [`NamedPipe::open`] always fails, so no value ever exists.
#[derive(Debug)]
pub enum NamedPipe {}

impl NamedPipe {
    /// Always fails with [`TransportError::Unsupported`].
    pub fn open(path: &str) -> Result<Self> {
        Err(TransportError::Unsupported {
            path: path.to_string(),
        })
    }
}

impl RawPipe for NamedPipe {
    fn read_chunk(&mut self, _buf_size: usize) -> ReadOutcome {
        match *self {}
    }

    fn write_message(&mut self, _buf: &[u8]) -> std::result::Result<usize, OsErrorCode> {
        match *self {}
    }

    fn close(&mut self) {
        match *self {}
    }
}
