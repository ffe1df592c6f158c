use bytes::Bytes;

use crate::error::OsErrorCode;

/// Result of a single OS read call on a message-mode pipe.
///
/// Every read is classified here, at the OS boundary, so the read engine
/// never has to interpret raw error codes itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A whole message, or the final piece of one. Empty means the message
    /// carried no bytes.
    Chunk(Bytes),
    /// The message was longer than the read buffer; these bytes are a valid
    /// prefix and the rest is waiting for the next read.
    ChunkContinues(Bytes),
    /// The read failed for a reason that may clear up on retry.
    TransientError(OsErrorCode),
    /// The other end closed the pipe.
    Closed,
}

/// The OS operations a connection needs from an open pipe handle.
///
/// Implementations perform exactly one OS call per method and report its
/// outcome as a value. [`Connection`](crate::Connection) guarantees that no
/// method is called after [`close`](RawPipe::close).
pub trait RawPipe {
    /// Read at most `buf_size` bytes of the next message.
    fn read_chunk(&mut self, buf_size: usize) -> ReadOutcome;

    /// Write `buf` as one discrete pipe message, returning the byte count the
    /// OS accepted.
    fn write_message(&mut self, buf: &[u8]) -> std::result::Result<usize, OsErrorCode>;

    /// Release the OS handle.
    fn close(&mut self);
}

impl<P: RawPipe + ?Sized> RawPipe for Box<P> {
    fn read_chunk(&mut self, buf_size: usize) -> ReadOutcome {
        (**self).read_chunk(buf_size)
    }

    fn write_message(&mut self, buf: &[u8]) -> std::result::Result<usize, OsErrorCode> {
        (**self).write_message(buf)
    }

    fn close(&mut self) {
        (**self).close()
    }
}
