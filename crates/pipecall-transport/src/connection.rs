use tracing::{debug, trace};

use crate::error::{Result, TransportError};
use crate::path::pipe_path;
use crate::traits::{RawPipe, ReadOutcome};
use crate::NamedPipe;

/// Default size of a single OS read, in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Configuration for a pipe connection.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Buffer size handed to each OS read. Default: 4096.
    pub chunk_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// One open pipe plus the state needed to use it safely.
///
/// The active flag is the single source of truth for handle validity: once a
/// connection goes inactive every operation fails with
/// [`TransportError::AlreadyClosed`] and the pipe is never touched again.
/// Operations are strictly sequential; share a connection between threads
/// only behind external synchronization.
pub struct Connection<P: RawPipe> {
    pipe: P,
    name: String,
    active: bool,
    chunk_size: usize,
}

impl Connection<NamedPipe> {
    /// Open the named pipe `name` with default configuration.
    pub fn open(name: &str) -> Result<Self> {
        Self::open_with_config(name, ConnectionConfig::default())
    }

    /// Open the named pipe `name` with explicit configuration.
    ///
    /// `name` may be a logical pipe name or a full `\\server\pipe\name` path.
    pub fn open_with_config(name: &str, config: ConnectionConfig) -> Result<Self> {
        let path = pipe_path(name);
        let pipe = NamedPipe::open(&path)?;
        Ok(Self::from_pipe(path, pipe, config))
    }
}

impl<P: RawPipe> Connection<P> {
    /// Wrap an already-open pipe. The connection starts active.
    pub fn from_pipe(name: impl Into<String>, pipe: P, config: ConnectionConfig) -> Self {
        Self {
            pipe,
            name: name.into(),
            active: true,
            chunk_size: config.chunk_size.max(1),
        }
    }

    /// Pipe path or label this connection was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the pipe handle is still usable.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Buffer size used for each OS read.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Borrow the pipe for an OS call, failing fast if the connection is closed.
    pub fn pipe_mut(&mut self) -> Result<&mut P> {
        if !self.active {
            return Err(TransportError::AlreadyClosed);
        }
        Ok(&mut self.pipe)
    }

    /// Perform one OS read of up to [`chunk_size`](Self::chunk_size) bytes.
    pub fn read_chunk(&mut self) -> Result<ReadOutcome> {
        let chunk_size = self.chunk_size;
        let outcome = self.pipe_mut()?.read_chunk(chunk_size);
        trace!(pipe = %self.name, ?outcome, "read chunk");
        Ok(outcome)
    }

    /// Release the handle and mark the connection inactive.
    ///
    /// Safe to call any number of times; only the first call reaches the OS.
    pub fn close(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.pipe.close();
        debug!(pipe = %self.name, "connection closed");
    }

    /// Borrow the underlying pipe, whether or not the connection is active.
    pub fn get_ref(&self) -> &P {
        &self.pipe
    }
}

impl<P: RawPipe> Drop for Connection<P> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<P: RawPipe> std::fmt::Debug for Connection<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("name", &self.name)
            .field("active", &self.active)
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

/// Open a connection to the named pipe `name`.
///
/// On platforms without named pipes this fails with
/// [`TransportError::Unsupported`].
pub fn connect(name: &str, config: ConnectionConfig) -> Result<Connection<NamedPipe>> {
    Connection::open_with_config(name, config)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::mock::MockPipe;

    fn mock_connection(pipe: MockPipe) -> Connection<MockPipe> {
        Connection::from_pipe("mock", pipe, ConnectionConfig::default())
    }

    #[test]
    fn test_new_connection_is_active() {
        let conn = mock_connection(MockPipe::new());
        assert!(conn.is_active());
        assert_eq!(conn.chunk_size(), DEFAULT_CHUNK_SIZE);
        assert_eq!(conn.name(), "mock");
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut conn = mock_connection(MockPipe::new());
        conn.close();
        conn.close();
        assert!(!conn.is_active());
        assert_eq!(conn.get_ref().close_calls(), 1);
    }

    #[test]
    fn test_drop_after_close_does_not_close_again() {
        let pipe = MockPipe::new();
        let stats = pipe.stats();
        let mut conn = mock_connection(pipe);
        conn.close();
        drop(conn);
        assert_eq!(stats.close_calls(), 1);
    }

    #[test]
    fn test_drop_closes_active_connection() {
        let pipe = MockPipe::new();
        let stats = pipe.stats();
        drop(mock_connection(pipe));
        assert_eq!(stats.close_calls(), 1);
    }

    #[test]
    fn test_operations_fail_fast_after_close() {
        let mut conn = mock_connection(MockPipe::new().with_message(b"unread"));
        conn.close();

        assert!(matches!(conn.read_chunk(), Err(TransportError::AlreadyClosed)));
        assert!(matches!(conn.pipe_mut(), Err(TransportError::AlreadyClosed)));
        assert_eq!(conn.get_ref().read_calls(), 0);
    }

    #[test]
    fn test_read_chunk_uses_configured_size() {
        let pipe = MockPipe::new().with_message(b"abcdefgh");
        let mut conn = Connection::from_pipe("mock", pipe, ConnectionConfig { chunk_size: 3 });

        assert_eq!(
            conn.read_chunk().unwrap(),
            ReadOutcome::ChunkContinues(Bytes::from_static(b"abc"))
        );
        assert_eq!(
            conn.read_chunk().unwrap(),
            ReadOutcome::ChunkContinues(Bytes::from_static(b"def"))
        );
        assert_eq!(
            conn.read_chunk().unwrap(),
            ReadOutcome::Chunk(Bytes::from_static(b"gh"))
        );
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        let conn = Connection::from_pipe("mock", MockPipe::new(), ConnectionConfig { chunk_size: 0 });
        assert_eq!(conn.chunk_size(), 1);
    }

    #[test]
    #[cfg(not(windows))]
    fn test_connect_unsupported_off_windows() {
        let err = connect("seafile", ConnectionConfig::default()).unwrap_err();
        assert!(matches!(err, TransportError::Unsupported { ref path } if path == r"\\.\pipe\seafile"));
    }
}
