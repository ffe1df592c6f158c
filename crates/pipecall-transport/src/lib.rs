//! Message-mode named pipe connection management.
//!
//! This is the lowest layer of pipecall. It owns the OS pipe handle, keeps
//! track of whether it is still usable, and reports every OS read as a
//! [`ReadOutcome`] rather than through ambient last-error state.
//!
//! Everything else builds on top of the [`Connection`] type provided here.

pub mod connection;
pub mod error;
pub mod path;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(windows)]
mod windows;

#[cfg(not(windows))]
mod unsupported;

pub use connection::{connect, Connection, ConnectionConfig, DEFAULT_CHUNK_SIZE};
pub use error::{OsErrorCode, Result, TransportError};
pub use path::{pipe_name, pipe_path, LOCAL_PIPE_PREFIX};
pub use traits::{RawPipe, ReadOutcome};

#[cfg(not(windows))]
pub use unsupported::NamedPipe;
#[cfg(windows)]
pub use windows::NamedPipe;

/// A connection over an OS named pipe.
pub type NamedPipeConnection = Connection<NamedPipe>;
