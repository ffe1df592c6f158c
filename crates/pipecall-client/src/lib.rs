//! RPC client for local daemons reachable over message-mode named pipes.
//!
//! This is the "just works" layer. Name a pipe and a service, then call
//! remote functions; connection setup, envelopes and reconnecting after a
//! broken pipe are handled here.

pub mod client;
pub mod connector;
pub mod envelope;
pub mod error;

pub use client::RpcClient;
pub use connector::{Connector, NamedPipeConnector};
pub use envelope::Envelope;
pub use error::{ClientError, Result};
