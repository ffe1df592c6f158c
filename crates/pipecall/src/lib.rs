//! Blocking request/response RPC over Windows message-mode named pipes.
//!
//! pipecall talks to local daemons that frame every message as a 4-byte
//! native-order length header followed by a UTF-8 body, each sent as its own
//! pipe message.
//!
//! # Crate Structure
//!
//! - [`transport`]: pipe handles, connection lifecycle, pipe path helpers
//! - [`frame`]: header codec, chunked read engine, request/response transaction
//! - [`client`]: lazily connecting RPC client with service envelopes

/// Re-export transport types.
pub mod transport {
    pub use pipecall_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use pipecall_frame::*;
}

/// Re-export client types.
pub mod client {
    pub use pipecall_client::*;
}

pub use pipecall_client::{ClientError, RpcClient};
