//! Length-prefixed request/response transactions over message-mode pipes.
//!
//! This is the core of pipecall. Every payload travels as two pipe messages:
//! - A 4-byte native-order length header
//! - The payload bytes themselves
//!
//! The read engine reassembles payloads split across messages and partial
//! reads, retries transient OS failures within a budget, and treats a closed
//! pipe as the end of data. The transaction protocol composes it with the
//! write engine into one blocking request/response exchange.

pub mod codec;
pub mod error;
pub mod reader;
pub mod transaction;
pub mod writer;

pub use codec::{
    decode_header, encode_header, FrameConfig, DEFAULT_RETRY_BUDGET, HEADER_SIZE, MAX_PAYLOAD,
};
pub use error::{FrameError, Result};
pub use reader::read_payload;
pub use transaction::transact;
pub use writer::write_message;
