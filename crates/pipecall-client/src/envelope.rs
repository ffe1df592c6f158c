use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Request wrapper naming the daemon service that should handle a call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    /// Target service on the daemon side.
    pub service: String,
    /// Encoded function call, passed through untouched.
    pub request: String,
}

impl Envelope {
    /// Create an envelope for `request` addressed to `service`.
    pub fn new(service: impl Into<String>, request: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            request: request.into(),
        }
    }

    /// Serialize to the JSON text sent over the pipe.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
