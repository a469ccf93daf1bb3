//! Structured errors raised by the host itself.
//!
//! Agent and storage failures arrive as `scribe_core::Error`; these cover
//! what only the tool layer can get wrong.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Structured errors for the scribe-sw host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Invalid tool parameters (e.g., empty bucket name).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Tool output could not be encoded.
    #[error("SERIALIZE_FAILED: {0}")]
    Serialize(String),
}

impl From<HostError> for McpError {
    fn from(err: HostError) -> Self {
        let (code, message) = match &err {
            HostError::InvalidInput(msg) => (-32602, msg.clone()),
            HostError::Serialize(msg) => (-32603, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
