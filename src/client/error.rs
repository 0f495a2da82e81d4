// ABOUTME: SMPP client error types for every session and facade operation
// ABOUTME: Separates transport-fatal errors from per-request rejections and timeouts

use crate::client::session::SessionState;
use crate::codec::CodecError;
use crate::datatypes::{CommandId, CommandStatus};
use std::io;
use thiserror::Error;

/// Error type for SMPP client operations
///
/// `Connection` and `ConnectionClosed` mean the session is gone and every
/// pending caller sees them. `BindRejected`, `SubmitRejected` and
/// `RequestTimeout` only concern the request that produced them; the session
/// stays usable.
#[derive(Debug, Error)]
pub enum SmppError {
    /// I/O error on the underlying stream
    #[error("Connection error: {0}")]
    Connection(#[from] io::Error),

    /// A PDU could not be encoded or decoded
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// The command is not legal in the current session state
    #[error("Cannot send {command:?} while session is {state:?}")]
    InvalidState {
        state: SessionState,
        command: CommandId,
    },

    /// The SMSC answered a bind with a non-zero command_status
    #[error("Bind rejected by SMSC: {status}")]
    BindRejected { status: CommandStatus },

    /// The SMSC answered a submit_sm with a non-zero command_status
    #[error("Submit rejected by SMSC: {status}")]
    SubmitRejected { status: CommandStatus },

    /// No response arrived before the request deadline
    #[error("Request timed out")]
    RequestTimeout,

    /// The session ended before the operation completed
    #[error("Connection closed")]
    ConnectionClosed,

    /// Caller supplied data that cannot be sent (address too long, etc.)
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Client configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Response PDU does not match the request it answers
    #[error("Unexpected PDU: expected {expected:?}, got {actual:?}")]
    UnexpectedPdu {
        expected: CommandId,
        actual: CommandId,
    },
}

impl SmppError {
    /// Whether this error means the session can no longer be used
    pub fn is_fatal(&self) -> bool {
        matches!(self, SmppError::Connection(_) | SmppError::ConnectionClosed)
    }
}

/// Result type alias for SMPP operations
pub type SmppResult<T> = Result<T, SmppError>;
