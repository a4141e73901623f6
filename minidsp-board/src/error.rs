//! Board operation error types

use minidsp_transport::{FrameError, TransportError};
use thiserror::Error;

/// Errors from board operations
///
/// Everything surfaces on first occurrence; the only automatic recovery in
/// the stack is the bounded resynchronization retry in the command engine.
#[derive(Error, Debug)]
pub enum BoardError {
    /// Malformed request parameters, caught before any transport I/O
    #[error("invalid request: {0}")]
    Config(String),

    /// Transport failed to open, write, or read
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Resynchronization budget exhausted without a matching response
    #[error("resynchronization exhausted after {attempts} attempts waiting for tag {expected:02X?}")]
    Desync { attempts: usize, expected: [u8; 3] },

    /// A response matched its tag but carried an undecodable value
    #[error("{reason} (raw payload {payload:02X?})")]
    Decode { reason: String, payload: Vec<u8> },

    /// Compound gain update failed midway: channel 0 was applied, channel 1
    /// was not, and the device is left with mixed gains
    #[error("channel 1 gain update failed after channel 0 was applied, device gains are mixed: {source}")]
    GainMixedState {
        #[source]
        source: Box<BoardError>,
    },
}

impl From<FrameError> for BoardError {
    fn from(e: FrameError) -> Self {
        BoardError::Decode {
            reason: e.to_string(),
            payload: Vec::new(),
        }
    }
}
