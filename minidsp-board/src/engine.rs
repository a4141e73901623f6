//! Command engine: framing, transport exchange, and resynchronization
//!
//! Sits between the control catalog and the byte transport:
//!
//! ```text
//! [Board]            high-level get/set operations
//!    |
//! [CommandEngine]    framing, resync retry, response validation
//!    |
//! [Transport]        one blocking write + read, no protocol awareness
//! ```

use minidsp_transport::{frame, Transport};
use tracing::{debug, warn};

use crate::error::BoardError;
use crate::snoop::{self, Snooped};

/// Resynchronization budget: how many times a query is re-sent before the
/// engine gives up on ever seeing its response tag.
pub const MAX_RESYNC_ATTEMPTS: usize = 10;

/// Drives the frame codec and the retry policy over an exclusively owned
/// transport. One outstanding request at a time, strictly blocking.
pub struct CommandEngine {
    transport: Box<dyn Transport>,
}

impl CommandEngine {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// One framed exchange with no semantics attached: encode, write/read,
    /// decode.
    pub fn exchange(&mut self, payload: &[u8]) -> Result<Vec<u8>, BoardError> {
        let report = frame::encode(payload);
        let raw = self.transport.exchange(&report)?;
        Ok(frame::decode(&raw)?)
    }

    /// Fire-and-forget set command. The device still produces a frame per
    /// write; it carries nothing useful and is discarded.
    pub fn send(&mut self, payload: &[u8]) -> Result<(), BoardError> {
        self.exchange(payload).map(|_| ())
    }

    /// Re-send `command` until the decoded payload's leading bytes equal
    /// `tag`, up to [`MAX_RESYNC_ATTEMPTS`] exchanges.
    ///
    /// The device may interleave frames belonging to other events before
    /// answering the query; re-sending the same command is the recovery
    /// mechanism. Every mismatched frame is offered to the snoop table
    /// before being discarded, so known side information (like a
    /// source-switch notification) is kept instead of lost.
    pub fn query(&mut self, command: &[u8], tag: &[u8; 3]) -> Result<(Vec<u8>, Snooped), BoardError> {
        let mut snooped = Snooped::default();
        for attempt in 1..=MAX_RESYNC_ATTEMPTS {
            let payload = self.exchange(command)?;
            if payload.len() >= tag.len() && payload[..tag.len()] == tag[..] {
                debug!("tag {:02X?} matched on attempt {}", tag, attempt);
                return Ok((payload, snooped));
            }
            snoop::inspect(&payload, &mut snooped);
            warn!(
                "discarding frame {:02X?} while waiting for tag {:02X?} (attempt {}/{})",
                payload, tag, attempt, MAX_RESYNC_ATTEMPTS
            );
        }
        Err(BoardError::Desync {
            attempts: MAX_RESYNC_ATTEMPTS,
            expected: *tag,
        })
    }

    /// Query, then require the payload byte at `offset` to be in `allowed`.
    /// A missing or out-of-set byte fails with the raw payload attached for
    /// diagnosis.
    pub fn query_validated(
        &mut self,
        command: &[u8],
        tag: &[u8; 3],
        offset: usize,
        allowed: &[u8],
    ) -> Result<(Vec<u8>, Snooped), BoardError> {
        let (payload, snooped) = self.query(command, tag)?;
        match payload.get(offset) {
            Some(value) if allowed.contains(value) => Ok((payload, snooped)),
            _ => Err(BoardError::Decode {
                reason: format!("byte {offset} outside allowed set {allowed:02X?}"),
                payload,
            }),
        }
    }
}
