//! Echo transport for running without hardware
//!
//! Synthesizes plausible replies so the command layer can be exercised end
//! to end: status-family queries (payload starting 0x05) come back with the
//! queried byte forced to zero, everything else is answered with a bare
//! opcode echo. Stateless - a value that was just "set" does not show up
//! in a subsequent "get".

use tracing::info;

use crate::error::TransportError;
use crate::frame;
use crate::Transport;

/// Logging transport that answers its own writes
#[derive(Debug, Default)]
pub struct EchoTransport;

impl EchoTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for EchoTransport {
    fn exchange(&mut self, report: &[u8]) -> Result<Vec<u8>, TransportError> {
        // the framed command starts behind the report id byte
        let payload = frame::decode(report.get(1..).unwrap_or_default())?;
        info!("echo write: {:02X?}", payload);

        let reply = match payload.first() {
            Some(&0x05) => {
                // pretend the queried byte reads back as zero
                let mut reply = payload;
                if let Some(b) = reply.get_mut(3) {
                    *b = 0x00;
                }
                reply.push(0x00);
                reply
            }
            Some(&opcode) => vec![opcode],
            None => Vec::new(),
        };
        Ok(frame::encode_response(&reply))
    }
}
