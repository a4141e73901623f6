//! Frame codec for the MiniDSP HID protocol
//!
//! Outbound frames are `[length, payload..., checksum]` packed into a
//! fixed-size HID report: a zero report-id byte followed by 64 bytes of
//! 0xFF padding, overwritten from offset 1 with the framed command. The
//! length byte counts itself plus the payload (the checksum is excluded);
//! the checksum is the mod-256 sum of everything the length byte counts.
//!
//! Inbound frames carry a length prefix only. The device does not echo a
//! checksum, so decoding trusts the length byte - bounded against the
//! bytes actually received.

use thiserror::Error;

/// Outbound HID report size (report id byte + 64 data bytes)
pub const REPORT_SIZE: usize = 65;
/// Inbound HID report size
pub const READ_SIZE: usize = 64;
/// Report id used by all MiniDSP boards
pub const REPORT_ID: u8 = 0x00;
/// Filler value for the unused tail of an outbound report
pub const PADDING: u8 = 0xFF;
/// Largest payload that fits the report alongside length and checksum
pub const MAX_PAYLOAD: usize = 62;

/// Errors from decoding an inbound frame
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("declared frame length {declared} outside received buffer of {available} bytes")]
    LengthOutOfRange { declared: u8, available: usize },
}

/// Mod-256 byte sum over `bytes`.
///
/// The vendor tooling calls this a CRC; it is a plain additive checksum
/// and must stay one for wire compatibility.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Build the outbound HID report for `payload`.
///
/// # Panics
/// Payloads must be 1..=[`MAX_PAYLOAD`] bytes. Anything larger cannot fit
/// the report and is a caller programming error, not a protocol error.
pub fn encode(payload: &[u8]) -> [u8; REPORT_SIZE] {
    assert!(
        !payload.is_empty() && payload.len() <= MAX_PAYLOAD,
        "frame payload must be 1..={} bytes, got {}",
        MAX_PAYLOAD,
        payload.len()
    );

    let mut report = [PADDING; REPORT_SIZE];
    report[0] = REPORT_ID;
    report[1] = payload.len() as u8 + 1;
    report[2..2 + payload.len()].copy_from_slice(payload);
    report[2 + payload.len()] = checksum(&report[1..2 + payload.len()]);
    report
}

/// Strip the length prefix from an inbound frame, returning the payload.
///
/// Byte 0 declares the frame length `L` (counting itself); the payload is
/// the `L - 1` bytes that follow. A declared length of zero or one that
/// overruns the received buffer is rejected instead of read out of range.
pub fn decode(raw: &[u8]) -> Result<Vec<u8>, FrameError> {
    let declared = raw.first().copied().unwrap_or(0);
    let end = declared as usize;
    if declared == 0 || end > raw.len() {
        return Err(FrameError::LengthOutOfRange {
            declared,
            available: raw.len(),
        });
    }
    Ok(raw[1..end].to_vec())
}

/// Build a device-style inbound frame: length prefix, no checksum, padded
/// with zeros to [`READ_SIZE`].
///
/// Only the echo transport and tests synthesize inbound frames; real
/// hardware produces them on its own.
pub fn encode_response(payload: &[u8]) -> Vec<u8> {
    assert!(
        payload.len() < READ_SIZE,
        "response payload must fit a {}-byte report, got {}",
        READ_SIZE,
        payload.len()
    );

    let mut buf = vec![0u8; READ_SIZE];
    buf[0] = payload.len() as u8 + 1;
    buf[1..1 + payload.len()].copy_from_slice(payload);
    buf
}
