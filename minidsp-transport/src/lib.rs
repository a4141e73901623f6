//! Byte transports and frame codec for MiniDSP board communication
//!
//! This crate provides the raw exchange layer for talking to MiniDSP
//! 2x4HD-family boards:
//!
//! - USB HID (direct connection via hidapi)
//! - Echo (synthesized replies for running without hardware)
//!
//! A transport moves opaque reports; the frame codec in [`frame`] handles
//! the length prefix and checksum but attaches no meaning to payloads.

pub mod error;
pub mod frame;

mod echo;
mod hid;

pub use echo::EchoTransport;
pub use error::TransportError;
pub use frame::FrameError;
pub use hid::HidTransport;

/// The core transport trait - all backends implement this
///
/// One call performs exactly one blocking write of an outbound report
/// followed by one blocking read of the device's reply. The transport has
/// no protocol awareness; framing and interpretation happen above it.
///
/// Methods take `&mut self`: a transport handle is exclusively owned by a
/// single command engine, with one outstanding request at a time.
pub trait Transport {
    /// Write `report` to the device and read back its reply bytes.
    fn exchange(&mut self, report: &[u8]) -> Result<Vec<u8>, TransportError>;
}
