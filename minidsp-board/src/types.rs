//! Domain types for board controls

use std::fmt;
use std::str::FromStr;

use crate::error::BoardError;

// ---------------------------------------------------------------------------
// InputSource
// ---------------------------------------------------------------------------

/// Physical input selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Analog,
    Toslink,
    Usb,
}

impl InputSource {
    /// All sources in wire-code order.
    pub const ALL: [InputSource; 3] = [InputSource::Analog, InputSource::Toslink, InputSource::Usb];

    /// Wire code used by the set-input command and status responses.
    pub fn wire_code(self) -> u8 {
        match self {
            InputSource::Analog => 0x00,
            InputSource::Toslink => 0x01,
            InputSource::Usb => 0x02,
        }
    }

    /// Convert from a wire code. Anything past 0x02 is unknown.
    pub fn from_wire(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(InputSource::Analog),
            0x01 => Some(InputSource::Toslink),
            0x02 => Some(InputSource::Usb),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            InputSource::Analog => "analog",
            InputSource::Toslink => "toslink",
            InputSource::Usb => "usb",
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "analog" => Ok(InputSource::Analog),
            "toslink" => Ok(InputSource::Toslink),
            "usb" => Ok(InputSource::Usb),
            _ => Err(format!(
                "unknown input source: \"{s}\". Use analog, toslink, or usb"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigSlot
// ---------------------------------------------------------------------------

/// Configuration preset slot, user-facing 1-4, 0-indexed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigSlot(u8);

impl ConfigSlot {
    /// Validate a user-facing slot number (1-4).
    pub fn new(slot: u8) -> Result<Self, BoardError> {
        if (1..=4).contains(&slot) {
            Ok(Self(slot))
        } else {
            Err(BoardError::Config(format!(
                "config slot out of range (should be 1-4): {slot}"
            )))
        }
    }

    /// User-facing slot number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index as sent on the wire.
    pub fn wire_index(self) -> u8 {
        self.0 - 1
    }

    /// Convert from a wire index (0-3).
    pub fn from_wire(index: u8) -> Option<Self> {
        (index <= 3).then_some(Self(index + 1))
    }
}

impl fmt::Display for ConfigSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// Input channel of the stereo pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    A,
    B,
}

impl Channel {
    /// Both channels in wire order.
    pub const ALL: [Channel; 2] = [Channel::A, Channel::B];

    /// Zero-based channel index.
    pub fn index(self) -> u8 {
        match self {
            Channel::A => 0,
            Channel::B => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// BoardVariant
// ---------------------------------------------------------------------------

/// A specific board model's addressing and capability profile
///
/// The DDRC-24 is a capability superset of the 2x4HD (it adds the Dirac
/// bypass toggle) with its own product id. Capabilities are flags on the
/// variant, not a type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardVariant {
    TwoByFourHd,
    Ddrc24,
}

impl BoardVariant {
    /// USB vendor id shared by the family.
    pub fn vendor_id(self) -> u16 {
        0x2752
    }

    /// USB product id of this model.
    pub fn product_id(self) -> u16 {
        match self {
            BoardVariant::TwoByFourHd => 0x0011,
            BoardVariant::Ddrc24 => 0x0044,
        }
    }

    /// Whether this model exposes the Dirac bypass control.
    pub fn has_dirac(self) -> bool {
        matches!(self, BoardVariant::Ddrc24)
    }

    /// Marketing name.
    pub fn name(self) -> &'static str {
        match self {
            BoardVariant::TwoByFourHd => "2x4HD",
            BoardVariant::Ddrc24 => "DDRC-24",
        }
    }
}

impl fmt::Display for BoardVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoardVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "2x4hd" => Ok(BoardVariant::TwoByFourHd),
            "ddrc24" | "ddrc-24" => Ok(BoardVariant::Ddrc24),
            _ => Err(format!("unknown board: \"{s}\". Use 2x4HD or DDRC24")),
        }
    }
}

// ---------------------------------------------------------------------------
// MasterStatus
// ---------------------------------------------------------------------------

/// Decoded master status snapshot
///
/// Recomputed on every query, never cached. The input source is only
/// present when a source notification frame happened to be snooped while
/// the status query resynchronized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterStatus {
    /// Master volume in dB (-127.5..=0.0, half-dB steps)
    pub volume_db: f32,
    /// Master mute flag
    pub mute: bool,
    /// Input source, when opportunistically available
    pub input_source: Option<InputSource>,
}
