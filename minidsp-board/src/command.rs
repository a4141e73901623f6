//! Wire-level command catalog for the 2x4HD board family
//!
//! Payload templates, response tag prefixes, and the value transforms that
//! sit between domain values and wire bytes. Queries are answered with a
//! frame whose first three payload bytes repeat the query's own tag; set
//! commands are fire-and-forget.

use crate::error::BoardError;
use crate::types::{Channel, ConfigSlot, InputSource};

/// Opcodes of the fire-and-forget set commands
pub mod op {
    pub const SET_MUTE: u8 = 0x17;
    pub const SET_CONFIG: u8 = 0x25;
    pub const SET_INPUT_SOURCE: u8 = 0x34;
    pub const SET_DIRAC_BYPASS: u8 = 0x3F;
    pub const SET_VOLUME: u8 = 0x42;
    pub const SET_GAIN: u8 = 0x13;
    pub const STATUS_FAMILY: u8 = 0x05;
}

pub const MASTER_STATUS_QUERY: [u8; 4] = [0x05, 0xFF, 0xDA, 0x02];
pub const MASTER_STATUS_TAG: [u8; 3] = [0x05, 0xFF, 0xDA];

pub const INPUT_SOURCE_QUERY: [u8; 4] = [0x05, 0xFF, 0xD9, 0x01];
pub const INPUT_SOURCE_TAG: [u8; 3] = [0x05, 0xFF, 0xD9];

pub const CONFIG_QUERY: [u8; 4] = [0x05, 0xFF, 0xD8, 0x01];
pub const CONFIG_TAG: [u8; 3] = [0x05, 0xFF, 0xD8];

pub const DIRAC_STATUS_QUERY: [u8; 4] = [0x05, 0xFF, 0xE0, 0x01];
pub const DIRAC_STATUS_TAG: [u8; 3] = [0x05, 0xFF, 0xE0];

/// Second frame of the config-change settle sequence
pub const CONFIG_SETTLE_QUERY: [u8; 4] = [0x05, 0xFF, 0xE5, 0x01];

pub const INPUT_LEVELS_QUERY: [u8; 4] = [0x14, 0x00, 0x44, 0x02];
pub const INPUT_LEVELS_TAG: [u8; 3] = [0x14, 0x00, 0x44];

/// Master volume range in dB
pub const VOLUME_MIN_DB: f32 = -127.5;
pub const VOLUME_MAX_DB: f32 = 0.0;

/// Per-channel input gain range in dB
pub const GAIN_MIN_DB: f32 = -127.5;
pub const GAIN_MAX_DB: f32 = 12.0;

/// Channel selector base for the set-gain command (0x1A = channel 0)
const GAIN_CHANNEL_BASE: u8 = 0x1A;

/// Encode master volume as its wire byte (half-dB steps of attenuation).
pub fn encode_volume(db: f32) -> Result<u8, BoardError> {
    if !(VOLUME_MIN_DB..=VOLUME_MAX_DB).contains(&db) {
        return Err(BoardError::Config(format!(
            "volume out of bounds, range {VOLUME_MIN_DB} to {VOLUME_MAX_DB} dB: {db}"
        )));
    }
    Ok((-2.0 * db).round() as u8)
}

/// Decode the master volume byte back to dB.
pub fn decode_volume(raw: u8) -> f32 {
    raw as f32 * -0.5
}

pub fn set_volume_payload(db: f32) -> Result<[u8; 2], BoardError> {
    Ok([op::SET_VOLUME, encode_volume(db)?])
}

pub fn set_mute_payload(mute: bool) -> [u8; 2] {
    [op::SET_MUTE, if mute { 0x01 } else { 0x00 }]
}

pub fn set_input_source_payload(source: InputSource) -> [u8; 2] {
    [op::SET_INPUT_SOURCE, source.wire_code()]
}

pub fn set_config_payload(slot: ConfigSlot) -> [u8; 3] {
    [op::SET_CONFIG, slot.wire_index(), 0x02]
}

/// Dirac bypass wire polarity: 0x00 turns processing on, 0x01 bypasses it.
pub fn set_dirac_payload(enabled: bool) -> [u8; 2] {
    [op::SET_DIRAC_BYPASS, if enabled { 0x00 } else { 0x01 }]
}

/// Build the set-gain payload for one channel: opcode triplet, channel
/// selector, then the gain as a raw little-endian IEEE-754 single (no
/// scaling, unlike the volume byte).
pub fn set_gain_payload(channel: Channel, db: f32) -> Result<[u8; 8], BoardError> {
    if !(GAIN_MIN_DB..=GAIN_MAX_DB).contains(&db) {
        return Err(BoardError::Config(format!(
            "gain out of bounds, range {GAIN_MIN_DB} to {GAIN_MAX_DB} dB: {db}"
        )));
    }

    let mut payload = [
        op::SET_GAIN,
        0x80,
        0x00,
        GAIN_CHANNEL_BASE + channel.index(),
        0,
        0,
        0,
        0,
    ];
    payload[4..].copy_from_slice(&db.to_le_bytes());
    Ok(payload)
}

/// Decode the two instantaneous input levels from a levels response
/// payload: consecutive little-endian floats behind the tag, no rounding.
pub fn decode_levels(payload: &[u8]) -> Result<(f32, f32), BoardError> {
    if payload.len() < 11 {
        return Err(BoardError::Decode {
            reason: "input levels response too short".into(),
            payload: payload.to_vec(),
        });
    }
    let left = f32::from_le_bytes([payload[3], payload[4], payload[5], payload[6]]);
    let right = f32::from_le_bytes([payload[7], payload[8], payload[9], payload[10]]);
    Ok((left, right))
}
