//! High-level control interface for MiniDSP 2x4HD-family boards
//!
//! This crate provides the command catalog and resynchronizing command
//! engine on top of any byte transport (USB HID, or the echo transport for
//! hardware-free runs).

pub mod command;
pub mod engine;
pub mod error;
pub mod snoop;
pub mod types;

pub use engine::{CommandEngine, MAX_RESYNC_ATTEMPTS};
pub use error::BoardError;
pub use snoop::Snooped;
pub use types::{BoardVariant, Channel, ConfigSlot, InputSource, MasterStatus};

use minidsp_transport::{HidTransport, Transport};
use tracing::debug;

/// High-level board interface over any transport
///
/// Provides get/set operations for the master controls (volume, mute,
/// input source, config slot), per-channel input gain, live input levels,
/// and the Dirac bypass toggle on boards that carry it. Every operation is
/// a blocking call; the transport is exclusively owned.
pub struct Board {
    engine: CommandEngine,
    variant: BoardVariant,
}

impl Board {
    /// Create a board interface over an already-open transport.
    pub fn new(variant: BoardVariant, transport: Box<dyn Transport>) -> Self {
        Self {
            engine: CommandEngine::new(transport),
            variant,
        }
    }

    /// Open the board's USB HID interface by its vendor/product identity.
    pub fn open_hid(variant: BoardVariant) -> Result<Self, BoardError> {
        let transport = HidTransport::open(variant.vendor_id(), variant.product_id())?;
        debug!("connected to {}", variant);
        Ok(Self::new(variant, Box::new(transport)))
    }

    pub fn variant(&self) -> BoardVariant {
        self.variant
    }

    /// Master status snapshot: volume, mute, and any snooped input source.
    pub fn master_status(&mut self) -> Result<MasterStatus, BoardError> {
        let (payload, snooped) = self.engine.query_validated(
            &command::MASTER_STATUS_QUERY,
            &command::MASTER_STATUS_TAG,
            4,
            &[0x00, 0x01],
        )?;
        // validation at offset 4 guarantees the volume byte at 3 exists
        Ok(MasterStatus {
            volume_db: command::decode_volume(payload[3]),
            mute: payload[4] == 0x01,
            input_source: snooped.input_source,
        })
    }

    /// Master volume in dB.
    pub fn volume(&mut self) -> Result<f32, BoardError> {
        Ok(self.master_status()?.volume_db)
    }

    /// Set master volume. Range -127.5 to 0 dB, half-dB resolution;
    /// out-of-range values fail before any transport I/O.
    pub fn set_volume(&mut self, db: f32) -> Result<(), BoardError> {
        self.engine.send(&command::set_volume_payload(db)?)
    }

    /// Master mute flag.
    pub fn mute(&mut self) -> Result<bool, BoardError> {
        Ok(self.master_status()?.mute)
    }

    pub fn set_mute(&mut self, mute: bool) -> Result<(), BoardError> {
        self.engine.send(&command::set_mute_payload(mute))
    }

    /// Currently selected input source.
    pub fn input_source(&mut self) -> Result<InputSource, BoardError> {
        let (payload, _) = self
            .engine
            .query(&command::INPUT_SOURCE_QUERY, &command::INPUT_SOURCE_TAG)?;
        let source = payload.get(3).copied().and_then(InputSource::from_wire);
        source.ok_or(BoardError::Decode {
            reason: "input source byte outside allowed set".into(),
            payload,
        })
    }

    pub fn set_input_source(&mut self, source: InputSource) -> Result<(), BoardError> {
        self.engine.send(&command::set_input_source_payload(source))
    }

    /// Active configuration slot (1-4).
    pub fn config_slot(&mut self) -> Result<ConfigSlot, BoardError> {
        let (payload, _) = self.engine.query_validated(
            &command::CONFIG_QUERY,
            &command::CONFIG_TAG,
            3,
            &[0x00, 0x01, 0x02, 0x03],
        )?;
        let slot = ConfigSlot::from_wire(payload[3]);
        slot.ok_or(BoardError::Decode {
            reason: "config index outside allowed set".into(),
            payload,
        })
    }

    /// Select a configuration slot.
    ///
    /// Issues the documented four-frame sequence: the slot change followed
    /// by three queries that force the device to settle. The query
    /// responses are intentionally discarded; the side effect is the point.
    pub fn set_config_slot(&mut self, slot: ConfigSlot) -> Result<(), BoardError> {
        self.engine.send(&command::set_config_payload(slot))?;
        self.engine.send(&command::CONFIG_SETTLE_QUERY)?;
        self.engine.send(&command::DIRAC_STATUS_QUERY)?;
        self.engine.send(&command::MASTER_STATUS_QUERY)?;
        Ok(())
    }

    /// Instantaneous input levels for both channels, no rounding applied.
    pub fn input_levels(&mut self) -> Result<(f32, f32), BoardError> {
        let (payload, _) = self
            .engine
            .query(&command::INPUT_LEVELS_QUERY, &command::INPUT_LEVELS_TAG)?;
        command::decode_levels(&payload)
    }

    /// Set the input gain of one channel. Range -127.5 to 12 dB;
    /// out-of-range values fail before any transport I/O.
    pub fn set_input_gain(&mut self, channel: Channel, db: f32) -> Result<(), BoardError> {
        self.engine.send(&command::set_gain_payload(channel, db)?)
    }

    /// Apply the same input gain to both channels, channel 0 first.
    ///
    /// If channel 1 fails after channel 0 was applied the device is left
    /// with mixed gains; that state is surfaced as
    /// [`BoardError::GainMixedState`] and never silently retried.
    pub fn set_input_gains(&mut self, db: f32) -> Result<(), BoardError> {
        // validate once up front so channel 0 is never sent with a bad value
        let first = command::set_gain_payload(Channel::A, db)?;
        let second = command::set_gain_payload(Channel::B, db)?;

        self.engine.send(&first)?;
        self.engine.send(&second).map_err(|e| BoardError::GainMixedState {
            source: Box::new(e),
        })
    }

    /// Whether Dirac processing is active (DDRC-24 only).
    pub fn dirac_enabled(&mut self) -> Result<bool, BoardError> {
        self.require_dirac()?;
        let (payload, _) = self.engine.query_validated(
            &command::DIRAC_STATUS_QUERY,
            &command::DIRAC_STATUS_TAG,
            3,
            &[0x00, 0x01],
        )?;
        // 0x00 = processing active, 0x01 = bypassed
        Ok(payload[3] == 0x00)
    }

    /// Toggle Dirac processing (DDRC-24 only).
    pub fn set_dirac_enabled(&mut self, enabled: bool) -> Result<(), BoardError> {
        self.require_dirac()?;
        self.engine.send(&command::set_dirac_payload(enabled))
    }

    fn require_dirac(&self) -> Result<(), BoardError> {
        if self.variant.has_dirac() {
            Ok(())
        } else {
            Err(BoardError::Config(format!(
                "Dirac bypass control is not available on the {}",
                self.variant
            )))
        }
    }
}
