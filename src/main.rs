//! MiniDSP board control CLI
//!
//! Thin shell over `minidsp-board`: argument validation happens here,
//! before any transport is opened; protocol work happens in the library
//! crates.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use minidsp_board::{Board, BoardVariant, ConfigSlot, InputSource};
use minidsp_transport::{EchoTransport, HidTransport, Transport};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{Action, BoardArg, Cli, Control, TransportArg};

/// A parsed, range-checked value for a set action
enum SetValue {
    Volume(f32),
    Mute(bool),
    Input(InputSource),
    Config(ConfigSlot),
    Gain(f32),
    Dirac(bool),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let variant = match cli.board {
        BoardArg::TwoByFourHd => BoardVariant::TwoByFourHd,
        BoardArg::Ddrc24 => BoardVariant::Ddrc24,
    };

    // reject invalid combinations before any transport I/O
    if cli.action == Action::Set && cli.value.is_none() {
        bail!("a value must be provided when the action is 'set'");
    }
    if cli.action == Action::Get && cli.value.is_some() {
        bail!("a value only makes sense when the action is 'set'");
    }
    if cli.control == Control::Dirac && !variant.has_dirac() {
        bail!("Dirac control is only applicable for the DDRC-24");
    }
    if cli.control == Control::Levels && cli.action == Action::Set {
        bail!("input levels are read-only");
    }
    if cli.control == Control::Gain && cli.action == Action::Get {
        bail!("input gain cannot be read back, only set");
    }

    // parse the value before opening anything as well
    let set_value = match &cli.value {
        Some(raw) => Some(parse_set_value(cli.control, raw)?),
        None => None,
    };

    let transport: Box<dyn Transport> = match cli.transport {
        TransportArg::Usbhid => Box::new(
            HidTransport::open(variant.vendor_id(), variant.product_id())
                .with_context(|| format!("failed to open the {variant} over USB HID"))?,
        ),
        TransportArg::Echo => Box::new(EchoTransport::new()),
    };
    let mut board = Board::new(variant, transport);

    match (cli.action, cli.control) {
        (Action::Get, Control::Volume) => println!("Volume: {} dB", board.volume()?),
        (Action::Get, Control::Mute) => {
            println!("{}", if board.mute()? { "Muted" } else { "Unmuted" })
        }
        (Action::Get, Control::Input) => println!("{}", board.input_source()?),
        (Action::Get, Control::Config) => println!("Config {}", board.config_slot()?),
        (Action::Get, Control::Levels) => {
            let (left, right) = board.input_levels()?;
            println!("Levels: {left} / {right} dB");
        }
        (Action::Get, Control::Dirac) => println!(
            "{}",
            if board.dirac_enabled()? {
                "Dirac on"
            } else {
                "Dirac off"
            }
        ),
        (Action::Set, _) => match set_value {
            Some(SetValue::Volume(db)) => board.set_volume(db)?,
            Some(SetValue::Mute(mute)) => board.set_mute(mute)?,
            Some(SetValue::Input(source)) => board.set_input_source(source)?,
            Some(SetValue::Config(slot)) => board.set_config_slot(slot)?,
            Some(SetValue::Gain(db)) => board.set_input_gains(db)?,
            Some(SetValue::Dirac(on)) => board.set_dirac_enabled(on)?,
            // set without a value is rejected above
            None => unreachable!(),
        },
        // get on a set-only control is rejected above
        (Action::Get, Control::Gain) => unreachable!(),
    }

    Ok(())
}

fn parse_set_value(control: Control, raw: &str) -> Result<SetValue> {
    match control {
        Control::Volume => raw
            .parse()
            .map(SetValue::Volume)
            .map_err(|_| anyhow!("volume must be provided in dB and without units ('-127.5' to '0')")),
        Control::Mute => Ok(SetValue::Mute(parse_on_off(raw, "mute")?)),
        Control::Input => raw
            .parse::<InputSource>()
            .map(SetValue::Input)
            .map_err(|e| anyhow!(e)),
        Control::Config => {
            let slot: u8 = raw
                .parse()
                .map_err(|_| anyhow!("config slot must be a number from 1 to 4"))?;
            Ok(SetValue::Config(ConfigSlot::new(slot)?))
        }
        Control::Gain => raw
            .parse()
            .map(SetValue::Gain)
            .map_err(|_| anyhow!("gain must be provided in dB and without units ('-127.5' to '12')")),
        Control::Dirac => Ok(SetValue::Dirac(parse_on_off(raw, "dirac")?)),
        // rejected before value parsing
        Control::Levels => bail!("input levels are read-only"),
    }
}

fn parse_on_off(raw: &str, control: &str) -> Result<bool> {
    match raw {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => bail!("{control} must be set to 'on' or 'off'"),
    }
}
