// CLI definitions using clap

use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "minidsp-ctl")]
#[command(author, version, about = "Command and control for MiniDSP 2x4HD-family boards")]
pub struct Cli {
    /// Board to talk to
    #[arg(value_enum)]
    pub board: BoardArg,

    /// Whether to read or change the control
    #[arg(value_enum)]
    pub action: Action,

    /// Control to operate on
    #[arg(value_enum)]
    pub control: Control,

    /// Value to apply when the action is 'set'
    pub value: Option<String>,

    /// Transport method to use
    #[arg(short, long, value_enum, default_value = "usbhid")]
    pub transport: TransportArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BoardArg {
    #[value(name = "2x4hd")]
    TwoByFourHd,
    Ddrc24,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Control {
    /// Master volume (dB)
    Volume,
    /// Master mute (on/off)
    Mute,
    /// Input source (analog, toslink, usb)
    Input,
    /// Configuration slot (1-4)
    Config,
    /// Input gain for both channels (dB, set only)
    Gain,
    /// Live input levels (get only)
    Levels,
    /// Dirac processing (on/off, DDRC-24 only)
    Dirac,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    /// Real board over USB HID
    Usbhid,
    /// Synthesized replies, no hardware needed
    Echo,
}
