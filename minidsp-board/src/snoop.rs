//! Partial decoding of frames discarded during resynchronization
//!
//! The device can emit unsolicited or stale frames (e.g. a source-switch
//! notification) while a query is in flight. Rather than throwing those
//! away outright, a small table of known tag prefixes extracts what it can
//! so the caller is spared a second round trip. Purely an optimization: a
//! frame no rule recognizes is simply dropped.

use crate::command;
use crate::types::InputSource;

/// Fields opportunistically recovered from mismatched frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snooped {
    pub input_source: Option<InputSource>,
}

type Rule = (&'static [u8; 3], fn(&[u8], &mut Snooped));

/// Known tag prefixes and their partial decoders
const RULES: &[Rule] = &[(&command::INPUT_SOURCE_TAG, snoop_input_source)];

/// Offer a mismatched frame to every rule whose tag prefix matches.
pub fn inspect(payload: &[u8], out: &mut Snooped) {
    for (tag, rule) in RULES {
        if payload.len() >= tag.len() && payload[..tag.len()] == tag[..] {
            rule(payload, out);
        }
    }
}

fn snoop_input_source(payload: &[u8], out: &mut Snooped) {
    if let Some(source) = payload.get(3).copied().and_then(InputSource::from_wire) {
        out.input_source = Some(source);
    }
}
