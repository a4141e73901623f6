//! Integration tests for board operations against scripted transports.
//!
//! No hardware required: a scripted transport replays canned inbound
//! frames and records every outbound payload, so exchange counts and
//! ordering can be asserted exactly.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use minidsp_board::{
    Board, BoardError, BoardVariant, Channel, ConfigSlot, InputSource, MAX_RESYNC_ATTEMPTS,
};
use minidsp_transport::{frame, EchoTransport, Transport, TransportError};

/// Shared script state: canned replies in, decoded outbound payloads out.
#[derive(Default)]
struct Script {
    replies: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
    /// 1-based exchange index that fails with a transport error
    fail_on: Option<usize>,
}

#[derive(Clone, Default)]
struct ScriptedTransport {
    script: Rc<RefCell<Script>>,
}

impl ScriptedTransport {
    fn with_replies(payloads: &[&[u8]]) -> Self {
        let transport = Self::default();
        {
            let mut script = transport.script.borrow_mut();
            script.replies = payloads.iter().map(|p| frame::encode_response(p)).collect();
        }
        transport
    }

    fn sent(&self) -> Vec<Vec<u8>> {
        self.script.borrow().sent.clone()
    }

    fn exchanges(&self) -> usize {
        self.script.borrow().sent.len()
    }
}

impl Transport for ScriptedTransport {
    fn exchange(&mut self, report: &[u8]) -> Result<Vec<u8>, TransportError> {
        let mut script = self.script.borrow_mut();
        let payload = frame::decode(&report[1..]).expect("outbound frame should be well-formed");
        script.sent.push(payload.clone());

        if script.fail_on == Some(script.sent.len()) {
            return Err(TransportError::Hid("scripted failure".into()));
        }

        // when the script runs dry, answer like the device answers a set:
        // a single-byte opcode echo
        Ok(script
            .replies
            .pop_front()
            .unwrap_or_else(|| frame::encode_response(&payload[..1])))
    }
}

fn board(variant: BoardVariant, transport: &ScriptedTransport) -> Board {
    Board::new(variant, Box::new(transport.clone()))
}

#[test]
fn master_status_decodes_volume_and_mute() {
    let transport = ScriptedTransport::with_replies(&[&[0x05, 0xFF, 0xDA, 0x14, 0x01]]);
    let mut board = board(BoardVariant::TwoByFourHd, &transport);

    let status = board.master_status().unwrap();
    assert_eq!(status.volume_db, -10.0);
    assert!(status.mute);
    assert_eq!(status.input_source, None);
    assert_eq!(transport.sent(), vec![vec![0x05, 0xFF, 0xDA, 0x02]]);
}

#[test]
fn master_status_rejects_bad_mute_flag() {
    let transport = ScriptedTransport::with_replies(&[&[0x05, 0xFF, 0xDA, 0x14, 0x02]]);
    let mut board = board(BoardVariant::TwoByFourHd, &transport);

    match board.master_status() {
        Err(BoardError::Decode { payload, .. }) => {
            assert_eq!(payload, vec![0x05, 0xFF, 0xDA, 0x14, 0x02]);
        }
        other => panic!("expected Decode error, got {other:?}"),
    }
}

#[test]
fn resync_retries_until_tag_matches() {
    // three unrelated frames, then the real answer
    let transport = ScriptedTransport::with_replies(&[
        &[0x05, 0xFF, 0xE0, 0x00],
        &[0x42],
        &[0x05, 0xFF, 0xD8, 0x01],
        &[0x05, 0xFF, 0xDA, 0x00, 0x00],
    ]);
    let mut board = board(BoardVariant::TwoByFourHd, &transport);

    let status = board.master_status().unwrap();
    assert_eq!(status.volume_db, 0.0);
    assert_eq!(transport.exchanges(), 4);
    // every attempt re-sends the same query
    assert!(transport
        .sent()
        .iter()
        .all(|p| p == &vec![0x05, 0xFF, 0xDA, 0x02]));
}

#[test]
fn resync_budget_exhaustion_is_fatal() {
    // empty script: every exchange is answered with an opcode echo that
    // never matches the master-status tag
    let transport = ScriptedTransport::default();
    let mut board = board(BoardVariant::TwoByFourHd, &transport);

    match board.master_status() {
        Err(BoardError::Desync { attempts, expected }) => {
            assert_eq!(attempts, MAX_RESYNC_ATTEMPTS);
            assert_eq!(expected, [0x05, 0xFF, 0xDA]);
        }
        other => panic!("expected Desync error, got {other:?}"),
    }
    assert_eq!(transport.exchanges(), MAX_RESYNC_ATTEMPTS);
}

#[test]
fn resync_snoops_source_notifications() {
    let transport = ScriptedTransport::with_replies(&[
        &[0x05, 0xFF, 0xD9, 0x01], // source-switch notification mid-resync
        &[0x05, 0xFF, 0xDA, 0x28, 0x00],
    ]);
    let mut board = board(BoardVariant::TwoByFourHd, &transport);

    let status = board.master_status().unwrap();
    assert_eq!(status.volume_db, -20.0);
    assert_eq!(status.input_source, Some(InputSource::Toslink));
    assert_eq!(transport.exchanges(), 2);
}

#[test]
fn input_source_round_trip() {
    let transport = ScriptedTransport::with_replies(&[&[0x05, 0xFF, 0xD9, 0x02]]);
    let mut board = board(BoardVariant::TwoByFourHd, &transport);

    assert_eq!(board.input_source().unwrap(), InputSource::Usb);
    board.set_input_source(InputSource::Analog).unwrap();
    assert_eq!(
        transport.sent(),
        vec![vec![0x05, 0xFF, 0xD9, 0x01], vec![0x34, 0x00]]
    );
}

#[test]
fn input_source_rejects_unknown_code() {
    let transport = ScriptedTransport::with_replies(&[&[0x05, 0xFF, 0xD9, 0x03]]);
    let mut board = board(BoardVariant::TwoByFourHd, &transport);

    assert!(matches!(
        board.input_source(),
        Err(BoardError::Decode { .. })
    ));
}

#[test]
fn config_slot_get_is_one_indexed() {
    let transport = ScriptedTransport::with_replies(&[&[0x05, 0xFF, 0xD8, 0x01]]);
    let mut board = board(BoardVariant::TwoByFourHd, &transport);

    assert_eq!(board.config_slot().unwrap().get(), 2);
}

#[test]
fn config_slot_set_issues_the_settle_sequence() {
    let transport = ScriptedTransport::default();
    let mut board = board(BoardVariant::TwoByFourHd, &transport);

    board.set_config_slot(ConfigSlot::new(2).unwrap()).unwrap();
    assert_eq!(
        transport.sent(),
        vec![
            vec![0x25, 0x01, 0x02],
            vec![0x05, 0xFF, 0xE5, 0x01],
            vec![0x05, 0xFF, 0xE0, 0x01],
            vec![0x05, 0xFF, 0xDA, 0x02],
        ]
    );
}

#[test]
fn input_levels_decode_two_floats() {
    let mut reply = vec![0x14, 0x00, 0x44];
    reply.extend_from_slice(&1.5f32.to_le_bytes());
    reply.extend_from_slice(&(-2.25f32).to_le_bytes());

    let transport = ScriptedTransport::with_replies(&[&reply]);
    let mut board = board(BoardVariant::TwoByFourHd, &transport);

    assert_eq!(board.input_levels().unwrap(), (1.5, -2.25));
    assert_eq!(transport.sent(), vec![vec![0x14, 0x00, 0x44, 0x02]]);
}

#[test]
fn out_of_range_values_fail_before_any_io() {
    let transport = ScriptedTransport::default();
    let mut board = board(BoardVariant::TwoByFourHd, &transport);

    assert!(matches!(board.set_volume(0.5), Err(BoardError::Config(_))));
    assert!(matches!(
        board.set_volume(-128.0),
        Err(BoardError::Config(_))
    ));
    assert!(matches!(
        board.set_input_gain(Channel::A, 12.5),
        Err(BoardError::Config(_))
    ));
    assert!(matches!(
        board.set_input_gains(-200.0),
        Err(BoardError::Config(_))
    ));
    assert_eq!(transport.exchanges(), 0);
}

#[test]
fn dirac_requires_the_capable_variant() {
    let transport = ScriptedTransport::default();
    let mut board = board(BoardVariant::TwoByFourHd, &transport);

    assert!(matches!(board.dirac_enabled(), Err(BoardError::Config(_))));
    assert!(matches!(
        board.set_dirac_enabled(true),
        Err(BoardError::Config(_))
    ));
    assert_eq!(transport.exchanges(), 0);
}

#[test]
fn dirac_status_decodes_polarity() {
    let transport = ScriptedTransport::with_replies(&[
        &[0x05, 0xFF, 0xE0, 0x00],
        &[0x05, 0xFF, 0xE0, 0x01],
    ]);
    let mut board = board(BoardVariant::Ddrc24, &transport);

    assert!(board.dirac_enabled().unwrap());
    assert!(!board.dirac_enabled().unwrap());

    board.set_dirac_enabled(false).unwrap();
    assert_eq!(transport.sent().last().unwrap(), &vec![0x3F, 0x01]);
}

#[test]
fn compound_gain_reports_mixed_state() {
    let transport = ScriptedTransport::default();
    transport.script.borrow_mut().fail_on = Some(2);
    let mut board = board(BoardVariant::TwoByFourHd, &transport);

    match board.set_input_gains(-6.0) {
        Err(BoardError::GainMixedState { source }) => {
            assert!(matches!(*source, BoardError::Transport(_)));
        }
        other => panic!("expected GainMixedState, got {other:?}"),
    }
    // channel 0 went out before the failure
    assert_eq!(transport.exchanges(), 2);
    assert_eq!(transport.sent()[0][3], 0x1A);
    assert_eq!(transport.sent()[1][3], 0x1B);
}

#[test]
fn compound_gain_sets_both_channels() {
    let transport = ScriptedTransport::default();
    let mut board = board(BoardVariant::TwoByFourHd, &transport);

    board.set_input_gains(-6.0).unwrap();
    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(&sent[0][..4], &[0x13, 0x80, 0x00, 0x1A]);
    assert_eq!(&sent[1][..4], &[0x13, 0x80, 0x00, 0x1B]);
    assert_eq!(&sent[0][4..], &(-6.0f32).to_le_bytes());
}

/// The echo transport models no persistent device state: a set followed by
/// a get reads back the synthesized zero, not the value just written.
#[test]
fn echo_transport_does_not_persist_volume() {
    let mut board = Board::new(BoardVariant::TwoByFourHd, Box::new(EchoTransport::new()));

    board.set_volume(-10.0).unwrap();
    assert_eq!(board.volume().unwrap(), 0.0);
}
