//! # Bridge Tests
//!
//! Exercises the composed stack: values spilled from the top tier reach the
//! mid tier one cycle later, values refilled from the mid tier reach the top
//! tier, and writebacks fan out to both tiers.

use pretty_assertions::assert_eq;
use rstest::rstest;
use ssia_core::common::{ConfigError, RegisterSlot};
use ssia_core::config::StackConfig;
use ssia_core::core::stack::{MidStackCommand, Snapshot, StackTier, StageOutput, Swizzle};
use ssia_core::Ssia;

use crate::common::harness::{TestStack, packed, resolved, tier};

fn r(value: u64) -> RegisterSlot {
    RegisterSlot::resolved(value)
}

#[rstest]
#[case::reference(StackConfig::default())]
#[case::minimal_top(StackConfig {
    top_depth: 2,
    mid_depth: 3,
    issue_width: 1,
    writeback_count: 2,
    ..StackConfig::default()
})]
#[case::wide(StackConfig {
    register_width: 64,
    tag_width: 32,
    top_depth: 6,
    mid_depth: 8,
    issue_width: 3,
    ..StackConfig::default()
})]
fn test_reset_outputs_are_zero(#[case] config: StackConfig) {
    let mut t = TestStack::new(config.clone());
    for _ in 0..2 {
        let outputs = t.cycle();
        assert_eq!(outputs.stages, vec![StageOutput::default(); config.issue_width]);
        assert_eq!(outputs.resolved, 0);
    }
    assert_eq!(t.stack.top_state(), &Snapshot::zeroed(config.top_depth));
    assert_eq!(t.stack.mid_state(), &Snapshot::zeroed(config.mid_depth));
    assert_eq!(t.stack.mid().config().depth(), config.mid_depth);
    assert_eq!(t.stack.top().config().depth(), config.top_depth);
}

#[test]
fn test_spill_reaches_mid_peek_next_cycle() {
    let mut t = TestStack::with_issue_width(1).load(
        &[r(1), r(2), r(3), r(4)],
        &[r(10), r(11), r(12), r(13)],
    );
    let _ = t
        .top(0, Swizzle::push(&tier(4)), r(0))
        .mid(0, MidStackCommand::Push, RegisterSlot::EMPTY);
    let spill = t.cycle();
    assert_eq!(spill.stages[0].top_bottom, r(4));

    let next = t.cycle();
    assert_eq!(next.stages[0].mid_peek, r(4));
    assert_eq!(t.stack.top_state(), &resolved(&[0, 1, 2, 3]));
    assert_eq!(t.stack.mid_state(), &resolved(&[4, 10, 11, 12]));
}

#[test]
fn test_refill_reaches_top_bottom() {
    let mut t = TestStack::with_issue_width(1).load(
        &[r(1), r(2), r(3), r(4)],
        &[r(10), r(11), r(12), r(13)],
    );
    let _ = t
        .top(0, Swizzle::pop(&tier(4)), RegisterSlot::EMPTY)
        .mid(0, MidStackCommand::Pop, r(14));
    let _ = t.cycle();
    assert_eq!(t.stack.top_state(), &resolved(&[2, 3, 4, 10]));
    assert_eq!(t.stack.mid_state(), &resolved(&[11, 12, 13, 14]));

    let next = t.cycle();
    assert_eq!(next.stages[0].top_bottom, r(10));
}

#[test]
fn test_multi_stage_spill_uses_stage_snapshots() {
    let mut t = TestStack::with_issue_width(2).load(
        &[r(1), r(2), r(3), r(4)],
        &[r(10), r(11), r(12), r(13)],
    );
    let _ = t
        .top(0, Swizzle::push(&tier(4)), r(20))
        .top(1, Swizzle::push(&tier(4)), r(21))
        .mid(0, MidStackCommand::Push, RegisterSlot::EMPTY)
        .mid(1, MidStackCommand::Push, RegisterSlot::EMPTY);
    let outputs = t.cycle();

    // Stage 1 sees the top tier after stage 0, so it spills 3, not 4.
    assert_eq!(outputs.stages[0].top_bottom, r(4));
    assert_eq!(outputs.stages[1].top_bottom, r(3));
    assert_eq!(outputs.stages[1].top_peek, [r(20), r(1)]);
    assert_eq!(t.stack.top_state(), &resolved(&[21, 20, 1, 2]));
    assert_eq!(t.stack.mid_state(), &resolved(&[3, 4, 10, 11]));
}

#[test]
fn test_pending_value_round_trips_through_mid() {
    let pending = packed(0x5_0000_0000);
    let mut t = TestStack::with_issue_width(1).load(
        &[r(1), r(2), r(3), pending],
        &[r(10), r(11), r(12), r(13)],
    );

    let _ = t
        .top(0, Swizzle::push(&tier(4)), r(0))
        .mid(0, MidStackCommand::Push, RegisterSlot::EMPTY);
    let _ = t.cycle();
    assert_eq!(t.stack.mid_state().top(), pending);
    assert_eq!(t.stack.stats().pending_mid, 1);

    let _ = t
        .top(0, Swizzle::pop(&tier(4)), RegisterSlot::EMPTY)
        .mid(0, MidStackCommand::Pop, r(13));
    let _ = t.cycle();
    assert_eq!(t.stack.top_state().bottom(), pending);

    let _ = t.writeback(0, packed(0x5_0000_BEEF));
    let outputs = t.cycle();
    assert_eq!(outputs.resolved, 1);
    assert_eq!(t.stack.top_state().bottom(), r(0xBEEF));
}

#[test]
fn test_writeback_fans_out_to_both_tiers() {
    let mut t = TestStack::with_issue_width(1).load(
        &[r(1), RegisterSlot::new(0, 6), r(3), r(4)],
        &[RegisterSlot::new(0, 6), r(11), RegisterSlot::new(0, 2), r(13)],
    );
    let _ = t.writeback(0, RegisterSlot::new(0x66, 6));
    let outputs = t.cycle();
    assert_eq!(outputs.resolved, 2);
    assert_eq!(outputs.conflicts, 0);
    assert_eq!(t.stack.top_state()[1], r(0x66));
    assert_eq!(t.stack.mid_state()[0], r(0x66));
    assert_eq!(t.stack.mid_state()[2], RegisterSlot::new(0, 2));
    assert_eq!(t.stack.stats().pending_mid, 1);
}

#[test]
fn test_conflicting_writebacks_last_channel_wins() {
    let mut t = TestStack::new(StackConfig {
        issue_width: 1,
        writeback_count: 2,
        ..StackConfig::default()
    })
    .load(
        &[RegisterSlot::new(0, 1), r(2), r(3), r(4)],
        &[r(10), r(11), r(12), r(13)],
    );
    let _ = t
        .writeback(0, RegisterSlot::new(0xA, 1))
        .writeback(1, RegisterSlot::new(0xB, 1));
    let outputs = t.cycle();
    assert_eq!(outputs.conflicts, 1);
    assert_eq!(t.stack.top_state().top(), r(0xB));
    assert_eq!(t.stack.stats().writeback_conflicts, 1);
}

#[test]
fn test_inputs_from_other_geometry_rejected() {
    let mut narrow = Ssia::new(&StackConfig {
        issue_width: 1,
        ..StackConfig::default()
    })
    .unwrap();
    let wide = Ssia::new(&StackConfig::default()).unwrap();

    let err = narrow.advance(&wide.idle_inputs()).unwrap_err();
    assert_eq!(
        err,
        ConfigError::GeometryMismatch {
            what: "issue stages",
            expected: 1,
            found: 4
        }
    );

    let mut inputs = narrow.idle_inputs();
    inputs.stages[0].swizzle = Swizzle::push(&tier(5));
    assert!(matches!(
        narrow.advance(&inputs),
        Err(ConfigError::GeometryMismatch { what: "swizzle depth", .. })
    ));
    assert_eq!(narrow.stats().cycles, 0);
}

#[test]
fn test_load_state_checks_both_depths() {
    let mut stack = Ssia::new(&StackConfig {
        mid_depth: 6,
        ..StackConfig::default()
    })
    .unwrap();
    assert!(stack.load_state(&Snapshot::zeroed(4), &Snapshot::zeroed(4)).is_err());
    assert!(stack.load_state(&Snapshot::zeroed(6), &Snapshot::zeroed(6)).is_err());
    assert!(stack.load_state(&Snapshot::zeroed(4), &Snapshot::zeroed(6)).is_ok());
}

#[test]
fn test_stats_track_movement_and_reset() {
    let mut t = TestStack::with_issue_width(2);
    let _ = t
        .mid(0, MidStackCommand::Push, RegisterSlot::EMPTY)
        .mid(1, MidStackCommand::Pop, RegisterSlot::EMPTY)
        .top(0, Swizzle::push(&tier(4)), packed(0x1_0000_0001))
        .top(1, Swizzle::push(&tier(4)), packed(0x2_0000_0002));
    let _ = t.cycle_repeat();
    let _ = t.cycle_repeat();

    let stats = t.stack.stats();
    assert_eq!(stats.cycles, 2);
    assert_eq!(stats.mid_pushes, 2);
    assert_eq!(stats.mid_pops, 2);
    assert_eq!(stats.pending_top, 4);
    assert_eq!(stats.peak_pending, 4);

    t.stack.reset();
    assert_eq!(t.stack.stats().cycles, 0);
    assert_eq!(t.stack.top_state(), &Snapshot::zeroed(4));
}
