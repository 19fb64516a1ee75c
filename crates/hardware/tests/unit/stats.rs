//! # Statistics Tests
//!
//! Verifies that [`StackStats`](ssia_core::stats::StackStats) accumulates
//! across cycles and renders every counter in its report.

use ssia_core::common::RegisterSlot;
use ssia_core::core::stack::{MidStackCommand, Swizzle};
use ssia_core::stats::StackStats;

use crate::common::harness::{TestStack, tier};

#[test]
fn test_fresh_stack_has_zero_stats() {
    let t = TestStack::with_issue_width(2);
    assert_eq!(t.stack.stats(), &StackStats::default());
}

#[test]
fn test_idle_cycles_count() {
    let mut t = TestStack::with_issue_width(1);
    for _ in 0..5 {
        let _ = t.cycle();
    }
    let stats = t.stack.stats();
    assert_eq!(stats.cycles, 5);
    assert_eq!(stats.mid_pushes + stats.mid_pops, 0);
    assert_eq!(stats.writebacks_resolved, 0);
}

#[test]
fn test_peak_pending_is_sticky() {
    let mut t = TestStack::with_issue_width(1);
    let _ = t.top(0, Swizzle::push(&tier(4)), RegisterSlot::new(0, 1));
    let _ = t.cycle();
    let _ = t.top(0, Swizzle::push(&tier(4)), RegisterSlot::new(0, 2));
    let _ = t.cycle();
    assert_eq!(t.stack.stats().peak_pending, 2);

    let _ = t
        .writeback(0, RegisterSlot::new(0x1, 1))
        .mid(0, MidStackCommand::Nop, RegisterSlot::EMPTY);
    let outputs = t.cycle();
    assert_eq!(outputs.resolved, 1);

    let stats = t.stack.stats();
    assert_eq!(stats.pending_top, 1);
    assert_eq!(stats.peak_pending, 2);
    assert_eq!(stats.writebacks_resolved, 1);
}

#[test]
fn test_report_lists_every_counter() {
    let mut t = TestStack::with_issue_width(1);
    let _ = t.mid(0, MidStackCommand::Pop, RegisterSlot::EMPTY);
    let _ = t.cycle();

    let report = t.stack.stats().to_string();
    for key in [
        "sim_cycles",
        "mid.pushes",
        "mid.pops",
        "writeback.resolved",
        "writeback.conflicts",
        "pending.top",
        "pending.mid",
        "pending.peak",
    ] {
        assert!(report.contains(key), "missing {key}");
    }
    assert!(report.contains("mid.pops                 1"));
}
