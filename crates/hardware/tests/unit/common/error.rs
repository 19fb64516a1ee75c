//! # Error Tests
//!
//! This module checks error messages and the decoding paths that produce
//! command and selector errors.

use ssia_core::common::ConfigError;
use ssia_core::core::stack::{MidStackCommand, SlotSource, Swizzle};

use crate::common::harness::tier;

#[test]
fn test_zero_parameter_display() {
    let err = ConfigError::ZeroParameter { name: "issue_width" };
    assert_eq!(err.to_string(), "`issue_width` must be at least 1");
}

#[test]
fn test_depth_display() {
    let err = ConfigError::DepthTooShallow {
        name: "mid_depth",
        depth: 1,
    };
    assert_eq!(err.to_string(), "`mid_depth` must be at least 2, got 1");
}

#[test]
fn test_geometry_mismatch_display() {
    let err = ConfigError::GeometryMismatch {
        what: "issue stages",
        expected: 4,
        found: 2,
    };
    assert_eq!(err.to_string(), "issue stages: expected 4, found 2");
}

#[test]
fn test_invalid_command_display() {
    let err = MidStackCommand::try_from(0b11).unwrap_err();
    assert_eq!(err, ConfigError::InvalidCommand(3));
    assert_eq!(err.to_string(), "invalid mid-stack command encoding 0b11");
}

#[test]
fn test_swizzle_errors() {
    assert_eq!(
        Swizzle::from_selectors(&[0]).unwrap_err(),
        ConfigError::DepthTooShallow {
            name: "swizzle",
            depth: 1
        }
    );
    assert_eq!(
        Swizzle::from_selectors(&[0, 3, 2]).unwrap_err(),
        ConfigError::InjectNotAllowed { slot: 1, depth: 3 }
    );
    assert_eq!(
        Swizzle::identity(&tier(3)).route(3, SlotSource::Slot(0)).unwrap_err(),
        ConfigError::SlotOutOfRange { slot: 3, depth: 3 }
    );
    assert!(
        Swizzle::identity(&tier(3))
            .route(0, SlotSource::Slot(7))
            .unwrap_err()
            .to_string()
            .contains("out of range")
    );
}
