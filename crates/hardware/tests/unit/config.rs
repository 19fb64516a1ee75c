//! # Configuration Tests
//!
//! Tests for the stack configuration: defaults, deserialization and the
//! validation order of every geometry error.

use pretty_assertions::assert_eq;
use rstest::rstest;
use ssia_core::common::ConfigError;
use ssia_core::config::{StackConfig, TierConfig};
use ssia_core::Ssia;

#[test]
fn test_config_default() {
    let config = StackConfig::default();
    assert_eq!(config.register_width, 32);
    assert_eq!(config.top_depth, 4);
    assert_eq!(config.mid_depth, 4);
    assert_eq!(config.issue_width, 4);
    assert_eq!(config.tag_width, 3);
    assert_eq!(config.writeback_count, 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_json_is_default() {
    let config: StackConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, StackConfig::default());
}

#[test]
fn test_partial_json() {
    let config: StackConfig =
        serde_json::from_str(r#"{ "register_width": 64, "mid_depth": 8, "writeback_count": 2 }"#)
            .unwrap();
    assert_eq!(config.register_width, 64);
    assert_eq!(config.mid_depth, 8);
    assert_eq!(config.writeback_count, 2);
    assert_eq!(config.top_depth, 4);

    let top = config.top_tier().unwrap();
    let mid = config.mid_tier().unwrap();
    assert_eq!(top.depth(), 4);
    assert_eq!(mid.depth(), 8);
    assert_eq!(mid.layout().value_bits(), 64);
    assert_eq!(mid.writeback_count(), 2);
}

#[rstest]
#[case::zero_width(
    StackConfig { register_width: 0, ..StackConfig::default() },
    ConfigError::ZeroParameter { name: "register_width" }
)]
#[case::wide_register(
    StackConfig { register_width: 65, ..StackConfig::default() },
    ConfigError::RegisterWidthTooLarge(65)
)]
#[case::zero_tag(
    StackConfig { tag_width: 0, ..StackConfig::default() },
    ConfigError::ZeroParameter { name: "tag_width" }
)]
#[case::wide_tag(
    StackConfig { tag_width: 33, ..StackConfig::default() },
    ConfigError::TagWidthTooLarge(33)
)]
#[case::zero_issue(
    StackConfig { issue_width: 0, ..StackConfig::default() },
    ConfigError::ZeroParameter { name: "issue_width" }
)]
#[case::zero_writeback(
    StackConfig { writeback_count: 0, ..StackConfig::default() },
    ConfigError::ZeroParameter { name: "writeback_count" }
)]
#[case::shallow_top(
    StackConfig { top_depth: 1, ..StackConfig::default() },
    ConfigError::DepthTooShallow { name: "top_depth", depth: 1 }
)]
#[case::shallow_mid(
    StackConfig { mid_depth: 0, ..StackConfig::default() },
    ConfigError::DepthTooShallow { name: "mid_depth", depth: 0 }
)]
fn test_invalid_config(#[case] config: StackConfig, #[case] expected: ConfigError) {
    assert_eq!(config.validate().unwrap_err(), expected.clone());
    assert_eq!(Ssia::new(&config).unwrap_err(), expected);
}

#[test]
fn test_extreme_widths_accepted() {
    let config = StackConfig {
        register_width: 64,
        tag_width: 32,
        top_depth: 2,
        mid_depth: 2,
        issue_width: 1,
        writeback_count: 1,
    };
    assert!(config.validate().is_ok());
    assert!(Ssia::new(&config).is_ok());
}

#[test]
fn test_tier_config_new() {
    let tier = TierConfig::new(16, 3, 2, 4, 2).unwrap();
    assert_eq!(tier.depth(), 3);
    assert_eq!(tier.issue_width(), 2);
    assert_eq!(tier.writeback_count(), 2);
    assert_eq!(tier.layout().max_tag(), 15);
    assert_eq!(
        TierConfig::new(16, 1, 2, 4, 2).unwrap_err(),
        ConfigError::DepthTooShallow { name: "depth", depth: 1 }
    );
}
