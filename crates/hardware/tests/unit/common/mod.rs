//! Common component tests.
//!
//! This module contains unit tests for the slot types and the error enum
//! shared by every stack component.

/// Unit tests for error messages and command decoding failures.
pub mod error;
