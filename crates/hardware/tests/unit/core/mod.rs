//! Core component tests.
