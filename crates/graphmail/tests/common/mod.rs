//! Shared test utilities for graphmail integration tests.
//!
//! This module provides:
//! - `TestHarness` with a local mock token endpoint and Graph API
//! - `RecordingStatus`, a status sink that keeps every update

pub mod harness;

#[allow(unused_imports)]
pub use harness::{RecordedRequest, RecordingStatus, TestHarness, TestHarnessBuilder};
