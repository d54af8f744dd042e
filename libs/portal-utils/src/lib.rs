#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Shared runtime helpers.

pub mod periodic;

pub use periodic::{PeriodicTask, run_periodically};
