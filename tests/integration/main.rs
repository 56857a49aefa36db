//! MedTrack Integration Tests
//!
//! End-to-end tests through the `MedTrack` facade against real files in a
//! temp directory.

#[path = "../common/mod.rs"]
mod common;

mod catalog;
mod config;
mod filter;
mod properties;
mod results;
