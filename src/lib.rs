//! ffmovie - movie metadata and frame grabbing tool
//!
//! This library crate exposes the configuration layer and the probe facade
//! for the binary and for integration testing.

pub mod config;
pub mod probe;
