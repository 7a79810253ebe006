// LogMixer - platform/mod.rs
//
// Platform abstraction layer: file access and configuration loading.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
