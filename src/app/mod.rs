// LogMixer - app/mod.rs
//
// Application layer: orchestrates core logic with platform file access.

pub mod merge;
