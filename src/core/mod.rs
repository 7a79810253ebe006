// LogMixer - core/mod.rs
//
// Core merge pipeline: recognise, segment, filter, aggregate, write.
// Must NOT depend on: platform or app.

pub mod aggregate;
pub mod discovery;
pub mod export;
pub mod filter;
pub mod model;
pub mod segment;
pub mod timestamp;
