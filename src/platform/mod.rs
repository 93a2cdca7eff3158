// DexTracker - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: standard library, directories crate, toml.
// Must NOT depend on: core, app.

pub mod config;
pub mod fs;
