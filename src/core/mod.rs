// DexTracker - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library, serde, indexmap, regex, csv.
// Must NOT depend on: platform, app, or the filesystem directly.

pub mod display;
pub mod export;
pub mod filter;
pub mod lookup;
pub mod model;
pub mod parser;
pub mod stats;
