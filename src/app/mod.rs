// DexTracker - app/mod.rs
//
// Application layer: owned state, log loading, history persistence.
// Dependencies: core and platform layers.

pub mod history_store;
pub mod tracker;
