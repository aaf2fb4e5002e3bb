//! Property tests for Packsmith.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "never panics" and "every module is accounted for".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/versions.rs"]
mod versions;

#[path = "properties/registry.rs"]
mod registry;

#[path = "properties/resolution.rs"]
mod resolution;
