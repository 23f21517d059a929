//! Test helpers shared across CogMyra crates.

pub mod memory;

pub use memory::{TempMemoryFile, seeded_store, texts};
