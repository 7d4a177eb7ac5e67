//! Timeline directory implementations.

pub mod memory;

pub use memory::InMemoryTimelineDirectory;
