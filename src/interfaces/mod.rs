//! Abstract interfaces for external collaborators.
//!
//! These traits define the contracts for:
//! - Timeline directory (ordered, retained generations per event type)

pub mod timeline_directory;

pub use timeline_directory::{DirectoryError, TimelineDirectory};
