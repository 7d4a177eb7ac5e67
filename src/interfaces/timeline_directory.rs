//! Timeline directory interface.

use async_trait::async_trait;

use crate::domain::TimelineRef;

/// Result type for directory lookups.
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Errors raised by the directory collaborator.
///
/// Cursor operations pass these through untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("Event type not found: {0}")]
    NoSuchEventType(String),

    #[error("Timeline directory failure: {0}")]
    Internal(String),
}

/// Source of the live generations of each event type.
///
/// Implementations:
/// - `InMemoryTimelineDirectory`: retained generations held in memory
#[async_trait]
pub trait TimelineDirectory: Send + Sync {
    /// Currently retained timelines of `event_type`, ascending by order.
    ///
    /// Purged generations are absent. The returned list is a snapshot; later
    /// migrations do not affect it.
    async fn get_active_timelines_ordered(&self, event_type: &str) -> Result<Vec<TimelineRef>>;
}
