//! In-memory timeline directory.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::TimelineRef;
use crate::interfaces::timeline_directory::{DirectoryError, Result, TimelineDirectory};

/// Directory that keeps retained generations in memory.
///
/// Timelines are kept sorted by order per event type. Inserting a timeline
/// whose order already exists replaces the previous record.
#[derive(Default)]
pub struct InMemoryTimelineDirectory {
    timelines: RwLock<HashMap<String, Vec<TimelineRef>>>,
    fail_on_get: RwLock<Option<String>>,
}

impl InMemoryTimelineDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn from_timelines(timelines: impl IntoIterator<Item = TimelineRef>) -> Self {
        let directory = Self::new();
        for timeline in timelines {
            directory.insert(timeline).await;
        }
        directory
    }

    pub async fn insert(&self, timeline: TimelineRef) {
        let mut store = self.timelines.write().await;
        let entries = store.entry(timeline.event_type().to_string()).or_default();
        match entries.binary_search_by_key(&timeline.order(), |t| t.order()) {
            Ok(idx) => entries[idx] = timeline,
            Err(idx) => entries.insert(idx, timeline),
        }
    }

    /// Drop a generation, as a retention policy would after `cleanup_at`.
    ///
    /// Returns the removed record if it was present.
    pub async fn purge(&self, event_type: &str, order: i32) -> Option<TimelineRef> {
        let mut store = self.timelines.write().await;
        let entries = store.get_mut(event_type)?;
        let idx = entries.iter().position(|t| t.order() == order)?;
        let removed = entries.remove(idx);
        debug!(event_type, order, "Purged timeline");
        Some(removed)
    }

    /// Make every subsequent lookup fail with [`DirectoryError::Internal`].
    pub async fn set_fail_on_get(&self, message: Option<String>) {
        *self.fail_on_get.write().await = message;
    }
}

#[async_trait]
impl TimelineDirectory for InMemoryTimelineDirectory {
    async fn get_active_timelines_ordered(&self, event_type: &str) -> Result<Vec<TimelineRef>> {
        if let Some(message) = self.fail_on_get.read().await.clone() {
            return Err(DirectoryError::Internal(message));
        }
        self.timelines
            .read()
            .await
            .get(event_type)
            .cloned()
            .ok_or_else(|| DirectoryError::NoSuchEventType(event_type.to_string()))
    }
}
