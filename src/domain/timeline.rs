//! Timeline (storage generation) records.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Final offsets recorded per partition when a timeline is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StoragePosition {
    offsets: BTreeMap<String, u64>,
}

impl StoragePosition {
    pub fn new(offsets: BTreeMap<String, u64>) -> Self {
        Self { offsets }
    }

    /// Final offset for `partition`, if the generation recorded one.
    pub fn offset_for(&self, partition: &str) -> Option<u64> {
        self.offsets.get(partition).copied()
    }
}

impl<P: Into<String>> FromIterator<(P, u64)> for StoragePosition {
    fn from_iter<I: IntoIterator<Item = (P, u64)>>(iter: I) -> Self {
        Self {
            offsets: iter.into_iter().map(|(p, o)| (p.into(), o)).collect(),
        }
    }
}

/// One generation of backing storage for an event type.
///
/// Timelines of the same event type are totally ordered by `order`. At most
/// one of them is active (the current write target); the others are closed
/// and carry the last offset written to each partition before the switch.
///
/// Records are immutable once built. Cursors share them through
/// [`TimelineRef`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timeline {
    id: Uuid,
    event_type: String,
    order: i32,
    topic: String,
    active: bool,
    latest_position: Option<StoragePosition>,
    created_at: DateTime<Utc>,
    cleanup_at: Option<DateTime<Utc>>,
}

/// Shared, read-only handle to a timeline record.
pub type TimelineRef = Arc<Timeline>;

impl Timeline {
    /// Build the active generation of `event_type`.
    pub fn active(event_type: impl Into<String>, topic: impl Into<String>, order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: event_type.into(),
            order,
            topic: topic.into(),
            active: true,
            latest_position: None,
            created_at: Utc::now(),
            cleanup_at: None,
        }
    }

    /// Build a closed generation with its final per-partition offsets.
    pub fn closed(
        event_type: impl Into<String>,
        topic: impl Into<String>,
        order: i32,
        latest_position: StoragePosition,
    ) -> Self {
        Self {
            active: false,
            latest_position: Some(latest_position),
            ..Self::active(event_type, topic, order)
        }
    }

    /// Set the instant after which a retention policy may purge this generation.
    pub fn with_cleanup_at(mut self, cleanup_at: DateTime<Utc>) -> Self {
        self.cleanup_at = Some(cleanup_at);
        self
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn into_ref(self) -> TimelineRef {
        Arc::new(self)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Per-partition final offsets. Only meaningful for closed timelines.
    pub fn latest_position(&self) -> Option<&StoragePosition> {
        self.latest_position.as_ref()
    }

    /// Final offset of `partition` in this generation.
    ///
    /// Returns `None` for active timelines and for partitions the generation
    /// never recorded.
    pub fn latest_offset(&self, partition: &str) -> Option<u64> {
        if self.active {
            return None;
        }
        self.latest_position
            .as_ref()
            .and_then(|position| position.offset_for(partition))
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn cleanup_at(&self) -> Option<DateTime<Utc>> {
        self.cleanup_at
    }
}

impl std::fmt::Display for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Timeline{{event_type='{}', order={}, topic='{}', active={}}}",
            self.event_type, self.order, self.topic, self.active
        )
    }
}
