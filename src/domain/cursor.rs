//! Cursor types.
//!
//! A [`Cursor`] points at one real, resumable position: a partition offset
//! within a specific timeline. There is no "beginning" sentinel here; callers
//! resolve symbolic positions before building a cursor.

use std::cmp::Ordering;

use super::timeline::TimelineRef;

/// Length of every cursor version tag.
pub const VERSION_LENGTH: usize = 3;

/// Cursor encoding version.
///
/// The composite text layout is produced and parsed at the serialization
/// boundary; this type only carries the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    /// Raw offsets from before timelines existed, e.g. `000000000000000010`.
    Zero,
    /// Version-partition-offset layout, e.g. `001-0001-0000000000000001`.
    One,
}

impl Version {
    pub const ALL: [Version; 2] = [Version::Zero, Version::One];

    pub fn code(self) -> &'static str {
        match self {
            Version::Zero => "000",
            Version::One => "001",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.code() == code)
    }
}

/// Event type and partition a cursor belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventTypePartition {
    pub event_type: String,
    pub partition: String,
}

/// Storage topic and partition a cursor belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicPartition {
    pub topic: String,
    pub partition: String,
}

/// Position in one partition of one timeline.
///
/// Equality is structural over timeline, partition and offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor {
    timeline: TimelineRef,
    partition: String,
    offset: String,
}

impl Cursor {
    pub fn new(timeline: TimelineRef, partition: impl Into<String>, offset: impl Into<String>) -> Self {
        Self {
            timeline,
            partition: partition.into(),
            offset: offset.into(),
        }
    }

    pub fn timeline(&self) -> &TimelineRef {
        &self.timeline
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn offset(&self) -> &str {
        &self.offset
    }

    pub fn event_type(&self) -> &str {
        self.timeline.event_type()
    }

    pub fn topic(&self) -> &str {
        self.timeline.topic()
    }

    pub fn event_type_partition(&self) -> EventTypePartition {
        EventTypePartition {
            event_type: self.timeline.event_type().to_string(),
            partition: self.partition.clone(),
        }
    }

    pub fn topic_partition(&self) -> TopicPartition {
        TopicPartition {
            topic: self.timeline.topic().to_string(),
            partition: self.partition.clone(),
        }
    }

    /// Order two cursors by timeline order, then by offset text.
    ///
    /// Partition is not compared. Cursors from different partitions compare
    /// as if they shared one, so callers must only compare cursors of the same
    /// partition. This is why `Cursor` does not implement `Ord`.
    pub fn compare(&self, other: &Cursor) -> Ordering {
        self.timeline
            .order()
            .cmp(&other.timeline.order())
            .then_with(|| self.offset.cmp(&other.offset))
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cursor{{partition='{}', offset='{}', timeline='{}'}}",
            self.partition, self.offset, self.timeline
        )
    }
}

/// Cursor plus a signed relative shift, as sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShiftedCursor {
    cursor: Cursor,
    shift: i64,
}

impl ShiftedCursor {
    pub fn new(
        timeline: TimelineRef,
        partition: impl Into<String>,
        offset: impl Into<String>,
        shift: i64,
    ) -> Self {
        Self {
            cursor: Cursor::new(timeline, partition, offset),
            shift,
        }
    }

    pub fn from_cursor(cursor: Cursor, shift: i64) -> Self {
        Self { cursor, shift }
    }

    /// The base position, before the shift is applied.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn shift(&self) -> i64 {
        self.shift
    }
}

/// Request for the number of events from `initial` to `final`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceQuery {
    initial: Cursor,
    final_cursor: Cursor,
}

impl DistanceQuery {
    pub fn new(initial: Cursor, final_cursor: Cursor) -> Self {
        Self {
            initial,
            final_cursor,
        }
    }

    pub fn initial(&self) -> &Cursor {
        &self.initial
    }

    pub fn final_cursor(&self) -> &Cursor {
        &self.final_cursor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceResult {
    pub distance: u64,
}
