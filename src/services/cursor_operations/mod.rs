//! Cursor arithmetic across timeline generations.
//!
//! Computes event distances between cursors and resolves shifted cursors to
//! real positions. Both operations may cross generation boundaries: a closed
//! generation contributes its recorded final offset for the partition, the
//! active generation is open-ended.
//!
//! Every call works against one snapshot of the directory's ordered timeline
//! list, fetched at most once and only when a generation boundary is
//! involved. Concurrent migrations do not affect a call in flight.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{
    format_offset, parse_offset, Cursor, DistanceQuery, DistanceResult, MalformedOffset,
    ShiftedCursor, TimelineRef,
};
use crate::interfaces::{DirectoryError, TimelineDirectory};


/// Result type for cursor operations.
pub type Result<T> = std::result::Result<T, CursorOperationError>;

/// Why a cursor operation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    CursorsWithDifferentPartition,
    InvertedTimelineOrder,
    InvertedOffsetOrder,
    TimelineNotFound,
    PartitionNotFound,
}

impl Reason {
    pub fn code(self) -> &'static str {
        match self {
            Reason::CursorsWithDifferentPartition => "CURSORS_WITH_DIFFERENT_PARTITION",
            Reason::InvertedTimelineOrder => "INVERTED_TIMELINE_ORDER",
            Reason::InvertedOffsetOrder => "INVERTED_OFFSET_ORDER",
            Reason::TimelineNotFound => "TIMELINE_NOT_FOUND",
            Reason::PartitionNotFound => "PARTITION_NOT_FOUND",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Validation failure carrying one reason code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid cursor operation: {reason}")]
pub struct InvalidCursorOperation {
    reason: Reason,
}

impl InvalidCursorOperation {
    pub fn new(reason: Reason) -> Self {
        Self { reason }
    }

    pub fn reason(&self) -> Reason {
        self.reason
    }
}

/// Errors returned by [`CursorOperationsService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorOperationError {
    #[error(transparent)]
    Invalid(#[from] InvalidCursorOperation),

    /// Directory failures, passed through unchanged.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    MalformedOffset(#[from] MalformedOffset),

    #[error("Offset {offset} is past the end of timeline {order} (latest {latest})")]
    OffsetOutOfRange { order: i32, offset: u64, latest: u64 },

    #[error("Offset arithmetic overflowed")]
    Overflow,
}

impl CursorOperationError {
    /// Reason code, for validation failures only.
    pub fn reason(&self) -> Option<Reason> {
        match self {
            CursorOperationError::Invalid(e) => Some(e.reason()),
            _ => None,
        }
    }
}

fn invalid(reason: Reason, cursor: &Cursor) -> CursorOperationError {
    warn!(
        event_type = %cursor.event_type(),
        partition = %cursor.partition(),
        reason = %reason,
        "Rejected cursor operation"
    );
    InvalidCursorOperation::new(reason).into()
}

/// Stateless cursor arithmetic over the timelines of a directory.
#[derive(Clone)]
pub struct CursorOperationsService {
    directory: Arc<dyn TimelineDirectory>,
}

impl CursorOperationsService {
    pub fn new(directory: Arc<dyn TimelineDirectory>) -> Self {
        Self { directory }
    }

    /// Number of events from `query.initial()` to `query.final_cursor()`.
    ///
    /// Both cursors must share a partition and the final one must not precede
    /// the initial one. Across generations the distance is the rest of the
    /// initial generation, plus every generation strictly in between, plus
    /// the final offset.
    pub async fn calculate_distance(&self, query: &DistanceQuery) -> Result<DistanceResult> {
        let initial = query.initial();
        let final_cursor = query.final_cursor();

        if initial.partition() != final_cursor.partition() {
            return Err(invalid(Reason::CursorsWithDifferentPartition, initial));
        }
        let initial_order = initial.timeline().order();
        let final_order = final_cursor.timeline().order();
        if final_order < initial_order {
            return Err(invalid(Reason::InvertedTimelineOrder, initial));
        }

        let initial_offset = parse_offset(initial.offset())?;
        let final_offset = parse_offset(final_cursor.offset())?;

        if initial_order == final_order {
            if final_offset < initial_offset {
                return Err(invalid(Reason::InvertedOffsetOrder, initial));
            }
            ensure_within_timeline(initial, initial_offset)?;
            ensure_within_timeline(final_cursor, final_offset)?;
            debug!(
                event_type = %initial.event_type(),
                partition = %initial.partition(),
                "Distance within one timeline"
            );
            return Ok(DistanceResult {
                distance: final_offset - initial_offset,
            });
        }

        let timelines = self.fetch_timelines(initial).await?;
        match (timelines.first(), timelines.last()) {
            (Some(oldest), Some(newest))
                if initial_order >= oldest.order() && final_order <= newest.order() => {}
            _ => return Err(invalid(Reason::TimelineNotFound, initial)),
        }

        let partition = initial.partition();
        let initial_latest = latest_offset(initial.timeline(), initial)?;
        ensure_within_timeline(initial, initial_offset)?;
        ensure_within_timeline(final_cursor, final_offset)?;
        let mut distance = initial_latest - initial_offset;

        for timeline in timelines
            .iter()
            .filter(|t| t.order() > initial_order && t.order() < final_order)
        {
            let events = latest_offset(timeline, initial)?;
            distance = distance
                .checked_add(events)
                .ok_or(CursorOperationError::Overflow)?;
        }
        distance = distance
            .checked_add(final_offset)
            .ok_or(CursorOperationError::Overflow)?;

        debug!(
            event_type = %initial.event_type(),
            partition = %partition,
            from_order = initial_order,
            to_order = final_order,
            distance,
            "Distance across timelines"
        );
        Ok(DistanceResult { distance })
    }

    /// Resolve a shifted cursor to the real position it designates.
    ///
    /// The shift walks forward into later generations or backward into
    /// earlier ones as needed. The resulting offset is rendered with the same
    /// width as the base offset.
    pub async fn unshift_cursor(&self, shifted: &ShiftedCursor) -> Result<Cursor> {
        let base = shifted.cursor();
        let offset = parse_offset(base.offset())?;
        ensure_within_timeline(base, offset)?;

        match shifted.shift() {
            0 => Ok(base.clone()),
            shift if shift > 0 => self.move_forward(base, offset, shift.unsigned_abs()).await,
            shift => self.move_backward(base, offset, shift.unsigned_abs()).await,
        }
    }

    async fn move_forward(&self, base: &Cursor, offset: u64, shift: u64) -> Result<Cursor> {
        let mut timeline = base.timeline().clone();
        let mut reference = offset;
        let mut remaining = shift;
        let mut snapshot: Option<Vec<TimelineRef>> = None;

        loop {
            if timeline.is_active() {
                let target = reference
                    .checked_add(remaining)
                    .ok_or(CursorOperationError::Overflow)?;
                return Ok(rebase(base, timeline, target));
            }

            // The base offset was range-checked; later timelines start at 0.
            let room = latest_offset(&timeline, base)? - reference;
            if remaining <= room {
                return Ok(rebase(base, timeline, reference + remaining));
            }
            remaining -= room;

            if snapshot.is_none() {
                snapshot = Some(self.fetch_timelines(base).await?);
            }
            let timelines = snapshot.as_deref().unwrap_or_default();
            let current_order = timeline.order();
            timeline = match timelines.iter().find(|t| t.order() > current_order) {
                Some(next) => next.clone(),
                None => return Err(invalid(Reason::TimelineNotFound, base)),
            };
            reference = 0;
            debug!(
                partition = %base.partition(),
                from_order = current_order,
                to_order = timeline.order(),
                remaining,
                "Shift crossed into next timeline"
            );
        }
    }

    async fn move_backward(&self, base: &Cursor, offset: u64, shift: u64) -> Result<Cursor> {
        let mut timeline = base.timeline().clone();
        let mut reference = offset;
        let mut remaining = shift;
        let mut snapshot: Option<Vec<TimelineRef>> = None;

        loop {
            if reference >= remaining {
                return Ok(rebase(base, timeline, reference - remaining));
            }
            remaining -= reference;

            if snapshot.is_none() {
                snapshot = Some(self.fetch_timelines(base).await?);
            }
            let timelines = snapshot.as_deref().unwrap_or_default();
            let current_order = timeline.order();
            timeline = match timelines.iter().rev().find(|t| t.order() < current_order) {
                Some(previous) => previous.clone(),
                None => return Err(invalid(Reason::TimelineNotFound, base)),
            };
            reference = latest_offset(&timeline, base)?;
            debug!(
                partition = %base.partition(),
                from_order = current_order,
                to_order = timeline.order(),
                remaining,
                "Shift crossed into previous timeline"
            );
        }
    }

    async fn fetch_timelines(&self, cursor: &Cursor) -> Result<Vec<TimelineRef>> {
        Ok(self
            .directory
            .get_active_timelines_ordered(cursor.event_type())
            .await?)
    }
}

/// Final offset of the cursor's partition in `timeline`.
fn latest_offset(timeline: &TimelineRef, cursor: &Cursor) -> Result<u64> {
    timeline
        .latest_offset(cursor.partition())
        .ok_or_else(|| invalid(Reason::PartitionNotFound, cursor))
}

/// Reject offsets past the end of a closed timeline. Active timelines are
/// open ended.
fn ensure_within_timeline(cursor: &Cursor, offset: u64) -> Result<()> {
    let timeline = cursor.timeline();
    if timeline.is_active() {
        return Ok(());
    }
    let latest = latest_offset(timeline, cursor)?;
    if offset > latest {
        warn!(
            event_type = %cursor.event_type(),
            partition = %cursor.partition(),
            order = timeline.order(),
            offset,
            latest,
            "Cursor offset past end of closed timeline"
        );
        return Err(CursorOperationError::OffsetOutOfRange {
            order: timeline.order(),
            offset,
            latest,
        });
    }
    Ok(())
}

fn rebase(base: &Cursor, timeline: TimelineRef, offset: u64) -> Cursor {
    Cursor::new(
        timeline,
        base.partition(),
        format_offset(offset, base.offset().len()),
    )
}
