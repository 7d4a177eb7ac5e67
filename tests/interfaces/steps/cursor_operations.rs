//! CursorOperationsService step definitions.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use cucumber::{given, then, when, World};
use timeline_cursor::domain::StoragePosition;
use timeline_cursor::storage::InMemoryTimelineDirectory;
use timeline_cursor::{
    Cursor, CursorOperationError, CursorOperationsService, DistanceQuery, ShiftedCursor, Timeline,
    TimelineRef,
};

/// Generation declared by a scenario, not yet built.
#[derive(Debug, Default)]
struct Draft {
    active: bool,
    latest: BTreeMap<String, u64>,
}

/// Test context for cursor operation scenarios.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct CursorOperationsWorld {
    event_type: String,
    drafts: BTreeMap<i32, Draft>,
    purged: HashSet<i32>,
    timelines: HashMap<i32, TimelineRef>,
    last_distance: Option<u64>,
    last_cursor: Option<Cursor>,
    last_error: Option<CursorOperationError>,
}

impl CursorOperationsWorld {
    fn new() -> Self {
        Self {
            event_type: String::new(),
            drafts: BTreeMap::new(),
            purged: HashSet::new(),
            timelines: HashMap::new(),
            last_distance: None,
            last_cursor: None,
            last_error: None,
        }
    }

    /// Build the declared generations once and return a service over the
    /// ones still retained.
    async fn service(&mut self) -> CursorOperationsService {
        if self.timelines.is_empty() {
            for (order, draft) in &self.drafts {
                let topic = format!("{}-{}", self.event_type, order);
                let timeline = if draft.active {
                    Timeline::active(&self.event_type, topic, *order)
                } else {
                    Timeline::closed(
                        &self.event_type,
                        topic,
                        *order,
                        StoragePosition::new(draft.latest.clone()),
                    )
                };
                self.timelines.insert(*order, timeline.into_ref());
            }
        }

        let retained: Vec<TimelineRef> = self
            .timelines
            .iter()
            .filter(|(order, _)| !self.purged.contains(*order))
            .map(|(_, timeline)| timeline.clone())
            .collect();
        let directory = InMemoryTimelineDirectory::from_timelines(retained).await;
        CursorOperationsService::new(Arc::new(directory))
    }

    /// Timeline record for `order`. Orders never declared stand for
    /// generations the directory does not know about.
    fn timeline(&mut self, order: i32) -> TimelineRef {
        let event_type = self.event_type.clone();
        self.timelines
            .entry(order)
            .or_insert_with(|| {
                Timeline::active(&event_type, format!("{event_type}-{order}"), order).into_ref()
            })
            .clone()
    }

    async fn run_distance(&mut self, initial: (i32, String, String), final_cursor: (i32, String, String)) {
        let service = self.service().await;
        let initial = Cursor::new(self.timeline(initial.0), initial.1, initial.2);
        let final_cursor = Cursor::new(self.timeline(final_cursor.0), final_cursor.1, final_cursor.2);

        match service
            .calculate_distance(&DistanceQuery::new(initial, final_cursor))
            .await
        {
            Ok(result) => {
                self.last_distance = Some(result.distance);
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(e),
        }
    }
}

// --- Background ---

#[given(expr = "a timeline directory for event type {string}")]
fn given_directory(world: &mut CursorOperationsWorld, event_type: String) {
    world.event_type = event_type;
}

// --- Given steps ---

#[given(expr = "a closed timeline {int} with latest offset {int} in partition {string}")]
fn given_closed_timeline(
    world: &mut CursorOperationsWorld,
    order: i32,
    latest: u64,
    partition: String,
) {
    world
        .drafts
        .entry(order)
        .or_default()
        .latest
        .insert(partition, latest);
}

#[given(expr = "an active timeline {int}")]
fn given_active_timeline(world: &mut CursorOperationsWorld, order: i32) {
    world.drafts.entry(order).or_default().active = true;
}

#[given(expr = "timeline {int} has been purged")]
fn given_purged(world: &mut CursorOperationsWorld, order: i32) {
    world.purged.insert(order);
}

// --- When steps ---

#[when(
    expr = "I calculate the distance from {string} in timeline {int} to {string} in timeline {int} on partition {string}"
)]
async fn when_calculate_distance(
    world: &mut CursorOperationsWorld,
    initial_offset: String,
    initial_order: i32,
    final_offset: String,
    final_order: i32,
    partition: String,
) {
    world
        .run_distance(
            (initial_order, partition.clone(), initial_offset),
            (final_order, partition, final_offset),
        )
        .await;
}

#[when(
    expr = "I calculate the distance between partition {string} offset {string} and partition {string} offset {string} in timeline {int}"
)]
async fn when_calculate_distance_partitions(
    world: &mut CursorOperationsWorld,
    initial_partition: String,
    initial_offset: String,
    final_partition: String,
    final_offset: String,
    order: i32,
) {
    world
        .run_distance(
            (order, initial_partition, initial_offset),
            (order, final_partition, final_offset),
        )
        .await;
}

#[when(expr = "I unshift {string} in timeline {int} on partition {string} by {int}")]
async fn when_unshift(
    world: &mut CursorOperationsWorld,
    offset: String,
    order: i32,
    partition: String,
    shift: i64,
) {
    let service = world.service().await;
    let shifted = ShiftedCursor::new(world.timeline(order), partition, offset, shift);

    match service.unshift_cursor(&shifted).await {
        Ok(cursor) => {
            world.last_cursor = Some(cursor);
            world.last_error = None;
        }
        Err(e) => world.last_error = Some(e),
    }
}

// --- Then steps ---

#[then(expr = "the distance is {int}")]
fn then_distance_is(world: &mut CursorOperationsWorld, expected: u64) {
    assert!(
        world.last_error.is_none(),
        "Expected success but got {:?}",
        world.last_error
    );
    assert_eq!(world.last_distance, Some(expected));
}

#[then(expr = "the cursor is at {string} in timeline {int}")]
fn then_cursor_is_at(world: &mut CursorOperationsWorld, offset: String, order: i32) {
    assert!(
        world.last_error.is_none(),
        "Expected success but got {:?}",
        world.last_error
    );
    let cursor = world.last_cursor.as_ref().expect("No cursor produced");
    assert_eq!(cursor.offset(), offset);
    assert_eq!(cursor.timeline().order(), order);
}

#[then(expr = "the operation fails with {string}")]
fn then_fails_with(world: &mut CursorOperationsWorld, reason: String) {
    let error = world.last_error.as_ref().expect("Expected an error");
    assert_eq!(
        error.reason().map(|r| r.code()),
        Some(reason.as_str()),
        "Unexpected error: {}",
        error
    );
}
