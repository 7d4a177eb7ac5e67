//! Generation layout configuration.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Deserialize;

use crate::domain::{StoragePosition, Timeline, TimelineRef};

/// Cursor rendering options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Digits used when rendering operator-supplied numeric offsets. Default: 18.
    pub offset_width: usize,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            offset_width: crate::domain::DEFAULT_OFFSET_WIDTH,
        }
    }
}

/// One retained generation of an event type.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineConfig {
    /// Event type this generation stores.
    pub event_type: String,
    /// Backing topic. Defaults to `<event_type>-<order>`.
    #[serde(default)]
    pub topic: Option<String>,
    /// Position in the event type's generation sequence.
    pub order: i32,
    /// Whether this is the current write target.
    #[serde(default)]
    pub active: bool,
    /// Final offset per partition. Ignored for the active generation.
    #[serde(default)]
    pub latest_position: BTreeMap<String, u64>,
}

impl TimelineConfig {
    pub fn to_timeline(&self) -> TimelineRef {
        let topic = self
            .topic
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.event_type, self.order));
        let timeline = if self.active {
            Timeline::active(&self.event_type, topic, self.order)
        } else {
            Timeline::closed(
                &self.event_type,
                topic,
                self.order,
                StoragePosition::new(self.latest_position.clone()),
            )
        };
        timeline.into_ref()
    }
}

/// Check the layout invariants: distinct orders and at most one active
/// generation per event type.
pub fn validate_layout(timelines: &[TimelineConfig]) -> Result<(), super::ConfigError> {
    let mut orders: HashMap<&str, HashSet<i32>> = HashMap::new();
    let mut active: HashMap<&str, i32> = HashMap::new();

    for timeline in timelines {
        if !orders
            .entry(timeline.event_type.as_str())
            .or_default()
            .insert(timeline.order)
        {
            return Err(super::ConfigError::DuplicateOrder {
                event_type: timeline.event_type.clone(),
                order: timeline.order,
            });
        }
        if timeline.active {
            if let Some(previous) = active.insert(timeline.event_type.as_str(), timeline.order) {
                return Err(super::ConfigError::MultipleActive {
                    event_type: timeline.event_type.clone(),
                    first: previous,
                    second: timeline.order,
                });
            }
        }
    }
    Ok(())
}
