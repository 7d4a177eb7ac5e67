//! Value types shared by cursor operations.

pub mod cursor;
pub mod offset;
pub mod resource;
pub mod timeline;

pub use cursor::{
    Cursor, DistanceQuery, DistanceResult, EventTypePartition, ShiftedCursor, TopicPartition,
    Version, VERSION_LENGTH,
};
pub use offset::{format_offset, parse_offset, MalformedOffset, DEFAULT_OFFSET_WIDTH};
pub use resource::{AuthorizationAttribute, EventTypeResource, Operation, Resource};
pub use timeline::{StoragePosition, Timeline, TimelineRef};
