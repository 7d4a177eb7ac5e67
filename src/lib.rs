//! Timeline-aware cursor arithmetic.
//!
//! Cursors point at positions in a per-event-type, per-partition log whose
//! storage may have been migrated across several generations (timelines).
//! This crate computes distances between cursors and resolves shifted
//! cursors, crossing generation boundaries transparently.

pub mod config;
pub mod domain;
pub mod interfaces;
pub mod services;
pub mod storage;
pub mod utils;

pub use domain::{Cursor, DistanceQuery, DistanceResult, ShiftedCursor, Timeline, TimelineRef};
pub use services::{CursorOperationError, CursorOperationsService, InvalidCursorOperation, Reason};
