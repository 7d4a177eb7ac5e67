//! Cursor services.

pub mod cursor_operations;

pub use cursor_operations::{
    CursorOperationError, CursorOperationsService, InvalidCursorOperation, Reason,
};
