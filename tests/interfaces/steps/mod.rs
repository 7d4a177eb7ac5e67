//! Cucumber step definitions for interface tests.

pub mod cursor_operations;
