//! Process plumbing shared by the binary and library users.

pub mod bootstrap;
pub mod shutdown_hooks;

pub use shutdown_hooks::{HookHandle, ShutdownHooks};
