//! Process-wide shutdown hook registry.
//!
//! Hooks are plain callbacks registered by components that hold resources
//! needing cleanup. When the process terminates, every registered hook runs
//! at most once, even if termination is signalled more than once.

use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::{debug, info, warn};
use uuid::Uuid;

type Hook = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    hooks: Mutex<HashMap<Uuid, (String, Hook)>>,
    done: Mutex<HashSet<Uuid>>,
}

impl Registry {
    /// Mark `id` as run. Returns false if it already was.
    fn claim(&self, id: Uuid) -> bool {
        self.done
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id)
    }
}

/// Registry of callbacks to run on process shutdown.
#[derive(Clone, Default)]
pub struct ShutdownHooks {
    inner: Arc<Registry>,
}

/// Handle returned by [`ShutdownHooks::add_hook`].
#[derive(Clone)]
pub struct HookHandle {
    id: Uuid,
    registry: Arc<Registry>,
}

impl HookHandle {
    /// Remove the hook. It will not run on shutdown.
    pub fn unregister(self) {
        let removed = self
            .registry
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
        if let Some((name, _)) = removed {
            debug!(hook = %name, "Unregistered shutdown hook");
        }
    }
}

impl ShutdownHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process.
    pub fn global() -> &'static ShutdownHooks {
        static GLOBAL: OnceLock<ShutdownHooks> = OnceLock::new();
        GLOBAL.get_or_init(ShutdownHooks::new)
    }

    /// Register `hook` under a descriptive `name` used in logs.
    pub fn add_hook<F>(&self, name: impl Into<String>, hook: F) -> HookHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        self.inner
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, (name.into(), Arc::new(hook)));
        HookHandle {
            id,
            registry: Arc::clone(&self.inner),
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every registered hook that has not run yet.
    ///
    /// A panicking hook is logged and does not prevent the others from
    /// running. Returns the number of hooks run by this call.
    pub fn run_all(&self) -> usize {
        let hooks: Vec<(Uuid, String, Hook)> = self
            .inner
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, (name, hook))| (*id, name.clone(), Arc::clone(hook)))
            .collect();

        let mut ran = 0;
        for (id, name, hook) in hooks {
            if !self.inner.claim(id) {
                continue;
            }
            ran += 1;
            if panic::catch_unwind(AssertUnwindSafe(|| hook())).is_err() {
                warn!(hook = %name, "Failed to call shutdown hook");
            }
        }
        ran
    }

    /// Wait for Ctrl-C, then run all hooks.
    pub async fn run_on_ctrl_c(&self) -> std::io::Result<()> {
        tokio::signal::ctrl_c().await?;
        info!("Shutdown signal received");
        let ran = self.run_all();
        info!(hooks = ran, "Shutdown hooks completed");
        Ok(())
    }
}
