use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::error::SnapshotError;
use crate::manager::SnapshotManager;
use crate::registry::ScopeRegistry;
use crate::snapshot::{Scope, Snapshot};

/// Filtered, live view over the active scope's snapshots.
///
/// Follows at most one scope at a time. Activating a scope resolves its
/// manager from the registry, drops the previous scope's subscription before
/// taking the new one, and keeps the visible list refreshed from the
/// manager's change stream. Deactivation clears the visible list
/// immediately.
///
/// Scope switches are fenced by an activation generation: work belonging to
/// a superseded activation (a refresh still in flight, a listener that has
/// not yet observed its abort) can never clobber the state of a newer one.
///
/// Must be used within a tokio runtime; activation spawns the listener task.
pub struct SnapshotBrowser {
    registry: Arc<ScopeRegistry>,
    state: Arc<Mutex<BrowserState>>,
    generation: Arc<AtomicU64>,
}

#[derive(Default)]
struct BrowserState {
    scope: Option<Scope>,
    manager: Option<Arc<SnapshotManager>>,
    listener: Option<JoinHandle<()>>,
    filter: String,
    visible: Vec<Snapshot>,
    has_snapshots: bool,
}

impl SnapshotBrowser {
    pub fn new(registry: Arc<ScopeRegistry>) -> Self {
        SnapshotBrowser {
            registry,
            state: Arc::new(Mutex::new(BrowserState::default())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Make `scope` the active scope: unhook the previous scope's change
    /// stream, clear the visible list, then subscribe to the new scope's
    /// manager and populate the list from it.
    pub fn activate(&self, scope: &Scope) -> Result<(), SnapshotError> {
        debug!("activating snapshot browser for scope '{}'", scope);

        // Resolve before bumping the generation so a failed activation
        // leaves the previous scope's view untouched
        let manager = self.registry.manager_for(scope)?;
        let mut receiver = manager.subscribe();

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self
                .state
                .lock()
                .map_err(|_| SnapshotError::LockPoisoned("browser state"))?;
            if self.generation.load(Ordering::SeqCst) != generation {
                // A newer activation or deactivation won the race
                return Ok(());
            }
            if let Some(listener) = state.listener.take() {
                listener.abort();
            }
            state.visible.clear();
            state.has_snapshots = false;
            state.scope = Some(scope.clone());
            state.manager = Some(manager.clone());
            refresh_locked(&mut state)?;
        }

        let state = self.state.clone();
        let counter = self.generation.clone();
        let listener = tokio::spawn(async move {
            loop {
                let refresh_needed = match receiver.recv().await {
                    Ok(event) => {
                        debug!(
                            "snapshots changed in scope '{}', refreshing browser",
                            event.scope
                        );
                        true
                    }
                    // Fell behind the change stream; the store is the source
                    // of truth, so a single refresh catches up
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("browser lagged {} change event(s), refreshing", skipped);
                        true
                    }
                    Err(RecvError::Closed) => false,
                };
                if !refresh_needed {
                    break;
                }
                match refresh_if_current(&state, &counter, generation) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(err) => {
                        warn!("snapshot browser refresh failed: {}", err);
                        break;
                    }
                }
            }
        });

        let mut state = self
            .state
            .lock()
            .map_err(|_| SnapshotError::LockPoisoned("browser state"))?;
        if self.generation.load(Ordering::SeqCst) == generation {
            state.listener = Some(listener);
        } else {
            listener.abort();
        }
        Ok(())
    }

    /// Drop the active scope: unhook its change stream and clear the visible
    /// list immediately.
    pub fn deactivate(&self) -> Result<(), SnapshotError> {
        self.generation.fetch_add(1, Ordering::SeqCst);

        let mut state = self
            .state
            .lock()
            .map_err(|_| SnapshotError::LockPoisoned("browser state"))?;

        if let Some(scope) = &state.scope {
            debug!("deactivating snapshot browser for scope '{}'", scope);
        }

        if let Some(listener) = state.listener.take() {
            listener.abort();
        }
        state.scope = None;
        state.manager = None;
        state.visible.clear();
        state.has_snapshots = false;
        Ok(())
    }

    /// Set the title filter (case-insensitive substring) and re-filter the
    /// visible list.
    pub fn set_filter(&self, filter: impl Into<String>) -> Result<(), SnapshotError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| SnapshotError::LockPoisoned("browser state"))?;
        state.filter = filter.into();
        refresh_locked(&mut state)
    }

    pub fn filter(&self) -> Result<String, SnapshotError> {
        let state = self
            .state
            .lock()
            .map_err(|_| SnapshotError::LockPoisoned("browser state"))?;
        Ok(state.filter.clone())
    }

    /// The currently visible (filtered) snapshots.
    pub fn snapshots(&self) -> Result<Vec<Snapshot>, SnapshotError> {
        let state = self
            .state
            .lock()
            .map_err(|_| SnapshotError::LockPoisoned("browser state"))?;
        Ok(state.visible.clone())
    }

    /// Whether the active scope has any snapshots at all, ignoring the
    /// filter.
    pub fn has_snapshots(&self) -> Result<bool, SnapshotError> {
        let state = self
            .state
            .lock()
            .map_err(|_| SnapshotError::LockPoisoned("browser state"))?;
        Ok(state.has_snapshots)
    }

    pub fn active_scope(&self) -> Result<Option<Scope>, SnapshotError> {
        let state = self
            .state
            .lock()
            .map_err(|_| SnapshotError::LockPoisoned("browser state"))?;
        Ok(state.scope.clone())
    }

    /// The active scope's manager, for issuing commands against it.
    pub fn active_manager(&self) -> Result<Option<Arc<SnapshotManager>>, SnapshotError> {
        let state = self
            .state
            .lock()
            .map_err(|_| SnapshotError::LockPoisoned("browser state"))?;
        Ok(state.manager.clone())
    }
}

/// Refresh the visible list, but only if `generation` is still the current
/// activation. Returns false when the activation is stale.
fn refresh_if_current(
    state: &Arc<Mutex<BrowserState>>,
    counter: &AtomicU64,
    generation: u64,
) -> Result<bool, SnapshotError> {
    let mut state = state
        .lock()
        .map_err(|_| SnapshotError::LockPoisoned("browser state"))?;
    // Checked under the lock so a stale listener cannot interleave with a
    // newer activation's writes
    if counter.load(Ordering::SeqCst) != generation {
        return Ok(false);
    }
    refresh_locked(&mut state)?;
    Ok(true)
}

fn refresh_locked(state: &mut BrowserState) -> Result<(), SnapshotError> {
    let Some(manager) = state.manager.clone() else {
        state.visible.clear();
        state.has_snapshots = false;
        return Ok(());
    };

    let all = manager.snapshots()?;
    state.has_snapshots = !all.is_empty();

    let filter = state.filter.trim().to_string();
    state.visible = if filter.is_empty() {
        all
    } else {
        all.into_iter()
            .filter(|s| s.title_contains(&filter))
            .collect()
    };

    debug!(
        "browser refreshed for scope '{}', {} snapshot(s) visible",
        manager.scope(),
        state.visible.len()
    );
    Ok(())
}
