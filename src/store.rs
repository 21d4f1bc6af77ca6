use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{info, warn};

use crate::catalog::{Font, Theme};
use crate::engine::{self, Action, Outcome};
use crate::models::UserState;
use crate::storage::{Storage, StorageError};

/// Owns the live `UserState` and writes it back after every applied action.
pub struct Store {
    state: UserState,
    storage: Option<Storage>,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let storage = Storage::open(path)?;
        storage.init()?;
        let state = storage.load();
        info!(
            sessions = state.sessions.len(),
            revisions = state.revisions.len(),
            ink = state.ink_points,
            "state loaded"
        );
        Ok(Self {
            state,
            storage: Some(storage),
        })
    }

    /// A store that never touches disk.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::with_state(UserState::default())
    }

    #[cfg(test)]
    pub fn with_state(state: UserState) -> Self {
        Self {
            state,
            storage: None,
        }
    }

    pub fn state(&self) -> &UserState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, StorageError> {
        self.dispatch_at(action, Utc::now())
    }

    /// Applies `action` as of `now`, then persists if anything changed.
    ///
    /// A failed save is returned but the in-memory transition stands.
    pub fn dispatch_at(
        &mut self,
        action: Action,
        now: DateTime<Utc>,
    ) -> Result<Outcome, StorageError> {
        let outcome = engine::reduce(&mut self.state, action, now);
        if outcome.is_applied() {
            if let Some(storage) = &self.storage {
                if let Err(e) = storage.save(&self.state) {
                    warn!(error = %e, "failed to persist state");
                    return Err(e);
                }
            }
        }
        Ok(outcome)
    }

    pub fn current_theme(&self) -> &'static Theme {
        engine::current_theme(&self.state)
    }

    pub fn current_font(&self) -> &'static Font {
        engine::current_font(&self.state)
    }
}
