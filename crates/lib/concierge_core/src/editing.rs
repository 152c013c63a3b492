//! Optimistic editing of a single field.
//!
//! ```text
//! Clean ──edit──▶ Editing ──save──▶ Saving ──ok──▶ Clean
//!                    ▲                 │
//!                    └──────edit───────┤
//!                                      └─err──▶ Reverting ──settle──▶ Clean
//! ```
//!
//! Every edit bumps a generation counter and cancels the save in flight, so
//! a stale save can never overwrite newer local state.

use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Clean,
    Editing,
    Saving,
    Reverting,
}

/// How a save attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Upstream accepted the value; it is now committed.
    Saved,
    /// Upstream rejected the value; the local value was restored.
    Reverted(String),
    /// A newer edit arrived before the save finished; its result was discarded.
    Superseded,
    /// There was no pending edit.
    NothingToSave,
}

/// Persists one field value upstream.
#[async_trait]
pub trait FieldSaver<T>: Send + Sync {
    type Error: Display + Send;

    /// Returns the value as stored upstream.
    async fn save(&self, value: T) -> Result<T, Self::Error>;
}

#[derive(Debug)]
struct Inner<T> {
    committed: T,
    local: T,
    state: FieldState,
    generation: u64,
    in_flight: Option<CancellationToken>,
    last_error: Option<String>,
}

/// Shared handle to one editable field.
#[derive(Debug)]
pub struct FieldEditor<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for FieldEditor<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> FieldEditor<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                committed: value.clone(),
                local: value,
                state: FieldState::Clean,
                generation: 0,
                in_flight: None,
                last_error: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Value shown locally.
    pub fn value(&self) -> T {
        self.lock().local.clone()
    }

    /// Last value confirmed upstream.
    pub fn committed(&self) -> T {
        self.lock().committed.clone()
    }

    pub fn state(&self) -> FieldState {
        self.lock().state
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    /// Apply a local edit, cancelling any save in flight.
    pub fn edit(&self, value: T) {
        let mut inner = self.lock();
        inner.generation += 1;
        if let Some(token) = inner.in_flight.take() {
            token.cancel();
        }
        inner.local = value;
        inner.state = FieldState::Editing;
        inner.last_error = None;
    }

    /// Save the pending edit.
    pub async fn save<S>(&self, saver: &S) -> SaveOutcome
    where
        S: FieldSaver<T> + ?Sized,
    {
        let (generation, value, token) = {
            let mut inner = self.lock();
            if inner.state != FieldState::Editing {
                return SaveOutcome::NothingToSave;
            }
            let token = CancellationToken::new();
            inner.state = FieldState::Saving;
            inner.in_flight = Some(token.clone());
            (inner.generation, inner.local.clone(), token)
        };

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => return SaveOutcome::Superseded,
            result = saver.save(value) => result,
        };

        let mut inner = self.lock();
        if inner.generation != generation {
            return SaveOutcome::Superseded;
        }
        inner.in_flight = None;
        match result {
            Ok(stored) => {
                inner.committed = stored.clone();
                inner.local = stored;
                inner.state = FieldState::Clean;
                SaveOutcome::Saved
            }
            Err(e) => {
                let message = e.to_string();
                inner.local = inner.committed.clone();
                inner.state = FieldState::Reverting;
                inner.last_error = Some(message.clone());
                SaveOutcome::Reverted(message)
            }
        }
    }

    /// Debounced save: wait `delay`, then save unless a newer edit arrived.
    pub async fn save_after<S>(&self, delay: Duration, saver: &S) -> SaveOutcome
    where
        S: FieldSaver<T> + ?Sized,
    {
        let generation = self.lock().generation;
        tokio::time::sleep(delay).await;
        if self.lock().generation != generation {
            return SaveOutcome::Superseded;
        }
        self.save(saver).await
    }

    /// Acknowledge a revert (after the UI has shown the error).
    pub fn settle(&self) {
        let mut inner = self.lock();
        if inner.state == FieldState::Reverting {
            inner.state = FieldState::Clean;
        }
    }
}
