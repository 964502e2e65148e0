//! Readiness gating for backends that finish setup asynchronously.
//!
//! A [`Readiness`] starts out [`ReadinessState::Initializing`] and moves to
//! [`ReadinessState::Ready`] exactly once, when the background setup task
//! hands over the resource it produced (a loaded dataset, a collection
//! handle). Request paths call [`Readiness::get`], which never blocks;
//! [`Readiness::wait`] polls and is meant for test setup and tooling.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;

use crate::error::{StoreError, StoreResult};

/// Interval between readiness polls in [`Readiness::wait`].
pub const READINESS_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    Initializing,
    Ready,
}

/// Shared slot for a resource produced by a background setup task.
#[derive(Debug)]
pub struct Readiness<T> {
    cell: Arc<OnceCell<T>>,
}

impl<T> Clone for Readiness<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> Default for Readiness<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Readiness<T> {
    /// A slot in the `Initializing` state.
    pub fn new() -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// A slot that is already `Ready` with `value`.
    pub fn ready(value: T) -> Self {
        Self {
            cell: Arc::new(OnceCell::new_with(Some(value))),
        }
    }

    pub fn state(&self) -> ReadinessState {
        if self.cell.initialized() {
            ReadinessState::Ready
        } else {
            ReadinessState::Initializing
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == ReadinessState::Ready
    }

    /// Flip to `Ready`. Returns `false` if the slot was already filled.
    pub fn mark_ready(&self, value: T) -> bool {
        self.cell.set(value).is_ok()
    }

    /// Borrow the resource, or fail with [`StoreError::NotReady`].
    pub fn get(&self) -> StoreResult<&T> {
        self.cell.get().ok_or(StoreError::NotReady)
    }

    /// Poll every [`READINESS_POLL_INTERVAL`] until the slot is `Ready`.
    pub async fn wait(&self) {
        while !self.is_ready() {
            tokio::time::sleep(READINESS_POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn starts_initializing() {
        let readiness: Readiness<u32> = Readiness::new();
        assert_eq!(readiness.state(), ReadinessState::Initializing);
        assert_matches!(readiness.get(), Err(StoreError::NotReady));
    }

    #[test]
    fn mark_ready_happens_once() {
        let readiness = Readiness::new();
        assert!(readiness.mark_ready(1));
        assert!(!readiness.mark_ready(2));
        assert_eq!(readiness.get(), Ok(&1));
    }

    #[test]
    fn clones_share_state() {
        let readiness = Readiness::new();
        let handle = readiness.clone();
        handle.mark_ready("collection");
        assert!(readiness.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_returns_after_background_task_finishes() {
        let readiness = Readiness::new();
        let handle = readiness.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            handle.mark_ready(vec![1, 2, 3]);
        });

        readiness.wait().await;
        assert_eq!(readiness.get().map(Vec::len), Ok(3));
    }
}
