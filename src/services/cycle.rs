use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::ApiError;

/// Liveness token for one view load cycle.
///
/// A cycle fetches, normalizes and enriches, then commits its result. If the
/// view went away in the meantime (the request was dropped or a newer cycle
/// replaced this one) the commit fails and the result is discarded.
#[derive(Debug, Clone, Default)]
pub struct LoadCycle {
    cancelled: Arc<AtomicBool>,
}

impl LoadCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        !self.cancelled.load(Ordering::SeqCst)
    }

    pub fn commit<T>(&self, value: T) -> Result<T, ApiError> {
        if self.is_live() {
            Ok(value)
        } else {
            tracing::debug!("discarding result of abandoned load cycle");
            Err(ApiError::Cancelled)
        }
    }

    /// Cancels the cycle when dropped, unless disarmed.
    pub fn guard(&self) -> CycleGuard {
        CycleGuard {
            cycle: self.clone(),
            armed: true,
        }
    }
}

pub struct CycleGuard {
    cycle: LoadCycle,
    armed: bool,
}

impl CycleGuard {
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        if self.armed {
            self.cycle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_cycle_commits() {
        let cycle = LoadCycle::new();
        assert_eq!(cycle.commit(5).unwrap(), 5);
    }

    #[test]
    fn test_cancelled_cycle_discards() {
        let cycle = LoadCycle::new();
        let view = cycle.clone();
        view.cancel();
        assert!(!cycle.is_live());
        assert_eq!(cycle.commit("stale"), Err(ApiError::Cancelled));
    }

    #[test]
    fn test_dropped_guard_cancels() {
        let cycle = LoadCycle::new();
        drop(cycle.guard());
        assert!(!cycle.is_live());

        let cycle = LoadCycle::new();
        cycle.guard().disarm();
        assert!(cycle.is_live());
    }

    #[tokio::test]
    async fn test_abandoned_request_never_commits() {
        let cycle = LoadCycle::new();
        let worker = cycle.clone();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let _ = rx.await;
            worker.commit(vec![1, 2, 3])
        });

        // The view goes away before the backend answered.
        drop(cycle.guard());
        let _ = tx.send(());

        assert_eq!(task.await.unwrap(), Err(ApiError::Cancelled));
    }
}
