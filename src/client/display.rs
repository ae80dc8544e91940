//! Count Display State
//!
//! A display group holds one count and one visibility flag per status. Showing
//! a count makes only that status visible and arms a hide timer. Each group
//! has a single timer: arming it aborts the pending one, and a timer only
//! clears flags if no newer count was shown after it was armed.

use crate::types::AttendanceStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Per-status values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerStatus<T> {
    slots: [T; 3],
}

impl<T: Copy> PerStatus<T> {
    pub fn get(&self, status: AttendanceStatus) -> T {
        self.slots[status.index()]
    }

    pub fn set(&mut self, status: AttendanceStatus, value: T) {
        self.slots[status.index()] = value;
    }
}

/// Point-in-time view of a display group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplaySnapshot {
    pub counts: PerStatus<u64>,
    pub visible: PerStatus<bool>,
}

impl DisplaySnapshot {
    /// Counts whose flag is currently on, in status order
    pub fn visible_counts(&self) -> Vec<(AttendanceStatus, u64)> {
        AttendanceStatus::ALL
            .into_iter()
            .filter(|s| self.visible.get(*s))
            .map(|s| (s, self.counts.get(s)))
            .collect()
    }

    pub fn is_hidden(&self) -> bool {
        self.visible_counts().is_empty()
    }
}

#[derive(Default)]
struct GroupState {
    snapshot: DisplaySnapshot,
    generation: u64,
    pending_hide: Option<JoinHandle<()>>,
}

/// One group of counters with auto-hide
#[derive(Clone)]
pub struct DisplayGroup {
    name: &'static str,
    auto_hide: Duration,
    state: Arc<Mutex<GroupState>>,
}

impl DisplayGroup {
    pub fn new(name: &'static str, auto_hide: Duration) -> Self {
        Self {
            name,
            auto_hide,
            state: Arc::new(Mutex::new(GroupState::default())),
        }
    }

    /// Store `count` for `status`, show only that status and re-arm the hide timer
    ///
    /// Must be called from within a tokio runtime.
    pub async fn show(&self, status: AttendanceStatus, count: u64) {
        let mut state = self.state.lock().await;

        state.snapshot.counts.set(status, count);
        state.snapshot.visible = PerStatus::default();
        state.snapshot.visible.set(status, true);
        state.generation += 1;

        if let Some(pending) = state.pending_hide.take() {
            pending.abort();
        }

        let generation = state.generation;
        let group = Arc::clone(&self.state);
        let delay = self.auto_hide;
        let name = self.name;

        state.pending_hide = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = group.lock().await;
            if state.generation == generation {
                state.snapshot.visible = PerStatus::default();
                state.pending_hide = None;
                tracing::debug!(group = name, "Counts hidden");
            }
        }));

        tracing::debug!(group = self.name, status = %status, count, "Count shown");
    }

    pub async fn snapshot(&self) -> DisplaySnapshot {
        self.state.lock().await.snapshot
    }
}
