//! Screen-state building blocks shared by every controller.
//!
//! A `Tracked<T>` is one piece of fetched state (a list, a results panel) with
//! its `idle → loading → ready | error` phase and a generation counter. Each
//! fetch takes a `Ticket` when it starts. A response is written only if no
//! fetch started after it has already written one, so the highest-numbered
//! completed fetch is what the screen shows. Nothing is written once the
//! screen has been unmounted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::WorkflowError;

#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Idle,
    Loading,
    Ready(T),
    Error(WorkflowError),
}

impl<T> Phase<T> {
    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Phase::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Proof that a fetch was started, carrying its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// What happened to a response handed to [`Tracked::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// A newer fetch had already completed; the response was dropped.
    Stale,
    /// The screen was torn down while the call was in flight.
    Unmounted,
}

struct TrackedState<T> {
    phase: Phase<T>,
    started: u64,
    applied: u64,
    mounted: bool,
}

pub struct Tracked<T> {
    name: &'static str,
    state: Mutex<TrackedState<T>>,
}

impl<T: Clone> Tracked<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(TrackedState {
                phase: Phase::Idle,
                started: 0,
                applied: 0,
                mounted: true,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TrackedState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a fetch: bumps the generation and moves to `Loading`.
    pub fn begin(&self) -> Ticket {
        let mut state = self.lock();
        state.started += 1;
        if state.mounted {
            state.phase = Phase::Loading;
        }
        Ticket {
            generation: state.started,
        }
    }

    /// Writes a fetch's outcome unless a newer fetch has already written one.
    pub fn finish(&self, ticket: Ticket, result: Result<T, WorkflowError>) -> Applied {
        let mut state = self.lock();
        if !state.mounted {
            debug!(state = self.name, "Response arrived after unmount, discarded");
            return Applied::Unmounted;
        }
        if ticket.generation <= state.applied {
            debug!(
                state = self.name,
                generation = ticket.generation,
                applied = state.applied,
                "Stale response discarded"
            );
            return Applied::Stale;
        }
        state.applied = ticket.generation;
        state.phase = match result {
            Ok(value) => Phase::Ready(value),
            Err(err) => Phase::Error(err),
        };
        Applied::Applied
    }

    /// Back to `Idle`; responses to fetches already started are discarded.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.applied = state.started;
        if state.mounted {
            state.phase = Phase::Idle;
        }
    }

    pub fn snapshot(&self) -> Phase<T> {
        self.lock().phase.clone()
    }

    pub fn unmount(&self) {
        self.lock().mounted = false;
    }
}

/// User-facing feedback attached to a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Rejected locally, nothing was sent.
    Validation {
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<&'static str>,
        message: String,
    },
    Transport { message: String },
    /// Mixed upload outcomes.
    Partial { message: String },
    Success { message: String },
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice::Success {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Validation { message, .. }
            | Notice::Transport { message }
            | Notice::Partial { message }
            | Notice::Success { message } => message,
        }
    }
}

impl From<WorkflowError> for Notice {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation { field, message } => Notice::Validation { field, message },
            transport @ WorkflowError::Transport(_) => Notice::Transport {
                message: transport.to_string(),
            },
        }
    }
}

/// Identity and lifetime of one mounted screen, plus its notice slot.
pub struct Mount {
    id: Uuid,
    mounted: AtomicBool,
    notice: Mutex<Option<Notice>>,
}

impl Mount {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            mounted: AtomicBool::new(true),
            notice: Mutex::new(None),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    /// Replaces the current notice. Ignored once unmounted.
    pub fn notify(&self, notice: impl Into<Notice>) {
        if self.is_mounted() {
            let notice = notice.into();
            debug!(mount_id = %self.id, notice = notice.message(), "Notice set");
            *self.notice.lock().unwrap_or_else(PoisonError::into_inner) = Some(notice);
        }
    }

    pub fn clear_notice(&self) {
        *self.notice.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for Mount {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-flight guard over an `AtomicBool`; the flag is released on drop.
pub struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    pub fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
