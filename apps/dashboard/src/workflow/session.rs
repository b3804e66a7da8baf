use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::candidates::CandidatesController;
use super::dashboard::DashboardController;
use super::jobs::JobsController;
use super::matching::MatchingController;
use crate::coordinators::Coordinators;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    Dashboard,
    Candidates,
    Jobs,
    Matching,
}

/// The mounted screen and its controller.
#[derive(Clone)]
pub enum ActiveScreen {
    Dashboard(Arc<DashboardController>),
    Candidates(Arc<CandidatesController>),
    Jobs(Arc<JobsController>),
    Matching(Arc<MatchingController>),
}

impl ActiveScreen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Self::Dashboard(_) => ScreenKind::Dashboard,
            Self::Candidates(_) => ScreenKind::Candidates,
            Self::Jobs(_) => ScreenKind::Jobs,
            Self::Matching(_) => ScreenKind::Matching,
        }
    }

    fn unmount(&self) {
        match self {
            Self::Dashboard(c) => c.unmount(),
            Self::Candidates(c) => c.unmount(),
            Self::Jobs(c) => c.unmount(),
            Self::Matching(c) => c.unmount(),
        }
    }
}

/// One user's dashboard: exactly one screen is mounted at a time and nothing
/// survives navigation.
pub struct DashboardSession {
    coordinators: Coordinators,
    current: Mutex<Option<ActiveScreen>>,
}

impl DashboardSession {
    pub fn new(coordinators: Coordinators) -> Self {
        Self {
            coordinators,
            current: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveScreen>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Unmounts whatever is in `current` and mounts `controller` in its place.
    fn replace<C>(
        current: &mut Option<ActiveScreen>,
        controller: Arc<C>,
        wrap: fn(Arc<C>) -> ActiveScreen,
    ) -> Arc<C> {
        if let Some(previous) = current.take() {
            previous.unmount();
        }
        let screen = wrap(controller.clone());
        info!(screen = ?screen.kind(), "Navigated");
        *current = Some(screen);
        controller
    }

    pub fn current(&self) -> Option<ActiveScreen> {
        self.lock().clone()
    }

    /// Always mounts a fresh dashboard screen.
    pub fn dashboard(&self) -> Arc<DashboardController> {
        let controller = Arc::new(DashboardController::new(self.coordinators.clone()));
        Self::replace(&mut self.lock(), controller, ActiveScreen::Dashboard)
    }

    /// Always mounts a fresh matching screen.
    pub fn open_matching(&self) -> Arc<MatchingController> {
        let controller = Arc::new(MatchingController::new(self.coordinators.clone()));
        Self::replace(&mut self.lock(), controller, ActiveScreen::Matching)
    }

    /// The mounted candidates screen, or a fresh one if another screen is up.
    pub fn candidates(&self) -> Arc<CandidatesController> {
        let mut current = self.lock();
        if let Some(ActiveScreen::Candidates(controller)) = current.as_ref() {
            return controller.clone();
        }
        let controller = Arc::new(CandidatesController::new(self.coordinators.clone()));
        Self::replace(&mut current, controller, ActiveScreen::Candidates)
    }

    pub fn jobs(&self) -> Arc<JobsController> {
        let mut current = self.lock();
        if let Some(ActiveScreen::Jobs(controller)) = current.as_ref() {
            return controller.clone();
        }
        let controller = Arc::new(JobsController::new(self.coordinators.clone()));
        Self::replace(&mut current, controller, ActiveScreen::Jobs)
    }

    pub fn matching(&self) -> Arc<MatchingController> {
        let mut current = self.lock();
        if let Some(ActiveScreen::Matching(controller)) = current.as_ref() {
            return controller.clone();
        }
        let controller = Arc::new(MatchingController::new(self.coordinators.clone()));
        Self::replace(&mut current, controller, ActiveScreen::Matching)
    }

    /// Unmounts the current screen without mounting another.
    pub fn close(&self) {
        if let Some(screen) = self.lock().take() {
            screen.unmount();
        }
    }
}

struct SessionEntry {
    session: Arc<DashboardSession>,
    last_seen: Instant,
}

/// Dashboard sessions keyed by client. Each client navigates its own
/// session; a session untouched for `idle_timeout` is closed and dropped.
pub struct SessionStore {
    coordinators: Coordinators,
    idle_timeout: Duration,
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
}

impl SessionStore {
    pub fn new(coordinators: Coordinators, idle_timeout: Duration) -> Self {
        Self {
            coordinators,
            idle_timeout,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the session for `id`, or opens a new one under a new id when
    /// `id` is absent, unknown or expired.
    pub fn resolve(&self, id: Option<Uuid>) -> (Uuid, Arc<DashboardSession>) {
        let now = Instant::now();
        let mut sessions = self.lock();
        self.evict_idle(&mut sessions, now);

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(&id) {
                entry.last_seen = now;
                return (id, entry.session.clone());
            }
            debug!(session_id = %id, "Unknown session id, opening a new session");
        }

        let id = Uuid::new_v4();
        let session = Arc::new(DashboardSession::new(self.coordinators.clone()));
        sessions.insert(
            id,
            SessionEntry {
                session: session.clone(),
                last_seen: now,
            },
        );
        info!(session_id = %id, open = sessions.len(), "Session opened");
        (id, session)
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: Instant) {
        sessions.retain(|id, entry| {
            let alive = now.duration_since(entry.last_seen) < self.idle_timeout;
            if !alive {
                entry.session.close();
                info!(session_id = %id, "Idle session closed");
            }
            alive
        });
    }

    pub fn open_count(&self) -> usize {
        self.lock().len()
    }
}
