use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use crate::app::App;
use crate::store::SharedStore;

/// One browser's in-memory view of the site. Never persisted.
pub struct Session {
    pub id: Uuid,
    pub app: App,
    last_seen: Mutex<Instant>,
}

impl Session {
    fn new(id: Uuid, store: SharedStore) -> Self {
        Self {
            id,
            app: App::new(store),
            last_seen: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        let last_seen = *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner);
        now.duration_since(last_seen)
    }
}

/// Visitor sessions keyed by the id in the session cookie.
pub struct SessionRegistry {
    sessions: DashMap<Uuid, Arc<Session>>,
    store: SharedStore,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(store: SharedStore, ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            store,
            ttl,
        }
    }

    /// Look up the session for `id`, or start a fresh one. The bool is true
    /// when a new session was created and its cookie must be set.
    pub fn resolve(&self, id: Option<Uuid>) -> (Arc<Session>, bool) {
        if let Some(session) = id.and_then(|id| self.sessions.get(&id).map(|s| s.value().clone())) {
            session.touch();
            return (session, false);
        }

        let session = Arc::new(Session::new(Uuid::now_v7(), self.store.clone()));
        self.sessions.insert(session.id, session.clone());
        tracing::debug!("Started visitor session {}", session.id);
        (session, true)
    }

    /// Drop sessions idle for longer than the configured TTL. Returns how
    /// many were removed.
    pub fn sweep(&self) -> usize {
        let before = self.sessions.len();
        let now = Instant::now();
        self.sessions
            .retain(|_, session| session.idle_for(now) < self.ttl);
        before.saturating_sub(self.sessions.len())
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Sweep `registry` every `every` until the registry itself is dropped.
pub async fn run_sweeper(registry: Weak<SessionRegistry>, every: Duration) {
    let mut ticks = tokio::time::interval(every);
    ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticks.tick().await;
        let Some(sessions) = registry.upgrade() else {
            break;
        };
        let removed = sessions.sweep();
        if removed > 0 {
            tracing::debug!("Expired {removed} idle visitor sessions");
        }
    }
}
