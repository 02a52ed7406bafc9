//! Session management
//!
//! The manager is the single owner of every signed-in user's token pair.
//! Browsers hold only an opaque session id. Each session sits behind its own
//! lock, so concurrent requests on an expired session wait for one refresh
//! instead of racing several.
//!
//! A session ends on logout, on a failed refresh, when its browser signs in
//! again, or after sitting idle past the configured timeout.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use uuid::Uuid;

use crate::auth::models::Session;
use crate::auth::refresh::TokenRefresher;
use crate::error::{Error, Result};
use crate::ui::view::Notification;

#[derive(Debug)]
struct Entry {
    session: Session,
    /// Notification to show on the next screen, consumed once
    flash: Option<Notification>,
    /// Latest search ticket issued per screen
    searches: HashMap<String, u64>,
    last_seen: Instant,
}

/// In-memory session store keyed by session id
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Arc<Mutex<Entry>>>>>,
    refresher: TokenRefresher,
    idle_timeout: Duration,
}

impl SessionManager {
    pub fn new(refresher: TokenRefresher, idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            refresher,
            idle_timeout,
        }
    }

    /// Store a session and return its new id
    pub async fn create(&self, session: Session) -> String {
        let id = Uuid::new_v4().to_string();
        let entry = Entry {
            session,
            flash: None,
            searches: HashMap::new(),
            last_seen: Instant::now(),
        };
        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(entry)));
        id
    }

    async fn entry(&self, id: &str) -> Option<Arc<Mutex<Entry>>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Snapshot of a session as stored, without refreshing; counts as activity
    pub async fn get(&self, id: &str) -> Option<Session> {
        let entry = self.entry(id).await?;
        let mut entry = entry.lock().await;
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// The session with a usable access token, refreshing it first if expired
    ///
    /// Unknown ids and errored sessions are `Error::Unauthenticated`. A failed
    /// refresh marks the session errored for requests already waiting on it,
    /// removes it from the store and returns `Error::RefreshFailed`.
    pub async fn fresh_session(&self, id: &str) -> Result<Session> {
        let entry = self.entry(id).await.ok_or(Error::Unauthenticated)?;
        let result = {
            let mut entry = entry.lock().await;
            entry.last_seen = Instant::now();
            self.refresher
                .ensure_fresh(&mut entry.session)
                .await
                .map(|_| entry.session.clone())
        };

        if let Err(Error::RefreshFailed(_)) = &result {
            self.delete(id).await;
            tracing::info!("Session ended after a failed token refresh");
        }
        result
    }

    /// Bearer token for an outgoing API call
    pub async fn access_token(&self, id: &str) -> Result<String> {
        Ok(self.fresh_session(id).await?.access_token)
    }

    /// Remove every session matching `stale`; returns how many went
    async fn remove_where(&self, stale: impl Fn(&Entry) -> bool) -> usize {
        let entries: Vec<(String, Arc<Mutex<Entry>>)> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, entry)| (id.clone(), entry.clone()))
            .collect();

        let mut doomed = Vec::new();
        for (id, entry) in entries {
            if stale(&*entry.lock().await) {
                doomed.push(id);
            }
        }

        if !doomed.is_empty() {
            let mut sessions = self.sessions.write().await;
            for id in &doomed {
                sessions.remove(id);
            }
        }
        doomed.len()
    }

    /// Drop every session whose refresh has failed
    pub async fn purge_errored(&self) -> usize {
        let purged = self.remove_where(|entry| !entry.session.is_valid()).await;
        if purged > 0 {
            tracing::debug!("Purged {} errored sessions", purged);
        }
        purged
    }

    /// Drop every session idle for longer than the timeout
    pub async fn evict_idle(&self) -> usize {
        let timeout = self.idle_timeout;
        let evicted = self
            .remove_where(|entry| entry.last_seen.elapsed() > timeout)
            .await;
        if evicted > 0 {
            tracing::debug!("Evicted {} idle sessions", evicted);
        }
        evicted
    }

    /// Periodic cleanup of errored and idle sessions
    pub async fn sweep(&self) -> usize {
        self.purge_errored().await + self.evict_idle().await
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Queue a notification for the next screen this session renders
    pub async fn push_flash(&self, id: &str, notification: Notification) {
        if let Some(entry) = self.entry(id).await {
            entry.lock().await.flash = Some(notification);
        }
    }

    pub async fn take_flash(&self, id: &str) -> Option<Notification> {
        let entry = self.entry(id).await?;
        let mut entry = entry.lock().await;
        entry.flash.take()
    }

    /// Issue a ticket for a new search on `screen`, superseding earlier ones
    pub async fn begin_search(&self, id: &str, screen: &str) -> u64 {
        let Some(entry) = self.entry(id).await else {
            return 0;
        };
        let mut entry = entry.lock().await;
        let ticket = entry.searches.entry(screen.to_string()).or_insert(0);
        *ticket += 1;
        *ticket
    }

    /// Whether `ticket` is still the newest search on `screen`
    pub async fn is_latest_search(&self, id: &str, screen: &str, ticket: u64) -> bool {
        let Some(entry) = self.entry(id).await else {
            return false;
        };
        let entry = entry.lock().await;
        entry.searches.get(screen).copied() == Some(ticket)
    }
}
