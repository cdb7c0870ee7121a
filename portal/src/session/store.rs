use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use shared::types::{Role, Session, User};
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::monitor::{self, MonitorHandle, MonitorPolicy};
use crate::auth::token;
use crate::clock::Clock;
use crate::storage::{SessionStorage, StorageError, TOKEN_KEY, USER_KEY};

const EVENT_CAPACITY: usize = 16;

// ---------------------------------------------------------------------------
// Errors / events
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session token is expired or unreadable")]
    Expired,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize user record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// Explicit logout (or `set_session(None)`).
    UserRequested,
    /// Token expiry noticed by the monitor or the route guard.
    Expired,
    /// The backend answered 401.
    Unauthorized,
    /// The session could not be mirrored to durable storage.
    StorageFailure,
}

impl fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogoutReason::UserRequested => write!(f, "user requested"),
            LogoutReason::Expired => write!(f, "token expired"),
            LogoutReason::Unauthorized => write!(f, "rejected by backend"),
            LogoutReason::StorageFailure => write!(f, "storage failure"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started { user_id: String, role: Role },
    LoggedOut { reason: LogoutReason },
}

/// Outcome of re-checking the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryCheck {
    Valid,
    /// The session was expired and has just been torn down.
    Expired,
    /// No session (or not the one asked about).
    NoSession,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

struct ActiveSession {
    session: Arc<Session>,
    generation: u64,
    // Dropping the session stops its monitor.
    monitor: Option<MonitorHandle>,
}

#[derive(Default)]
struct Slot {
    next_generation: u64,
    active: Option<ActiveSession>,
}

/// The one place the current session lives.
///
/// Memory is the source of truth; durable storage is a mirror written before
/// each in-memory change. Construct once at start-up with
/// [`SessionStore::restore`] and hand the `Arc` to whatever needs the
/// session (route guard, API client, menus).
pub struct SessionStore {
    this: Weak<SessionStore>,
    storage: Arc<dyn SessionStorage>,
    clock: Arc<dyn Clock>,
    policy: MonitorPolicy,
    slot: Mutex<Slot>,
    current_tx: watch::Sender<Option<Arc<Session>>>,
    events_tx: broadcast::Sender<SessionEvent>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.current())
            .field("policy", &self.policy)
            .finish()
    }
}

impl SessionStore {
    /// Build the store and load any persisted session.
    ///
    /// A persisted session is only surfaced if both entries are present, the
    /// user record parses, and the token has not expired. Anything else
    /// clears storage and starts signed out. Calling this again on the same
    /// storage gives the same result.
    pub fn restore(
        storage: Arc<dyn SessionStorage>,
        clock: Arc<dyn Clock>,
        policy: MonitorPolicy,
    ) -> Arc<Self> {
        let (current_tx, _) = watch::channel(None);
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let store = Arc::new_cyclic(|this| SessionStore {
            this: this.clone(),
            storage,
            clock,
            policy,
            slot: Mutex::new(Slot::default()),
            current_tx,
            events_tx,
        });

        if let Some(session) = store.load_persisted() {
            info!("Restored session: {}", session);
            let mut slot = store.lock();
            store.activate(&mut slot, session);
        }

        store
    }

    fn load_persisted(&self) -> Option<Session> {
        let token = self.read_entry(TOKEN_KEY);
        let user = self.read_entry(USER_KEY);

        let (token, user) = match (token, user) {
            (Some(token), Some(user)) => (token, user),
            (None, None) => {
                debug!("No persisted session");
                return None;
            }
            _ => {
                warn!("Persisted session is incomplete; clearing");
                self.clear_storage();
                return None;
            }
        };

        let user: User = match serde_json::from_str(&user) {
            Ok(user) => user,
            Err(e) => {
                warn!("Persisted user record is corrupt ({}); clearing", e);
                self.clear_storage();
                return None;
            }
        };

        if token::is_expired(Some(&token), self.clock.now_millis()) {
            info!("Persisted session for {} has expired; clearing", user.email);
            self.clear_storage();
            return None;
        }

        Some(Session::new(token, user))
    }

    fn read_entry(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read persisted {}: {}", key, e);
                None
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn current(&self) -> Option<Arc<Session>> {
        self.lock().active.as_ref().map(|a| a.session.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.lock().active.as_ref().map(|a| a.session.role())
    }

    pub fn token(&self) -> Option<String> {
        self.lock().active.as_ref().map(|a| a.session.token.clone())
    }

    pub fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }

    pub fn policy(&self) -> MonitorPolicy {
        self.policy
    }

    /// Whether an expiry monitor is currently running for the session.
    pub fn is_monitoring(&self) -> bool {
        self.lock()
            .active
            .as_ref()
            .and_then(|a| a.monitor.as_ref())
            .is_some_and(|m| !m.is_finished())
    }

    /// Current session, updated on every change. Do not hold a `borrow()`
    /// across calls back into the store.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Session>>> {
        self.current_tx.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    // ── Mutators ──────────────────────────────────────────────────────────────

    /// Replace the current session, or clear it with `None`.
    ///
    /// A session whose token is already expired (or unreadable) is refused
    /// and the current state is left untouched.
    pub fn set_session(&self, session: Option<Session>) -> Result<(), SessionError> {
        let Some(session) = session else {
            self.logout();
            return Ok(());
        };

        if token::is_expired(Some(&session.token), self.clock.now_millis()) {
            warn!("Refusing expired session for {}", session.user.email);
            return Err(SessionError::Expired);
        }

        let mut slot = self.lock();

        if let Err(e) = self.persist(&session) {
            warn!("Failed to persist session: {}", e);
            self.clear_storage();
            self.deactivate(&mut slot, LogoutReason::StorageFailure);
            return Err(e);
        }

        info!("Session started: {}", session);
        self.activate(&mut slot, session);
        Ok(())
    }

    /// End the current session. A no-op when signed out.
    pub fn logout(&self) {
        self.logout_with(LogoutReason::UserRequested);
    }

    /// End the current session for `reason`. Returns whether one was active.
    ///
    /// Storage is cleared either way.
    pub fn logout_with(&self, reason: LogoutReason) -> bool {
        let mut slot = self.lock();
        self.clear_storage();
        self.deactivate(&mut slot, reason)
    }

    /// Like [`logout_with`](Self::logout_with), but only if the current
    /// session still carries `token`. Used when a response to a request made
    /// with `token` says it is dead; a session started since is left alone.
    pub fn logout_token(&self, token: &str, reason: LogoutReason) -> bool {
        let mut slot = self.lock();
        let matches = slot
            .active
            .as_ref()
            .is_some_and(|a| a.session.token == token);
        if !matches {
            debug!("Ignoring {} for a session that is no longer current", reason);
            return false;
        }
        self.clear_storage();
        self.deactivate(&mut slot, reason)
    }

    /// Tear down the current session if its token has expired.
    ///
    /// With `Some(generation)` only that session is considered; a newer one
    /// is reported as [`ExpiryCheck::NoSession`] and left alone.
    pub fn expire_stale(&self, generation: Option<u64>) -> ExpiryCheck {
        let now = self.clock.now_millis();
        let mut slot = self.lock();

        let expired = match slot.active.as_ref() {
            Some(active) if generation.is_none_or(|g| g == active.generation) => {
                token::is_expired(Some(&active.session.token), now)
            }
            _ => return ExpiryCheck::NoSession,
        };

        if !expired {
            return ExpiryCheck::Valid;
        }

        self.clear_storage();
        self.deactivate(&mut slot, LogoutReason::Expired);
        ExpiryCheck::Expired
    }

    // ── Internals (slot lock held) ────────────────────────────────────────────

    fn persist(&self, session: &Session) -> Result<(), SessionError> {
        let user = serde_json::to_string(&session.user)?;
        self.storage.set(TOKEN_KEY, &session.token)?;
        self.storage.set(USER_KEY, &user)?;
        Ok(())
    }

    fn activate(&self, slot: &mut Slot, session: Session) {
        slot.next_generation += 1;
        let generation = slot.next_generation;
        let session = Arc::new(session);

        let event = SessionEvent::Started {
            user_id: session.user.id.clone(),
            role: session.role(),
        };

        // Replacing the previous session drops (and aborts) its monitor
        // before the new one starts.
        slot.active = None;
        let monitor = monitor::spawn(self.this.clone(), generation, self.policy);
        slot.active = Some(ActiveSession {
            session: session.clone(),
            generation,
            monitor,
        });

        self.current_tx.send_replace(Some(session));
        let _ = self.events_tx.send(event);
    }

    fn deactivate(&self, slot: &mut Slot, reason: LogoutReason) -> bool {
        let Some(previous) = slot.active.take() else {
            return false;
        };

        info!(
            "Session ended for {} ({})",
            previous.session.user.email, reason
        );

        self.current_tx.send_replace(None);
        let _ = self.events_tx.send(SessionEvent::LoggedOut { reason });
        drop(previous);
        true
    }

    fn clear_storage(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!("Failed to remove persisted {}: {}", key, e);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
