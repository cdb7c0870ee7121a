//! Navigation gating.
//!
//! Every navigation (and every session change while a protected view is on
//! screen) is run through [`RouteGuard::check`]. The guard re-checks token
//! expiry itself instead of relying on the background monitor, so a token
//! that lapsed between monitor ticks never renders a protected view.

mod redirect;
mod routes;

pub use self::redirect::{DEFAULT_LANDING, LOGIN_PATH, LoginRedirect};
pub use self::routes::{PublicRoutes, normalize, path_matches};

use std::sync::Arc;

use tracing::{debug, info};

use crate::session::{ExpiryCheck, SessionStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(LoginRedirect),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    /// Redirect target, `None` when allowed.
    pub fn location(&self) -> Option<String> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::Redirect(r) => Some(r.location()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    store: Arc<SessionStore>,
    public: PublicRoutes,
}

impl RouteGuard {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            store,
            public: PublicRoutes::default(),
        }
    }

    pub fn with_public_routes(mut self, public: PublicRoutes) -> Self {
        self.public = public;
        self
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Decide whether the current session may see `destination`.
    ///
    /// An expired session is logged out as a side effect.
    pub fn check(&self, destination: &str) -> GuardDecision {
        if self.public.is_public(destination) {
            debug!("Public destination {}", destination);
            return GuardDecision::Allow;
        }

        match self.store.expire_stale(None) {
            ExpiryCheck::Valid => GuardDecision::Allow,
            ExpiryCheck::Expired => {
                info!("Session expired before {}; redirecting to login", destination);
                GuardDecision::Redirect(LoginRedirect::expired(destination))
            }
            ExpiryCheck::NoSession => {
                info!("No session for {}; redirecting to login", destination);
                GuardDecision::Redirect(LoginRedirect::to(destination))
            }
        }
    }

    /// Resolve once the view at `destination` must be left.
    ///
    /// For a view that is already on screen: re-runs [`check`](Self::check)
    /// on every session change (logout from the monitor, a 401, another
    /// caller) and returns the redirect as soon as access is lost. Never
    /// resolves for a public destination.
    pub async fn wait_for_redirect(&self, destination: &str) -> LoginRedirect {
        let mut changes = self.store.subscribe();
        loop {
            if let GuardDecision::Redirect(redirect) = self.check(destination) {
                return redirect;
            }
            if changes.changed().await.is_err() {
                // Sender lives in the store we hold; unreachable in practice.
                return LoginRedirect::to(destination);
            }
        }
    }
}
