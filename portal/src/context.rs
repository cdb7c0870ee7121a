use std::sync::Arc;

use shared::types::ClientConfig;
use tracing::debug;

use crate::api::{ApiClient, HyperTransport};
use crate::clock::SystemClock;
use crate::guard::RouteGuard;
use crate::navigation::Navigation;
use crate::session::{MonitorPolicy, SessionStore};
use crate::storage::FileStorage;

/// Everything the client needs, wired once at start-up.
///
/// The session store is created here and handed explicitly to the guard and
/// the API client; nothing reaches it through globals.
pub struct PortalContext {
    pub store: Arc<SessionStore>,
    pub guard: RouteGuard,
    pub api: ApiClient<HyperTransport>,
}

impl PortalContext {
    /// Restore the persisted session from `config.storage.dir` and build the
    /// guard and API client around it. Call inside a tokio runtime so the
    /// expiry monitor can start.
    pub fn from_config(config: &ClientConfig) -> Self {
        let storage = Arc::new(FileStorage::new(&config.storage.dir));
        let policy = MonitorPolicy::from_config(&config.auth);
        debug!(
            "Session storage at {}, monitor every {:?}",
            storage.dir().display(),
            policy.interval
        );

        let store = SessionStore::restore(storage, Arc::new(SystemClock), policy);
        let guard = RouteGuard::new(store.clone());
        let api = ApiClient::new(
            config.api.resolved_base_url(),
            store.clone(),
            HyperTransport::new(),
        )
        .with_timeout(config.api.timeout());

        Self { store, guard, api }
    }

    pub fn navigation(&self) -> Navigation {
        Navigation::for_store(&self.store)
    }
}
