use std::sync::Weak;
use std::time::Duration;

use shared::types::AuthConfig;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::store::{ExpiryCheck, SessionStore};

/// Shortest interval the monitor will ever run at.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// How often the monitor re-checks the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorPolicy {
    pub interval: Duration,
}

impl MonitorPolicy {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
        }
    }

    pub fn from_lifetime(lifetime: Duration, floor: Duration, ceiling: Duration) -> Self {
        Self::new(check_interval(lifetime, floor, ceiling))
    }

    pub fn from_config(auth: &AuthConfig) -> Self {
        Self::from_lifetime(
            auth.token_lifetime(),
            auth.min_check_interval(),
            auth.max_check_interval(),
        )
    }
}

impl Default for MonitorPolicy {
    fn default() -> Self {
        Self::from_config(&AuthConfig::default())
    }
}

/// A tenth of the token lifetime, clamped to `[floor, ceiling]`.
///
/// With the default one-minute bounds this is a fixed one-minute cadence;
/// expiry is noticed at most one interval late.
pub fn check_interval(lifetime: Duration, floor: Duration, ceiling: Duration) -> Duration {
    let floor = floor.max(MIN_INTERVAL);
    let ceiling = ceiling.max(floor);
    (lifetime / 10).clamp(floor, ceiling)
}

/// Cancels the monitor task when dropped.
///
/// Owned by the in-memory session it watches: replacing or clearing that
/// session drops the handle and stops the task.
#[derive(Debug)]
pub(crate) struct MonitorHandle {
    task: JoinHandle<()>,
}

impl MonitorHandle {
    pub(crate) fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start watching session `generation` of `store`.
///
/// Returns `None` outside a tokio runtime; route guarding still catches
/// expiry at navigation time in that case.
pub(crate) fn spawn(
    store: Weak<SessionStore>,
    generation: u64,
    policy: MonitorPolicy,
) -> Option<MonitorHandle> {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        warn!("No async runtime; session expiry monitor not started");
        return None;
    };

    let period = policy.interval;
    let task = runtime.spawn(async move {
        let mut ticker = time::interval_at(time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(
            "Expiry monitor started for session #{} (every {:?})",
            generation, period
        );

        loop {
            ticker.tick().await;

            let Some(store) = store.upgrade() else {
                debug!("Session store dropped; monitor #{} exiting", generation);
                return;
            };

            match store.expire_stale(Some(generation)) {
                ExpiryCheck::Valid => continue,
                ExpiryCheck::Expired => {
                    info!("Session #{} expired; logged out by monitor", generation);
                    return;
                }
                ExpiryCheck::NoSession => {
                    debug!("Session #{} no longer current; monitor exiting", generation);
                    return;
                }
            }
        }
    });

    Some(MonitorHandle { task })
}
