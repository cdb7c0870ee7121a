mod monitor;
mod store;

pub use self::monitor::{MonitorPolicy, check_interval};
pub use self::store::{ExpiryCheck, LogoutReason, SessionError, SessionEvent, SessionStore};
