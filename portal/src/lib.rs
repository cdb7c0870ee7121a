//! Session lifecycle core for the mentorship portal client.
//!
//! - [`auth::token`]: reads a token's expiry (no signature check; the
//!   backend is the authority).
//! - [`session::SessionStore`]: the current session, mirrored to durable
//!   storage and watched by an expiry monitor.
//! - [`guard::RouteGuard`]: per-navigation allow / redirect-to-login.
//! - [`navigation`]: role → menu entries.
//! - [`api::ApiClient`]: backend calls carrying the bearer token.

pub mod api;
pub mod auth;
pub mod clock;
pub mod context;
pub mod guard;
pub mod navigation;
pub mod session;
pub mod storage;

pub use context::PortalContext;
pub use guard::{GuardDecision, LoginRedirect, RouteGuard};
pub use navigation::{DashboardVariant, NavEntry, Navigation};
pub use session::{LogoutReason, MonitorPolicy, SessionEvent, SessionStore};
