#![allow(dead_code)]

use std::sync::Arc;

use jsonwebtoken::{EncodingKey, Header, encode};
use portal::clock::Clock;
use portal::session::{MonitorPolicy, SessionStore};
use portal::storage::MemoryStorage;
use serde::Serialize;
use shared::types::{Role, Session, User};

pub const T0: u64 = 1_700_000_000_000;

#[derive(Serialize)]
struct Claims {
    id: String,
    iat: u64,
    exp: u64,
}

/// HS256 token for `user_id` expiring at `exp_secs`. The client never
/// checks the signature, so the key is arbitrary.
pub fn mint(user_id: &str, exp_secs: u64) -> String {
    let claims = Claims {
        id: user_id.to_string(),
        iat: T0 / 1000,
        exp: exp_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"portal-test-secret"),
    )
    .unwrap()
}

pub fn user(id: &str, role: Role) -> User {
    User {
        id: id.to_string(),
        name: format!("User {}", id),
        email: format!("{}@portal.test", id),
        role,
    }
}

/// Session for `role` whose token lives `ttl_secs` past `T0`.
pub fn session(id: &str, role: Role, ttl_secs: u64) -> Session {
    Session::new(mint(id, T0 / 1000 + ttl_secs), user(id, role))
}

pub fn store(storage: &MemoryStorage, clock: impl Clock + 'static) -> Arc<SessionStore> {
    SessionStore::restore(
        Arc::new(storage.clone()),
        Arc::new(clock),
        MonitorPolicy::default(),
    )
}
