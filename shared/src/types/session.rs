use std::fmt;

use serde::{Deserialize, Serialize};

use super::role::Role;

// ---------------------------------------------------------------------------
// Session types
//
//   A session is created by login / registration / OTP verification and is
//   replaced wholesale on re-login. It is never edited in place.
// ---------------------------------------------------------------------------

/// Profile of the signed-in user, as returned by the auth endpoints and as
/// persisted (JSON) in the `user` storage entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend identifier. Mongo-style ids arrive as `_id`.
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// The client's record of an authenticated user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token presented on every backend request.
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn role(&self) -> Role {
        self.user.role
    }
}

// ---------------------------------------------------------------------------
// Display / Debug
//
// The token is a bearer credential: never print it.
// ---------------------------------------------------------------------------

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id={}, name={}, email={}, role={}",
            self.id, self.name, self.email, self.role
        )
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user)
    }
}
