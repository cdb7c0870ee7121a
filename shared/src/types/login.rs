use serde::{Deserialize, Serialize};

use super::session::{Session, User};

// ---------------------------------------------------------------------------
// Login wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    #[serde(alias = "username")]
    pub email: String,
    pub password: String,
}

/// Body returned by every endpoint that issues a session: login,
/// registration and OTP verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    pub fn into_session(self) -> Session {
        Session::new(self.token, self.user)
    }
}

/// Plain acknowledgement (password reset requests and the like).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
