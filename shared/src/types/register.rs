use serde::{Deserialize, Serialize};

use super::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationData {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Requested role. The backend decides what is actually granted;
    /// staff roles are normally assigned by an admin.
    #[serde(default = "default_role")]
    pub role: Role,
}

/// One-time password sent to the address given at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpData {
    pub email: String,
    pub otp: String,
}

pub fn default_role() -> Role {
    Role::Student
}
