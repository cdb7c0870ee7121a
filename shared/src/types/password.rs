use serde::{Deserialize, Serialize};

/// Start of the password-recovery flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordData {
    pub email: String,
}

/// Completes recovery with the token delivered by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordData {
    pub token: String,
    pub password: String,
}
