use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Platform role carried in every user record.
///
/// The set is closed: the backend never issues anything else, and an unknown
/// value in a persisted user record is treated as storage corruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Volunteer,
    Mentor,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Student, Role::Volunteer, Role::Mentor, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Volunteer => "volunteer",
            Role::Mentor => "mentor",
            Role::Admin => "admin",
        }
    }

    /// Mentors and admins review work; students and volunteers submit it.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Mentor | Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "volunteer" => Ok(Role::Volunteer),
            "mentor" => Ok(Role::Mentor),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
