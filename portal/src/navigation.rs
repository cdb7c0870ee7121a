//! Role-based menus.
//!
//! Pure mapping from the signed-in role to the navigation entries and the
//! dashboard flavour the client shows. Total over [`Role`]: every role, and
//! the signed-out state, gets a defined, non-empty menu.

use std::fmt;

use shared::types::Role;

use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavEntry {
    Home,
    Login,
    Register,
    Dashboard,
    Assignments,
    Submissions,
    ReviewSolutions,
    Doubts,
    Briefings,
    Messages,
    UserManagement,
    Profile,
    Logout,
}

impl NavEntry {
    pub fn path(&self) -> &'static str {
        match self {
            NavEntry::Home => "/",
            NavEntry::Login => "/login",
            NavEntry::Register => "/register",
            NavEntry::Dashboard => "/dashboard",
            NavEntry::Assignments => "/assignments",
            NavEntry::Submissions => "/submissions",
            NavEntry::ReviewSolutions => "/review",
            NavEntry::Doubts => "/doubts",
            NavEntry::Briefings => "/briefings",
            NavEntry::Messages => "/messages",
            NavEntry::UserManagement => "/admin/users",
            NavEntry::Profile => "/profile",
            NavEntry::Logout => "/logout",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NavEntry::Home => "Home",
            NavEntry::Login => "Log in",
            NavEntry::Register => "Sign up",
            NavEntry::Dashboard => "Dashboard",
            NavEntry::Assignments => "Assignments",
            NavEntry::Submissions => "My submissions",
            NavEntry::ReviewSolutions => "Review solutions",
            NavEntry::Doubts => "Doubts",
            NavEntry::Briefings => "Briefings",
            NavEntry::Messages => "Messages",
            NavEntry::UserManagement => "Manage users",
            NavEntry::Profile => "Profile",
            NavEntry::Logout => "Log out",
        }
    }
}

impl fmt::Display for NavEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16} {}", self.label(), self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardVariant {
    /// Students and volunteers: own assignments and submissions.
    Learner,
    /// Mentors and admins: review queue, briefings, and for admins user
    /// management.
    Staff,
}

impl DashboardVariant {
    pub fn for_role(role: Role) -> Self {
        if role.is_staff() {
            DashboardVariant::Staff
        } else {
            DashboardVariant::Learner
        }
    }
}

const PUBLIC: &[NavEntry] = &[NavEntry::Home, NavEntry::Login, NavEntry::Register];

const LEARNER: &[NavEntry] = &[
    NavEntry::Dashboard,
    NavEntry::Assignments,
    NavEntry::Submissions,
    NavEntry::Doubts,
    NavEntry::Messages,
    NavEntry::Profile,
    NavEntry::Logout,
];

const STAFF: &[NavEntry] = &[
    NavEntry::Dashboard,
    NavEntry::Assignments,
    NavEntry::ReviewSolutions,
    NavEntry::Doubts,
    NavEntry::Briefings,
    NavEntry::Messages,
    NavEntry::Profile,
    NavEntry::Logout,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// `None` when signed out.
    pub variant: Option<DashboardVariant>,
    pub entries: Vec<NavEntry>,
}

impl Navigation {
    pub fn contains(&self, entry: NavEntry) -> bool {
        self.entries.contains(&entry)
    }

    /// Current menu for whatever session `store` holds.
    pub fn for_store(store: &SessionStore) -> Self {
        compose(store.role())
    }
}

pub fn compose(role: Option<Role>) -> Navigation {
    let Some(role) = role else {
        return Navigation {
            variant: None,
            entries: PUBLIC.to_vec(),
        };
    };

    let variant = DashboardVariant::for_role(role);
    let mut entries = match variant {
        DashboardVariant::Learner => LEARNER.to_vec(),
        DashboardVariant::Staff => STAFF.to_vec(),
    };

    if role.is_admin() {
        // Ahead of the account entries.
        let at = entries
            .iter()
            .position(|e| *e == NavEntry::Profile)
            .unwrap_or(entries.len());
        entries.insert(at, NavEntry::UserManagement);
    }

    Navigation {
        variant: Some(variant),
        entries,
    }
}
