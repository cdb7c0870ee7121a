// ---------------------------------------------------------------------------
// Public destinations
//
// Reachable with or without a session: the login entry point itself, account
// creation, the password-recovery family and email / OTP verification.
// ---------------------------------------------------------------------------

const DEFAULT_PUBLIC: &[&str] = &[
    "/login",
    "/register",
    "/signup",
    "/forgot-password",
    "/reset-password",
    "/reset-password/:token",
    "/verify-email",
    "/verify-email/:token",
    "/verify-otp",
];

#[derive(Debug, Clone)]
pub struct PublicRoutes {
    patterns: Vec<String>,
}

impl Default for PublicRoutes {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PUBLIC.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl PublicRoutes {
    /// No public destinations at all.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn with_route(mut self, pattern: &str) -> Self {
        self.patterns.push(pattern.to_string());
        self
    }

    pub fn is_public(&self, destination: &str) -> bool {
        let path = normalize(destination);
        self.patterns.iter().any(|p| path_matches(p, path))
    }
}

/// Path part of a destination: no query, no fragment, no trailing slash.
pub fn normalize(destination: &str) -> &str {
    let path = destination
        .split(['?', '#'])
        .next()
        .unwrap_or(destination);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

pub fn path_matches(route_path: &str, request_path: &str) -> bool {
    // Exact match.
    if route_path == request_path {
        return true;
    }

    // Segment-by-segment matching for `:param` wildcards.
    // e.g.  "/reset-password/:token"  matches  "/reset-password/abc123"
    let route_segs: Vec<&str> = route_path.split('/').collect();
    let path_segs: Vec<&str> = request_path.split('/').collect();

    if route_segs.len() != path_segs.len() {
        return false;
    }

    route_segs
        .iter()
        .zip(path_segs.iter())
        .all(|(r, p)| (r.starts_with(':') && !p.is_empty()) || r == p)
}
