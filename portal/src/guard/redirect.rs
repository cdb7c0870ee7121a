use std::fmt;

pub const LOGIN_PATH: &str = "/login";

/// Where to send the user after a successful login when no usable
/// `returnUrl` was carried.
pub const DEFAULT_LANDING: &str = "/dashboard";

/// A redirect to the login entry point.
///
/// Serialises to `/login?expired=true&returnUrl=%2Fdashboard` (form
/// encoding); `expired` is only present when set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub return_url: Option<String>,
    pub expired: bool,
}

impl LoginRedirect {
    pub fn to(destination: &str) -> Self {
        Self {
            return_url: Some(destination.to_string()),
            expired: false,
        }
    }

    pub fn expired(destination: &str) -> Self {
        Self {
            return_url: Some(destination.to_string()),
            expired: true,
        }
    }

    pub fn location(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if self.expired {
            query.append_pair("expired", "true");
        }
        if let Some(url) = &self.return_url {
            query.append_pair("returnUrl", url);
        }
        let query = query.finish();

        if query.is_empty() {
            LOGIN_PATH.to_string()
        } else {
            format!("{}?{}", LOGIN_PATH, query)
        }
    }

    /// Read the login parameters back out of a login location.
    ///
    /// Returns `None` if `location` is not the login path.
    pub fn parse(location: &str) -> Option<Self> {
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        if path.trim_end_matches('/') != LOGIN_PATH {
            return None;
        }

        let mut redirect = LoginRedirect {
            return_url: None,
            expired: false,
        };
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "returnUrl" if !value.is_empty() => redirect.return_url = Some(value.into_owned()),
                "expired" => redirect.expired = value == "true",
                _ => {}
            }
        }
        Some(redirect)
    }

    /// Destination to resume after login.
    ///
    /// Only same-origin paths are honoured; anything that could leave the
    /// app (`//host`, `https://…`) falls back to [`DEFAULT_LANDING`], as does
    /// a return to the login page itself.
    pub fn resume_target(&self) -> &str {
        match self.return_url.as_deref() {
            Some(url)
                if url.starts_with('/')
                    && !url.starts_with("//")
                    && !url.starts_with("/\\")
                    && LoginRedirect::parse(url).is_none() =>
            {
                url
            }
            _ => DEFAULT_LANDING,
        }
    }
}

impl fmt::Display for LoginRedirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location())
    }
}
