#[cfg(test)]
use http::{HeaderMap, header::AUTHORIZATION};
use http::header::{HeaderValue, InvalidHeaderValue};

/// Build the `Authorization: Bearer <token>` value. Marked sensitive so it
/// is never printed by `Debug`.
pub fn bearer(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Token carried by an `Authorization: Bearer <token>` header. Requests are
/// only built here, so reading one back is for inspecting them in tests.
#[cfg(test)]
pub(crate) fn get_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_roundtrip() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer("a.b.c").unwrap());
        assert_eq!(get_bearer_token(&headers).as_deref(), Some("a.b.c"));
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn other_schemes_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(get_bearer_token(&headers), None);
    }

    #[test]
    fn control_characters_are_rejected() {
        assert!(bearer("bad\ntoken").is_err());
    }
}
