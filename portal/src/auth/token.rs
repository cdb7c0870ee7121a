//! Token inspection.
//!
//! Reads the expiry claim out of a session token **without verifying its
//! signature**. The client holds no signing key, so this is not, and must
//! never be used as, an authorisation check: the backend validates the token
//! on every request. Knowing the expiry locally only lets the client drop a
//! dead session before the backend has to reject it.

use std::time::Duration;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use shared::types::TokenClaims;
use thiserror::Error;
use tracing::debug;

// JWTs use unpadded base64url; tolerate padding and the standard alphabet
// from less careful issuers.
const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,

    #[error("token has no payload segment")]
    Malformed,

    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not valid claims JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("token carries no numeric exp claim")]
    MissingExpiry,
}

/// Decode the payload (second `.`-separated segment) of a token.
///
/// Only a payload that is not base64 JSON is an error. Claims of an
/// unexpected type come back as `None`, so an odd `id` never hides a good
/// `exp`.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Empty);
    }

    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or(TokenError::Malformed)?;

    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .or_else(|_| STANDARD_LENIENT.decode(payload))?;

    let payload: serde_json::Value = serde_json::from_slice(&bytes)?;
    Ok(TokenClaims::from_value(&payload))
}

/// Expiry of `token` in milliseconds since the epoch.
pub fn expires_at_millis(token: &str) -> Result<f64, TokenError> {
    decode_claims(token)?
        .exp_millis()
        .ok_or(TokenError::MissingExpiry)
}

/// `true` unless `token` carries an `exp` strictly later than `now_millis`.
///
/// Missing, empty or undecodable tokens are expired: this check fails
/// closed. A token expiring exactly at `now_millis` is expired.
pub fn is_expired(token: Option<&str>, now_millis: u64) -> bool {
    let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
        return true;
    };

    match expires_at_millis(token) {
        Ok(exp_millis) => exp_millis <= now_millis as f64,
        Err(e) => {
            debug!("Treating undecodable token as expired: {}", e);
            true
        }
    }
}

/// Time left before `token` expires, `None` once it has (or if it cannot be
/// read).
pub fn remaining(token: &str, now_millis: u64) -> Option<Duration> {
    let exp_millis = expires_at_millis(token).ok()?;
    let left = exp_millis - now_millis as f64;
    (left > 0.0).then(|| Duration::from_millis(left as u64))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
    use proptest::prelude::*;

    /// Unsigned token with the given payload JSON; signature is filler.
    pub(crate) fn token_with_payload(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload);
        format!("{}.{}.signature", header, body)
    }

    pub(crate) fn token_expiring_at(exp_secs: u64) -> String {
        token_with_payload(&format!(r#"{{"id":"u1","exp":{}}}"#, exp_secs))
    }

    const NOW: u64 = 1_700_000_000_000;

    #[test]
    fn none_and_empty_are_expired() {
        assert!(is_expired(None, NOW));
        assert!(is_expired(Some(""), NOW));
        assert!(is_expired(Some("   "), NOW));
    }

    #[test]
    fn future_exp_is_valid() {
        let t = token_expiring_at(NOW / 1000 + 60);
        assert!(!is_expired(Some(&t), NOW));
    }

    #[test]
    fn past_exp_is_expired() {
        let t = token_expiring_at(NOW / 1000 - 1);
        assert!(is_expired(Some(&t), NOW));
    }

    #[test]
    fn exact_boundary_is_expired() {
        let t = token_expiring_at(NOW / 1000);
        assert!(is_expired(Some(&t), NOW));
        assert!(!is_expired(Some(&t), NOW - 1));
    }

    #[test]
    fn missing_exp_is_expired() {
        let t = token_with_payload(r#"{"id":"u1"}"#);
        assert!(is_expired(Some(&t), NOW));
        assert!(matches!(expires_at_millis(&t), Err(TokenError::MissingExpiry)));
    }

    #[test]
    fn non_numeric_exp_is_expired() {
        let t = token_with_payload(r#"{"exp":"tomorrow"}"#);
        assert!(is_expired(Some(&t), NOW));
    }

    #[test]
    fn single_segment_is_malformed() {
        assert!(matches!(decode_claims("opaque"), Err(TokenError::Malformed)));
        assert!(matches!(decode_claims("head..sig"), Err(TokenError::Malformed)));
        assert!(is_expired(Some("opaque"), NOW));
    }

    #[test]
    fn garbage_payload_is_expired() {
        assert!(is_expired(Some("a.%%%%.c"), NOW));
        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode("not json"));
        assert!(matches!(decode_claims(&not_json), Err(TokenError::Json(_))));
    }

    #[test]
    fn padded_standard_alphabet_payload_is_accepted() {
        let payload = r#"{"exp":4102444800,"sub":"a??b"}"#;
        let t = format!("h.{}.s", STANDARD.encode(payload));
        let claims = decode_claims(&t).unwrap();
        assert_eq!(claims.exp, Some(4_102_444_800.0));
        assert_eq!(claims.sub.as_deref(), Some("a??b"));
    }

    #[test]
    fn numeric_ids_do_not_hide_exp() {
        for payload in [
            r#"{"id":42,"exp":4102444800}"#,
            r#"{"sub":7,"exp":4102444800}"#,
            r#"{"sub":{"nested":true},"exp":4102444800}"#,
        ] {
            let t = token_with_payload(payload);
            assert!(!is_expired(Some(&t), NOW), "{}", payload);
        }

        let claims = decode_claims(&token_with_payload(r#"{"id":42,"exp":1}"#)).unwrap();
        assert_eq!(claims.id.as_deref(), Some("42"));
    }

    #[test]
    fn id_and_mongo_id_together() {
        let t = token_with_payload(r#"{"id":"a","_id":"b","exp":4102444800}"#);
        assert!(!is_expired(Some(&t), NOW));
        assert_eq!(decode_claims(&t).unwrap().id.as_deref(), Some("a"));

        let t = token_with_payload(r#"{"_id":"b","exp":4102444800}"#);
        assert_eq!(decode_claims(&t).unwrap().id.as_deref(), Some("b"));
    }

    #[test]
    fn non_object_payload_has_no_expiry() {
        let t = token_with_payload("[4102444800]");
        assert!(matches!(expires_at_millis(&t), Err(TokenError::MissingExpiry)));
        assert!(is_expired(Some(&t), NOW));
    }

    #[test]
    fn remaining_counts_down() {
        let t = token_expiring_at(NOW / 1000 + 90);
        assert_eq!(remaining(&t, NOW), Some(Duration::from_secs(90)));
        assert_eq!(remaining(&t, NOW + 90_000), None);
    }

    fn json_value() -> impl Strategy<Value = serde_json::Value> {
        use serde_json::Value;

        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            (-1.0e12f64..1.0e12).prop_map(Value::from),
            "[a-zA-Z0-9 _-]{0,12}".prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
                prop::collection::btree_map("[a-z_]{1,6}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn future_exp_survives_extra_claims(
            ahead in 1u64..10_000_000,
            extras in prop::collection::vec(("[a-z_]{1,8}", json_value()), 0..5),
        ) {
            // Raw JSON text so repeated keys (e.g. `id` and `_id`, or a key
            // twice) reach the decoder as an issuer would send them.
            let mut payload = format!(r#"{{"exp":{}"#, NOW / 1000 + ahead);
            for (key, value) in extras.iter().filter(|(k, _)| k != "exp") {
                payload.push_str(&format!(r#","{}":{}"#, key, value));
            }
            payload.push('}');

            let t = token_with_payload(&payload);
            prop_assert!(!is_expired(Some(&t), NOW), "{}", payload);
        }

        #[test]
        fn any_future_exp_is_valid(ahead in 1u64..10_000_000) {
            let t = token_expiring_at(NOW / 1000 + ahead);
            prop_assert!(!is_expired(Some(&t), NOW));
        }

        #[test]
        fn any_past_or_present_exp_is_expired(behind in 0u64..1_000_000_000) {
            let t = token_expiring_at(NOW / 1000 - behind);
            prop_assert!(is_expired(Some(&t), NOW));
        }

        #[test]
        fn arbitrary_strings_never_panic_and_rarely_pass(s in ".*") {
            // Anything that is not a well-formed token with a future exp
            // must come back expired.
            if decode_claims(&s).ok().and_then(|c| c.exp_millis()).is_none() {
                prop_assert!(is_expired(Some(&s), NOW));
            }
        }

        #[test]
        fn payloads_without_exp_are_expired(sub in "[a-z]{0,12}", iat in 0u64..4_000_000_000) {
            let t = token_with_payload(&format!(r#"{{"sub":"{}","iat":{}}}"#, sub, iat));
            prop_assert!(is_expired(Some(&t), NOW));
        }
    }
}
