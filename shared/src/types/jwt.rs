use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claims the client reads out of a session token's payload.
///
/// The client never verifies the signature (it holds no key). These values
/// are used for expiry bookkeeping only; every authorisation decision is
/// made by the backend on each request.
///
/// Every field is optional. The derived `Deserialize` is strict about claim
/// types; token payloads from the wire go through [`TokenClaims::from_value`]
/// instead, which never fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Standard JWT expiry (Unix timestamp, seconds). Fractional values are
    /// accepted because some issuers emit them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<f64>,

    /// Issued-at (Unix timestamp, seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<f64>,

    /// Standard JWT subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// User id as embedded by the backend.
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl TokenClaims {
    /// Pick the known claims out of a decoded payload.
    ///
    /// A claim of an unexpected type is treated as absent instead of failing
    /// the whole payload: issuers disagree on whether ids are strings or
    /// numbers, and some send both `id` and `_id`. `id` wins over `_id`.
    pub fn from_value(payload: &Value) -> Self {
        let number = |key: &str| payload.get(key).and_then(Value::as_f64);
        let text = |key: &str| payload.get(key).and_then(claim_text);

        Self {
            exp: number("exp"),
            iat: number("iat"),
            sub: text("sub"),
            id: text("id").or_else(|| text("_id")),
        }
    }

    /// Expiry in milliseconds since the epoch, if the claim is present and
    /// representable.
    pub fn exp_millis(&self) -> Option<f64> {
        self.exp.filter(|e| e.is_finite()).map(|e| e * 1000.0)
    }
}

fn claim_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
