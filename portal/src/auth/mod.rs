pub mod token;

pub use self::token::{TokenError, decode_claims, expires_at_millis, is_expired, remaining};
