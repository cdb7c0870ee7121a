use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::types::{
    AuthResponse, ErrorResponse, ForgotPasswordData, LoginData, MessageResponse,
    RegistrationData, ResetPasswordData, Session, VerifyOtpData,
};
use tracing::{debug, info, warn};

use super::headers;
use super::transport::{HyperTransport, Transport};
use super::ApiError;
use crate::session::{LogoutReason, SessionStore};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the backend REST API.
///
/// Auth endpoints (`/auth/...`) are called without a bearer token and their
/// 401s mean bad credentials. Every other call carries the current token,
/// and a 401 on it logs the session out.
pub struct ApiClient<T: Transport = HyperTransport> {
    base_url: String,
    timeout: Duration,
    store: Arc<SessionStore>,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, store: Arc<SessionStore>, transport: T) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            store,
            transport,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    // ── Session-issuing flows ────────────────────────────────────────────────

    pub async fn login(&self, data: &LoginData) -> Result<Arc<Session>, ApiError> {
        info!("Logging in as {}", data.email);
        let res: AuthResponse = self.call(Method::POST, "/auth/login", Some(data), false).await?;
        self.start_session(res)
    }

    /// Register an account. Returns the session when the backend signs the
    /// user in straight away, `None` when it wants the emailed OTP first
    /// (see [`verify_otp`](Self::verify_otp)).
    pub async fn register(&self, data: &RegistrationData) -> Result<Option<Arc<Session>>, ApiError> {
        info!("Registering {} as {}", data.email, data.role);
        let body = self
            .execute(Method::POST, "/auth/register", Some(serde_json::to_vec(data)?), false)
            .await?;

        match serde_json::from_slice::<AuthResponse>(&body) {
            Ok(res) => self.start_session(res).map(Some),
            Err(_) => {
                let ack: MessageResponse = parse_body(&body)?;
                debug!("Registration pending verification: {}", ack.message);
                Ok(None)
            }
        }
    }

    pub async fn verify_otp(&self, data: &VerifyOtpData) -> Result<Arc<Session>, ApiError> {
        info!("Verifying OTP for {}", data.email);
        let res: AuthResponse = self
            .call(Method::POST, "/auth/verify-otp", Some(data), false)
            .await?;
        self.start_session(res)
    }

    // ── Password recovery (no session change) ────────────────────────────────

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let data = ForgotPasswordData {
            email: email.to_string(),
        };
        self.call(Method::POST, "/auth/forgot-password", Some(&data), false)
            .await
    }

    pub async fn reset_password(&self, data: &ResetPasswordData) -> Result<MessageResponse, ApiError> {
        self.call(Method::POST, "/auth/reset-password", Some(data), false)
            .await
    }

    // ── Authenticated resource calls ─────────────────────────────────────────

    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.call::<(), R>(Method::GET, path, None, true).await
    }

    pub async fn send_json<B, R>(&self, method: Method, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call(method, path, Some(body), true).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, None, true).await?;
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn start_session(&self, res: AuthResponse) -> Result<Arc<Session>, ApiError> {
        self.store.set_session(Some(res.into_session()))?;
        // Only a concurrent logout could empty it between the two calls.
        self.store.current().ok_or(ApiError::Unauthorized)
    }

    async fn call<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        authenticated: bool,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = body.map(serde_json::to_vec).transpose()?;
        let bytes = self.execute(method, path, body, authenticated).await?;
        parse_body(&bytes)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        authenticated: bool,
    ) -> Result<Bytes, ApiError> {
        let uri = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut builder = Request::builder()
            .method(method.clone())
            .uri(&uri)
            .header(ACCEPT, "application/json");

        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }

        let token = if authenticated { self.store.token() } else { None };
        if let Some(token) = &token {
            builder = builder.header(AUTHORIZATION, headers::bearer(token)?);
        }

        let req = builder.body(Full::new(Bytes::from(body.unwrap_or_default())))?;

        let res = tokio::time::timeout(self.timeout, self.transport.send(req))
            .await
            .map_err(|_| {
                warn!("{} {} timed out after {:?}", method, uri, self.timeout);
                ApiError::Timeout(self.timeout)
            })??;

        let status = res.status();
        debug!("{} {} -> {}", method, uri, status);

        if status == StatusCode::UNAUTHORIZED {
            if let Some(token) = &token {
                warn!("Backend rejected the session token on {} {}", method, uri);
                self.store.logout_token(token, LogoutReason::Unauthorized);
                return Err(ApiError::Unauthorized);
            }
        }

        if !status.is_success() {
            let error = serde_json::from_slice::<ErrorResponse>(res.body()).unwrap_or_else(|_| {
                ErrorResponse::new(
                    status.as_str(),
                    status.canonical_reason().unwrap_or("Request failed"),
                )
            });
            return Err(ApiError::Status { status, error });
        }

        Ok(res.into_body())
    }
}

/// Empty bodies (204 and friends) decode as JSON `null`.
fn parse_body<R: DeserializeOwned>(bytes: &[u8]) -> Result<R, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(bytes)?)
}
