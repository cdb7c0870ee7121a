use std::future::Future;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Client(#[from] hyper_util::client::legacy::Error),

    #[error("Failed to read response body: {0}")]
    Body(#[from] hyper::Error),

    #[error("{0}")]
    Other(String),
}

/// Sends one request and buffers the whole response.
///
/// The seam between the API client and the network; tests substitute a
/// canned implementation.
pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        req: Request<Full<Bytes>>,
    ) -> impl Future<Output = Result<Response<Bytes>, TransportError>> + Send;
}

/// Pooled HTTP/1 client over plain TCP.
#[derive(Clone, Debug)]
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HyperTransport {
    pub fn new() -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    async fn send(&self, req: Request<Full<Bytes>>) -> Result<Response<Bytes>, TransportError> {
        debug!("{} {}", req.method(), req.uri());

        let res = self.client.request(req).await?;
        let (parts, body) = res.into_parts();
        let bytes = body.collect().await?.to_bytes();

        debug!("Response {} ({} bytes)", parts.status, bytes.len());
        Ok(Response::from_parts(parts, bytes))
    }
}
