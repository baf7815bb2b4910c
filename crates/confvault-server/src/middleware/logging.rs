//! Middleware de logging estructurado.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::{
    body::Body,
    http::{Request, Response},
};
use tower::{Layer, Service};
use tracing::{Instrument, debug, info, info_span, warn};

use super::request_id::RequestId;

/// Paths polled by orchestrators; completed requests are logged at debug.
const QUIET_PATHS: &[&str] = &["/health", "/metrics"];

/// Layer that logs requests and responses.
#[derive(Clone, Default)]
pub struct LoggingLayer;

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddleware { inner }
    }
}

/// Middleware that logs request and response details inside a span
/// carrying the request ID.
#[derive(Clone)]
pub struct LoggingMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for LoggingMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let start = Instant::now();
        let path = request.uri().path().to_string();
        let quiet = QUIET_PATHS.contains(&path.as_str());

        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let span = info_span!(
            "http_request",
            request_id = %request_id,
            method = %request.method(),
            path = %path,
            query = request.uri().query().unwrap_or(""),
        );

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                debug!("Request started");

                let response = inner.call(request).await?;
                let status = response.status();
                let duration_ms = start.elapsed().as_millis() as u64;

                if status.is_server_error() {
                    warn!(status = status.as_u16(), duration_ms, "Request failed");
                } else if quiet {
                    debug!(status = status.as_u16(), duration_ms, "Request completed");
                } else {
                    info!(status = status.as_u16(), duration_ms, "Request completed");
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}
