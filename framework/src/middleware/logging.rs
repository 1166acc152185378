use super::{Middleware, Next};
use crate::http::{Request, Response};
use async_trait::async_trait;
use std::time::Instant;

/// Logs method, path, status and elapsed time of every request
pub struct RequestLogger;

#[async_trait]
impl Middleware for RequestLogger {
    async fn handle(&self, request: Request, next: Next) -> Response {
        let method = request.method().clone();
        let path = request.path().to_string();
        let started = Instant::now();

        let response = next(request).await;

        let status = match &response {
            Ok(r) | Err(r) => r.status_code(),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if status >= 500 {
            tracing::error!(%method, %path, status, elapsed_ms, "Request failed");
        } else {
            tracing::info!(%method, %path, status, elapsed_ms, "Request handled");
        }
        response
    }
}
