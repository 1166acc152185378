//! Request middleware
//!
//! Middleware wraps a handler: it receives the request and a [`Next`]
//! continuation and may short-circuit by returning without calling it.
//!
//! ```rust,ignore
//! use kit::{async_trait, Middleware, Next, Request, Response};
//!
//! pub struct RequireJson;
//!
//! #[async_trait]
//! impl Middleware for RequireJson {
//!     async fn handle(&self, request: Request, next: Next) -> Response {
//!         next(request).await
//!     }
//! }
//! ```

mod logging;

pub use logging::RequestLogger;

use crate::http::{Request, Response};
use crate::routing::BoxedHandler;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Continuation invoking the rest of the chain
pub type Next =
    Arc<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: Request, next: Next) -> Response;
}

pub type BoxedMiddleware = Arc<dyn Middleware>;

pub fn into_boxed<M: Middleware + 'static>(middleware: M) -> BoxedMiddleware {
    Arc::new(middleware)
}

/// Ordered middleware wrapped around one handler
///
/// The first middleware added is the outermost.
#[derive(Default, Clone)]
pub struct MiddlewareChain {
    middleware: Vec<BoxedMiddleware>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, middleware: BoxedMiddleware) {
        self.middleware.push(middleware);
    }

    pub fn extend(&mut self, middleware: impl IntoIterator<Item = BoxedMiddleware>) {
        self.middleware.extend(middleware);
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Run the chain, ending in `handler`
    pub async fn execute(self, request: Request, handler: Arc<BoxedHandler>) -> Response {
        let mut next: Next = Arc::new(move |req| handler(req));

        for middleware in self.middleware.into_iter().rev() {
            let inner = next.clone();
            next = Arc::new(move |req| {
                let middleware = middleware.clone();
                let inner = inner.clone();
                Box::pin(async move { middleware.handle(req, inner).await })
            });
        }

        next(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use http::{Method, Uri};
    use pretty_assertions::assert_eq;

    struct Tag(&'static str);

    #[async_trait]
    impl Middleware for Tag {
        async fn handle(&self, request: Request, next: Next) -> Response {
            next(request).await.map(|r| r.header("x-trace", self.0))
        }
    }

    struct Deny;

    #[async_trait]
    impl Middleware for Deny {
        async fn handle(&self, _request: Request, _next: Next) -> Response {
            Err(HttpResponse::text("denied").status(403))
        }
    }

    fn handler() -> Arc<BoxedHandler> {
        let boxed: BoxedHandler = Box::new(|_req| Box::pin(async { HttpResponse::text("ok").ok() }));
        Arc::new(boxed)
    }

    #[tokio::test]
    async fn first_middleware_is_outermost() {
        let mut chain = MiddlewareChain::new();
        chain.push(into_boxed(Tag("outer")));
        chain.push(into_boxed(Tag("inner")));

        let response = chain
            .execute(Request::new(Method::GET, Uri::from_static("/")), handler())
            .await
            .unwrap();
        let traces: Vec<_> = response.header_values("x-trace").collect();
        assert_eq!(traces, vec!["inner", "outer"]);
    }

    #[tokio::test]
    async fn middleware_can_short_circuit() {
        let mut chain = MiddlewareChain::new();
        chain.push(into_boxed(Deny));

        let response = chain
            .execute(Request::new(Method::GET, Uri::from_static("/")), handler())
            .await
            .unwrap_err();
        assert_eq!(response.status_code(), 403);
    }
}
