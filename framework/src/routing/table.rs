//! Ordered route table
//!
//! Routes are kept in registration order and compiled into one matchit
//! router per method. When two routes match the same path the one nearer
//! the front of the table wins, so inserting at index 0 shadows existing
//! routes and removing it restores them.

use super::urls::Urls;
use super::BoxedHandler;
use crate::middleware::{into_boxed, BoxedMiddleware, Middleware};
use http::Method;
use matchit::Router as MatchitRouter;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Route table misuse or failed name reversal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route index {index} out of range for table of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no route named '{name}'")]
    NotFound { name: String },

    #[error("route '{name}' requires parameter '{param}'")]
    MissingParameter { name: String, param: String },
}

/// A single route: method, path pattern, optional name, handler and middleware
#[derive(Clone)]
pub struct Route {
    method: Method,
    pattern: String,
    name: Option<String>,
    handler: Arc<BoxedHandler>,
    middleware: Vec<BoxedMiddleware>,
}

impl Route {
    pub fn new<H, Fut>(method: Method, pattern: &str, handler: H) -> Self
    where
        H: Fn(crate::http::Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::http::Response> + Send + 'static,
    {
        let boxed: BoxedHandler = Box::new(move |req| Box::pin(handler(req)));
        Self::from_boxed(method, pattern, Arc::new(boxed))
    }

    pub(crate) fn from_boxed(method: Method, pattern: &str, handler: Arc<BoxedHandler>) -> Self {
        Self {
            method,
            pattern: pattern.to_string(),
            name: None,
            handler,
            middleware: Vec::new(),
        }
    }

    pub fn get<H, Fut>(pattern: &str, handler: H) -> Self
    where
        H: Fn(crate::http::Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::http::Response> + Send + 'static,
    {
        Self::new(Method::GET, pattern, handler)
    }

    pub fn post<H, Fut>(pattern: &str, handler: H) -> Self
    where
        H: Fn(crate::http::Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::http::Response> + Send + 'static,
    {
        Self::new(Method::POST, pattern, handler)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(into_boxed(middleware));
        self
    }

    /// Put `middleware` outside the route's own middleware
    pub(crate) fn wrap(&mut self, middleware: &[BoxedMiddleware]) {
        let own = std::mem::take(&mut self.middleware);
        self.middleware = middleware.iter().cloned().chain(own).collect();
    }

    pub(crate) fn prefix(&mut self, prefix: &str) {
        self.pattern = format!("{}{}", prefix, self.pattern);
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn handler(&self) -> Arc<BoxedHandler> {
        self.handler.clone()
    }

    pub fn route_middleware(&self) -> &[BoxedMiddleware] {
        &self.middleware
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("name", &self.name)
            .finish()
    }
}

/// Routes in priority order plus their compiled matchers
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    compiled: HashMap<Method, MatchitRouter<usize>>,
    urls: Urls,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route at the lowest priority
    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
        self.recompile();
    }

    /// Insert a route at `index`, shifting later routes back
    pub fn insert(&mut self, index: usize, route: Route) -> Result<(), RouteError> {
        if index > self.routes.len() {
            return Err(RouteError::IndexOutOfRange {
                index,
                len: self.routes.len(),
            });
        }
        self.routes.insert(index, route);
        self.recompile();
        Ok(())
    }

    /// Remove and return the route at `index`
    pub fn remove(&mut self, index: usize) -> Result<Route, RouteError> {
        if index >= self.routes.len() {
            return Err(RouteError::IndexOutOfRange {
                index,
                len: self.routes.len(),
            });
        }
        let route = self.routes.remove(index);
        self.recompile();
        Ok(route)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    /// Index of the first route with the given name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.routes
            .iter()
            .position(|r| r.route_name() == Some(name))
    }

    /// Build the path of a named route
    pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        self.urls.reverse(name, params)
    }

    /// Snapshot of the name to pattern map
    pub fn urls(&self) -> Urls {
        self.urls.clone()
    }

    /// Find the route serving `method` and `path`, with its extracted parameters
    pub fn resolve(&self, method: &Method, path: &str) -> Option<(&Route, HashMap<String, String>)> {
        let matched = self.compiled.get(method)?.at(path).ok()?;
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let route = self.routes.get(*matched.value)?;
        Some((route, params))
    }

    /// Whether any method serves `path`
    pub fn matches_path(&self, path: &str) -> bool {
        self.compiled.values().any(|router| router.at(path).is_ok())
    }

    fn recompile(&mut self) {
        let mut compiled: HashMap<Method, MatchitRouter<usize>> = HashMap::new();
        let mut names = HashMap::new();

        for (index, route) in self.routes.iter().enumerate() {
            let router = compiled
                .entry(route.method.clone())
                .or_insert_with(MatchitRouter::new);
            if let Err(err) = router.insert(route.pattern.clone(), index) {
                tracing::debug!(
                    method = %route.method,
                    pattern = %route.pattern,
                    error = %err,
                    "Route shadowed by an earlier route"
                );
            }
            if let Some(name) = &route.name {
                names.entry(name.clone()).or_insert_with(|| route.pattern.clone());
            }
        }

        self.compiled = compiled;
        self.urls = Urls::new(names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, Request, Response};
    use pretty_assertions::assert_eq;

    async fn handler(_req: Request) -> Response {
        HttpResponse::text("ok").ok()
    }

    fn table() -> RouteTable {
        let mut table = RouteTable::new();
        table.push(Route::get("/about/", handler).name("common:about_view"));
        table.push(Route::get("/workflows/{workflow_id}/", handler).name("workflows:edit"));
        table
    }

    #[test]
    fn insert_then_remove_restores_order() {
        let mut table = table();
        let before: Vec<_> = table.iter().map(|r| r.pattern().to_string()).collect();

        table
            .insert(0, Route::get("/test-view/", handler).name("test-view"))
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.position("test-view"), Some(0));

        let removed = table.remove(0).unwrap();
        assert_eq!(removed.route_name(), Some("test-view"));
        let after: Vec<_> = table.iter().map(|r| r.pattern().to_string()).collect();
        assert_eq!(before, after);
        assert!(table.reverse("test-view", &[]).is_err());
    }

    #[test]
    fn remove_from_empty_table_fails() {
        let mut table = RouteTable::new();
        assert_eq!(
            table.remove(0).unwrap_err(),
            RouteError::IndexOutOfRange { index: 0, len: 0 }
        );
    }

    #[test]
    fn front_route_shadows_later_duplicate() {
        let mut table = table();
        table
            .insert(0, Route::get("/about/", handler).name("shadow"))
            .unwrap();
        let (route, _) = table.resolve(&Method::GET, "/about/").unwrap();
        assert_eq!(route.route_name(), Some("shadow"));

        table.remove(0).unwrap();
        let (route, _) = table.resolve(&Method::GET, "/about/").unwrap();
        assert_eq!(route.route_name(), Some("common:about_view"));
    }

    #[test]
    fn resolve_extracts_parameters() {
        let table = table();
        let (_, params) = table.resolve(&Method::GET, "/workflows/7/").unwrap();
        assert_eq!(params.get("workflow_id").map(String::as_str), Some("7"));
        assert!(table.resolve(&Method::POST, "/workflows/7/").is_none());
        assert!(table.matches_path("/workflows/7/"));
    }
}
