//! Route grouping with shared prefix and middleware

use super::{Route, RouteBuilder, Router};
use crate::http::{Request, Response};
use crate::middleware::{into_boxed, BoxedMiddleware, Middleware};
use std::future::Future;

/// Builder for route groups with shared prefix and middleware
///
/// # Example
///
/// ```rust,ignore
/// Router::new()
///     .group("/workflows", |r| {
///         r.get("/", workflows::index).name("document_states:workflow_template_list")
///          .post("/create/", workflows::store)
///     })
///     .middleware(RequireLogin)
/// ```
pub struct GroupBuilder {
    outer_router: Router,
    group_routes: Vec<Route>,
    prefix: String,
    middleware: Vec<BoxedMiddleware>,
}

impl GroupBuilder {
    /// Apply middleware to all routes in this group
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(into_boxed(middleware));
        self
    }

    /// Finalize the group and merge routes into the outer router
    fn finalize(self) -> Router {
        let mut router = self.outer_router;
        for mut route in self.group_routes {
            route.prefix(&self.prefix);
            route.wrap(&self.middleware);
            router = router.route(route);
        }
        router
    }

    /// Register a GET route after the group
    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.finalize().get(path, handler)
    }

    /// Register a POST route after the group
    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.finalize().post(path, handler)
    }

    /// Start another group after this one
    pub fn group<F>(self, prefix: &str, builder_fn: F) -> GroupBuilder
    where
        F: FnOnce(GroupRouter) -> GroupRouter,
    {
        self.finalize().group(prefix, builder_fn)
    }
}

/// Inner router used within a group closure
///
/// Routes are captured without the prefix, which is applied on finalize.
pub struct GroupRouter {
    routes: Vec<Route>,
}

impl GroupRouter {
    fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a GET route within the group
    pub fn get<H, Fut>(mut self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.routes.push(Route::get(path, handler));
        self
    }

    /// Register a POST route within the group
    pub fn post<H, Fut>(mut self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.routes.push(Route::post(path, handler));
        self
    }

    /// Name the most recently registered route
    pub fn name(mut self, name: &str) -> Self {
        if let Some(route) = self.routes.pop() {
            self.routes.push(route.name(name));
        }
        self
    }

    /// Apply middleware to the most recently registered route
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        if let Some(route) = self.routes.pop() {
            self.routes.push(route.middleware(middleware));
        }
        self
    }
}

impl Router {
    /// Create a route group with a shared prefix
    ///
    /// Middleware applied to the group runs outside each route's own middleware.
    pub fn group<F>(self, prefix: &str, builder_fn: F) -> GroupBuilder
    where
        F: FnOnce(GroupRouter) -> GroupRouter,
    {
        let built = builder_fn(GroupRouter::new());

        GroupBuilder {
            outer_router: self,
            group_routes: built.routes,
            prefix: prefix.to_string(),
            middleware: Vec::new(),
        }
    }
}

impl From<GroupBuilder> for Router {
    fn from(builder: GroupBuilder) -> Self {
        builder.finalize()
    }
}

impl RouteBuilder {
    /// Create a route group with a shared prefix
    pub fn group<F>(self, prefix: &str, builder_fn: F) -> GroupBuilder
    where
        F: FnOnce(GroupRouter) -> GroupRouter,
    {
        Router::from(self).group(prefix, builder_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::middleware::Next;
    use async_trait::async_trait;
    use http::{Method, Uri};

    struct Deny;

    #[async_trait]
    impl Middleware for Deny {
        async fn handle(&self, _request: Request, _next: Next) -> Response {
            Err(HttpResponse::text("denied").status(403))
        }
    }

    async fn ok(_req: Request) -> Response {
        HttpResponse::text("ok").ok()
    }

    #[tokio::test]
    async fn group_prefixes_names_and_guards_routes() {
        let router: Router = Router::new()
            .get("/about/", ok)
            .name("about")
            .group("/workflows", |r| r.get("/", ok).name("workflow_list"))
            .middleware(Deny)
            .into();

        assert_eq!(router.reverse("workflow_list", &[]).unwrap(), "/workflows/");

        let open = Request::new(Method::GET, Uri::from_static("/about/"));
        assert_eq!(router.dispatch(open).await.status_code(), 200);

        let guarded = Request::new(Method::GET, Uri::from_static("/workflows/"));
        assert_eq!(router.dispatch(guarded).await.status_code(), 403);
    }
}
