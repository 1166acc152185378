use super::table::{Route, RouteError, RouteTable};
use super::urls::Urls;
use crate::http::{HttpResponse, Request, Response};
use crate::middleware::{into_boxed, BoxedMiddleware, Middleware, MiddlewareChain};
use http::Extensions;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for route handlers
pub type BoxedHandler =
    Box<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

type Injector = Arc<dyn Fn(&mut Extensions) + Send + Sync>;

/// HTTP router over an ordered [`RouteTable`]
///
/// Each router owns its table; there is no process-wide registry, so a
/// test can add and remove routes on its own instance.
///
/// # Example
///
/// ```rust,ignore
/// Router::new()
///     .get("/about/", common::about).name("common:about_view")
///     .group("/workflows", |r| {
///         r.get("/", workflows::index).name("document_states:workflow_template_list")
///     })
///     .middleware(RequireLogin)
/// ```
#[derive(Default)]
pub struct Router {
    table: RouteTable,
    middleware: Vec<BoxedMiddleware>,
    injectors: Vec<Injector>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a GET route
    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        RouteBuilder {
            router: self,
            pending: Route::get(path, handler),
        }
    }

    /// Register a POST route
    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        RouteBuilder {
            router: self,
            pending: Route::post(path, handler),
        }
    }

    /// Append a fully built route
    pub fn route(mut self, route: Route) -> Self {
        self.table.push(route);
        self
    }

    /// Append every route of `other`, wrapped in its global middleware
    pub fn merge(mut self, other: impl Into<Router>) -> Self {
        let other = other.into();
        for route in other.table.iter() {
            let mut route = route.clone();
            route.wrap(&other.middleware);
            self.table.push(route);
        }
        self.injectors.extend(other.injectors);
        self
    }

    /// Middleware run on every request, outside route middleware
    pub fn global_middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(into_boxed(middleware));
        self
    }

    /// Share a value with every handler through the request extensions
    pub fn state<S: Clone + Send + Sync + 'static>(mut self, state: S) -> Self {
        self.injectors.push(Arc::new(move |extensions: &mut Extensions| {
            extensions.insert(state.clone());
        }));
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Insert a route at `index` of the table
    pub fn insert_route(&mut self, index: usize, route: Route) -> Result<(), RouteError> {
        self.table.insert(index, route)
    }

    /// Remove the route at `index` of the table
    pub fn remove_route(&mut self, index: usize) -> Result<Route, RouteError> {
        self.table.remove(index)
    }

    pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        self.table.reverse(name, params)
    }

    pub fn urls(&self) -> Urls {
        self.table.urls()
    }

    /// Resolve a request into an owned, runnable dispatch
    ///
    /// Nothing in the returned value borrows the router, so a caller holding
    /// the router behind a lock can release it before awaiting.
    pub fn prepare(&self, mut request: Request) -> Dispatch {
        for inject in &self.injectors {
            inject(request.extensions_mut());
        }
        request.extensions_mut().insert(self.table.urls());

        let mut chain = MiddlewareChain::new();
        chain.extend(self.middleware.iter().cloned());

        let target = match self.table.resolve(request.method(), request.path()) {
            Some((route, params)) => {
                chain.extend(route.route_middleware().iter().cloned());
                request = request.with_params(params);
                Target::Route(route.handler())
            }
            None if self.table.matches_path(request.path()) => Target::MethodNotAllowed,
            None => Target::NotFound,
        };

        Dispatch {
            request,
            chain,
            target,
        }
    }

    /// Route and run a request
    pub async fn dispatch(&self, request: Request) -> HttpResponse {
        self.prepare(request).run().await
    }

    /// Match a request and return the handler with extracted params
    pub fn match_route(
        &self,
        method: &http::Method,
        path: &str,
    ) -> Option<(Arc<BoxedHandler>, HashMap<String, String>)> {
        self.table
            .resolve(method, path)
            .map(|(route, params)| (route.handler(), params))
    }
}

enum Target {
    Route(Arc<BoxedHandler>),
    MethodNotAllowed,
    NotFound,
}

/// A resolved request ready to run through its middleware chain
pub struct Dispatch {
    request: Request,
    chain: MiddlewareChain,
    target: Target,
}

impl Dispatch {
    pub async fn run(self) -> HttpResponse {
        let handler = match self.target {
            Target::Route(handler) => handler,
            Target::MethodNotAllowed => fallback(405, "405 Method Not Allowed"),
            Target::NotFound => fallback(404, "404 Not Found"),
        };
        self.chain
            .execute(self.request, handler)
            .await
            .unwrap_or_else(|e| e)
    }
}

fn fallback(status: u16, body: &'static str) -> Arc<BoxedHandler> {
    let handler: BoxedHandler =
        Box::new(move |_req| Box::pin(async move { Err(HttpResponse::text(body).status(status)) }));
    Arc::new(handler)
}

/// Builder returned after registering a route, enabling .name() chaining
pub struct RouteBuilder {
    router: Router,
    pending: Route,
}

impl RouteBuilder {
    /// Name the most recently registered route
    pub fn name(mut self, name: &str) -> RouteBuilder {
        self.pending = self.pending.name(name);
        self
    }

    /// Apply middleware to the most recently registered route
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> RouteBuilder {
        self.pending = self.pending.middleware(middleware);
        self
    }

    fn finish(self) -> Router {
        self.router.route(self.pending)
    }

    /// Register a GET route
    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.finish().get(path, handler)
    }

    /// Register a POST route
    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.finish().post(path, handler)
    }

    pub fn merge(self, other: impl Into<Router>) -> Router {
        self.finish().merge(other)
    }
}

impl From<RouteBuilder> for Router {
    fn from(builder: RouteBuilder) -> Self {
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Route;
    use http::{Method, Uri};
    use pretty_assertions::assert_eq;

    async fn about(req: Request) -> Response {
        let name = req.extension::<&'static str>().unwrap_or("none");
        HttpResponse::text(format!("About {}", name)).ok()
    }

    async fn show(req: Request) -> Response {
        let id = req.param_id("workflow_id")?;
        let url = req.url_for("show", &[("workflow_id", &id.to_string())])?;
        HttpResponse::text(url).ok()
    }

    fn router() -> Router {
        Router::new()
            .get("/about/", about)
            .name("about")
            .get("/workflows/{workflow_id}/", show)
            .name("show")
            .into()
    }

    fn get(path: &'static str) -> Request {
        Request::new(Method::GET, Uri::from_static(path))
    }

    #[tokio::test]
    async fn dispatch_injects_state_and_urls() {
        let router = router().state("archivo");
        let response = router.dispatch(get("/about/")).await;
        assert_eq!(response.body_text(), "About archivo");

        let response = router.dispatch(get("/workflows/5/")).await;
        assert_eq!(response.body_text(), "/workflows/5/");
    }

    #[tokio::test]
    async fn unknown_path_is_404_and_wrong_method_is_405() {
        let router = router();
        assert_eq!(router.dispatch(get("/nope/")).await.status_code(), 404);

        let post = Request::new(Method::POST, Uri::from_static("/about/"));
        assert_eq!(router.dispatch(post).await.status_code(), 405);
    }

    #[tokio::test]
    async fn inserted_route_takes_priority_until_removed() {
        let mut router = router();
        router
            .insert_route(0, Route::get("/about/", |_req| async { HttpResponse::text("test").ok() }))
            .unwrap();
        assert_eq!(router.dispatch(get("/about/")).await.body_text(), "test");

        router.remove_route(0).unwrap();
        assert_eq!(router.dispatch(get("/about/")).await.body_text(), "About none");
    }
}
