use super::TestResponse;
use crate::forms::FormData;
use crate::http::Request;
use crate::routing::{RouteError, Router};
use bytes::Bytes;
use http::{Method, Uri};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

const MAX_REDIRECTS: usize = 10;

/// In-process HTTP client dispatching straight into a [`Router`]
///
/// Keeps a cookie jar across calls, so a session started by a login
/// request carries over to later ones.
#[derive(Clone)]
pub struct TestClient {
    router: Arc<RwLock<Router>>,
    cookies: Arc<Mutex<HashMap<String, String>>>,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(RwLock::new(router)),
            cookies: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Shared read access to the router
    pub fn router(&self) -> RwLockReadGuard<'_, Router> {
        self.router.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Exclusive access to the router, for adding or removing routes
    pub fn router_mut(&self) -> RwLockWriteGuard<'_, Router> {
        self.router.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        self.router().reverse(name, params)
    }

    pub fn get(&self, path: impl Into<String>) -> TestRequest<'_> {
        TestRequest::new(self, Method::GET, path.into())
    }

    pub fn post(&self, path: impl Into<String>) -> TestRequest<'_> {
        TestRequest::new(self, Method::POST, path.into())
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.jar().get(name).cloned()
    }

    pub fn set_cookie(&self, name: impl Into<String>, value: impl Into<String>) {
        self.jar().insert(name.into(), value.into());
    }

    pub fn clear_cookies(&self) {
        self.jar().clear();
    }

    fn jar(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.cookies.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn cookie_header(&self) -> Option<String> {
        let jar = self.jar();
        if jar.is_empty() {
            return None;
        }
        let mut pairs: Vec<_> = jar.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        pairs.sort();
        Some(pairs.join("; "))
    }

    fn store_cookies<'a>(&self, set_cookies: impl Iterator<Item = &'a str>) {
        let mut jar = self.jar();
        for set_cookie in set_cookies {
            let mut parts = set_cookie.split(';').map(str::trim);
            let Some((name, value)) = parts.next().and_then(|p| p.split_once('=')) else {
                continue;
            };
            let expired = parts.any(|attr| attr.eq_ignore_ascii_case("Max-Age=0"));
            if expired || value.is_empty() {
                jar.remove(name);
            } else {
                jar.insert(name.to_string(), value.to_string());
            }
        }
    }

    async fn execute(&self, request: Request) -> crate::http::HttpResponse {
        let dispatch = self.router().prepare(request);
        let response = dispatch.run().await;
        self.store_cookies(response.header_values("set-cookie"));
        response
    }
}

/// A request being built by [`TestClient`]
pub struct TestRequest<'a> {
    client: &'a TestClient,
    method: Method,
    path: String,
    query: FormData,
    body: Option<(Bytes, &'static str)>,
    headers: Vec<(&'static str, String)>,
    follow: bool,
}

impl<'a> TestRequest<'a> {
    fn new(client: &'a TestClient, method: Method, path: String) -> Self {
        Self {
            client,
            method,
            path,
            query: FormData::new(),
            body: None,
            headers: Vec::new(),
            follow: false,
        }
    }

    /// Append query-string data
    pub fn query(mut self, data: FormData) -> Self {
        self.query.extend(data);
        self
    }

    /// Send `data` as an urlencoded form body
    pub fn form(mut self, data: FormData) -> Self {
        self.body = Some((
            Bytes::from(data.to_urlencoded()),
            "application/x-www-form-urlencoded",
        ));
        self
    }

    pub fn json(mut self, value: &serde_json::Value) -> Self {
        self.body = Some((Bytes::from(value.to_string()), "application/json"));
        self
    }

    /// Add a header; `name` must be lowercase
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Follow redirects with GET requests, recording each hop
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    pub async fn send(self) -> TestResponse {
        let mut target = if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query.to_urlencoded())
        };
        let mut request = self.build(self.method.clone(), &target, true);
        let mut chain = Vec::new();

        loop {
            let response = self.client.execute(request).await;
            if !(self.follow && response.is_redirect()) || chain.len() >= MAX_REDIRECTS {
                return TestResponse::new(target, response, chain);
            }
            let Some(location) = response.header_value("location").map(local_path) else {
                return TestResponse::new(target, response, chain);
            };
            chain.push((location.clone(), response.status_code()));
            target = location;
            request = self.build(Method::GET, &target, false);
        }
    }

    fn build(&self, method: Method, target: &str, with_body: bool) -> Request {
        let uri: Uri = target
            .parse()
            .unwrap_or_else(|e| panic!("invalid test request path {:?}: {}", target, e));
        let mut request = Request::new(method, uri);
        for (name, value) in &self.headers {
            request = request.with_header(*name, value);
        }
        if let Some(cookies) = self.client.cookie_header() {
            request = request.with_header("cookie", &cookies);
        }
        if with_body {
            if let Some((body, content_type)) = &self.body {
                request = request
                    .with_header("content-type", content_type)
                    .with_body(body.clone());
            }
        }
        request
    }
}

/// Strip scheme and host from an absolute redirect target
fn local_path(location: &str) -> String {
    match location.split_once("://") {
        Some((_, rest)) => match rest.find('/') {
            Some(index) => rest[index..].to_string(),
            None => "/".to_string(),
        },
        None => location.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, Redirect, Response};

    async fn login(_req: Request) -> Response {
        Ok(HttpResponse::from(Redirect::to("/home/"))
            .header("Set-Cookie", "sessionid=abc; Path=/; HttpOnly"))
    }

    async fn home(req: Request) -> Response {
        let session = req.cookie("sessionid").unwrap_or_default();
        HttpResponse::text(format!("session={}", session)).ok()
    }

    async fn logout(_req: Request) -> Response {
        HttpResponse::text("bye")
            .header("Set-Cookie", "sessionid=; Path=/; Max-Age=0")
            .ok()
    }

    fn client() -> TestClient {
        let router: Router = Router::new()
            .post("/login/", login)
            .get("/home/", home)
            .post("/logout/", logout)
            .into();
        TestClient::new(router)
    }

    #[tokio::test]
    async fn redirects_are_followed_with_cookies() {
        let client = client();
        let response = client.post("/login/").follow_redirects(true).send().await;
        response.assert_status(200).assert_contains("session=abc");
        assert_eq!(response.redirect_chain(), &[("/home/".to_string(), 302)]);
    }

    #[tokio::test]
    async fn expired_cookie_is_dropped() {
        let client = client();
        client.post("/login/").send().await.assert_redirect("/home/");
        assert_eq!(client.cookie("sessionid").as_deref(), Some("abc"));

        client.post("/logout/").send().await;
        assert_eq!(client.cookie("sessionid"), None);
    }

    #[test]
    fn absolute_locations_become_paths() {
        assert_eq!(local_path("http://testserver/about/?a=1"), "/about/?a=1");
        assert_eq!(local_path("/about/"), "/about/");
    }
}
