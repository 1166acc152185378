use crate::http::HttpResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Response returned by [`TestClient`](super::TestClient) with assertion helpers
///
/// Assertions panic with the expected and received values and return
/// `&Self` so they can be chained.
#[derive(Debug, Clone)]
pub struct TestResponse {
    path: String,
    response: HttpResponse,
    redirect_chain: Vec<(String, u16)>,
}

impl TestResponse {
    pub(crate) fn new(path: String, response: HttpResponse, redirect_chain: Vec<(String, u16)>) -> Self {
        Self {
            path,
            response,
            redirect_chain,
        }
    }

    /// Path of the final request, after any redirects
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn status(&self) -> u16 {
        self.response.status_code()
    }

    pub fn text(&self) -> &str {
        self.response.body_text()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.response.header_value(name)
    }

    /// Props the response was rendered with
    pub fn context(&self) -> Option<&Value> {
        self.response.context()
    }

    pub fn component(&self) -> Option<&str> {
        self.response.component()
    }

    /// `(location, status)` of every redirect followed
    pub fn redirect_chain(&self) -> &[(String, u16)] {
        &self.redirect_chain
    }

    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_str(self.text())
            .unwrap_or_else(|e| panic!("{}\n  body is not valid JSON: {}\n", self.header_line(), e))
    }

    pub fn inner(&self) -> &HttpResponse {
        &self.response
    }

    fn header_line(&self) -> String {
        format!("\nassertion failed for {} (status {})", self.path, self.status())
    }

    pub fn assert_status(&self, expected: u16) -> &Self {
        if self.status() != expected {
            panic!(
                "{}\n  expected status\n\n  Expected: {}\n  Received: {}\n  Body: {}\n",
                self.header_line(),
                expected,
                self.status(),
                truncate(self.text())
            );
        }
        self
    }

    pub fn assert_ok(&self) -> &Self {
        self.assert_status(200)
    }

    /// Assert a redirect whose `Location` starts with `prefix`
    pub fn assert_redirect(&self, prefix: &str) -> &Self {
        let location = self.header("location").unwrap_or_default();
        if !self.response.is_redirect() || !location.starts_with(prefix) {
            panic!(
                "{}\n  expected redirect\n\n  Expected: {}...\n  Received: {} {}\n",
                self.header_line(),
                prefix,
                self.status(),
                location
            );
        }
        self
    }

    /// Assert the body contains `needle`
    pub fn assert_contains(&self, needle: &str) -> &Self {
        if !self.text().contains(needle) {
            panic!(
                "{}\n  expected body to contain\n\n  Expected: {:?}\n  Received: {}\n",
                self.header_line(),
                needle,
                truncate(self.text())
            );
        }
        self
    }

    pub fn assert_not_contains(&self, needle: &str) -> &Self {
        if self.text().contains(needle) {
            panic!(
                "{}\n  expected body not to contain\n\n  Expected NOT: {:?}\n  Received: {}\n",
                self.header_line(),
                needle,
                truncate(self.text())
            );
        }
        self
    }

    /// Assert the rendering context holds `key`
    pub fn assert_context_has(&self, key: &str) -> &Self {
        if self.context().and_then(|c| c.get(key)).is_none() {
            panic!(
                "{}\n  expected context key\n\n  Expected: {:?}\n  Received: {:?}\n",
                self.header_line(),
                key,
                self.context()
            );
        }
        self
    }
}

fn truncate(text: &str) -> String {
    const LIMIT: usize = 500;
    match text.char_indices().nth(LIMIT) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}
