//! Page rendering
//!
//! Handlers return a component name and its props. Browsers get an HTML
//! shell embedding the page object in `data-page`; XHR navigation with
//! `X-Inertia: true` gets the page object as JSON. Either way the response
//! keeps the props as its context so tests can inspect them.

mod config;
mod page;
mod template;

pub use config::ViewConfig;
pub use page::Page;
pub use template::render_template;

use crate::config::Config;
use crate::http::{HttpResponse, Request, Response};
use serde_json::Value;

pub struct View;

impl View {
    /// Render a component with props for this request
    pub fn render(req: &Request, component: &str, props: Value) -> Response {
        let config = Config::get::<ViewConfig>().unwrap_or_default();
        let url = match req.uri().query() {
            Some(query) => format!("{}?{}", req.path(), query),
            None => req.path().to_string(),
        };

        if req.is_inertia() {
            if let Some(version) = req.header("X-Inertia-Version") {
                if *req.method() == http::Method::GET && version != config.version {
                    return Ok(Page::version_conflict(&url));
                }
            }
            return Ok(Page::new(component, props, url).with_config(config).to_json_response());
        }

        Ok(Page::new(component, props, url).with_config(config).to_html_response())
    }

    /// Render an inline template against a JSON object context
    pub fn template(source: &str, context: Value) -> Response {
        let body = render_template(source, &context);
        Ok(HttpResponse::html(body).with_context("template", context))
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Uri};
    use serde_json::json;

    fn request() -> Request {
        Request::new(Method::GET, Uri::from_static("/about/"))
    }

    #[test]
    fn browser_gets_html_shell_with_context() {
        let response = View::render(&request(), "Common/About", json!({"title": "About"})).unwrap();
        assert!(response.body_text().contains("data-page="));
        assert!(response.body_text().contains("About"));
        assert_eq!(response.component(), Some("Common/About"));
        assert_eq!(response.context(), Some(&json!({"title": "About"})));
    }

    #[test]
    fn xhr_gets_page_object() {
        let req = request().with_header("x-inertia", "true");
        let response = View::render(&req, "Common/About", json!({})).unwrap();
        let page: Value = serde_json::from_str(response.body_text()).unwrap();
        assert_eq!(page["component"], "Common/About");
        assert_eq!(page["url"], "/about/");
    }

    #[test]
    fn stale_asset_version_conflicts() {
        let req = request()
            .with_header("x-inertia", "true")
            .with_header("x-inertia-version", "0.0-stale");
        let response = View::render(&req, "Common/About", json!({})).unwrap();
        assert_eq!(response.status_code(), 409);
    }
}
