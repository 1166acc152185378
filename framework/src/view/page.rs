use super::config::ViewConfig;
use crate::http::HttpResponse;
use serde_json::{json, Value};

/// A component plus its props, rendered either as the HTML shell or as
/// the JSON page object for `X-Inertia` requests
pub struct Page {
    component: String,
    props: Value,
    url: String,
    config: ViewConfig,
}

impl Page {
    pub fn new(component: impl Into<String>, props: Value, url: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            props,
            url: url.into(),
            config: ViewConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ViewConfig) -> Self {
        self.config = config;
        self
    }

    fn page_object(&self) -> Value {
        json!({
            "component": self.component,
            "props": self.props,
            "url": self.url,
            "version": self.config.version,
        })
    }

    /// JSON page object for XHR requests (X-Inertia: true)
    pub fn to_json_response(&self) -> HttpResponse {
        HttpResponse::json(self.page_object())
            .header("X-Inertia", "true")
            .header("Vary", "X-Inertia")
            .with_context(self.component.clone(), self.props.clone())
    }

    /// HTML shell for initial page loads
    pub fn to_html_response(&self) -> HttpResponse {
        let page_json = super::escape_html(&self.page_object().to_string());

        let scripts = if self.config.development {
            format!(
                r#"    <script type="module" src="{server}/@vite/client"></script>
    <script type="module" src="{server}/{entry}"></script>"#,
                server = self.config.vite_dev_server,
                entry = self.config.entry_point,
            )
        } else {
            r#"    <script type="module" src="/assets/main.js"></script>
    <link rel="stylesheet" href="/assets/main.css">"#
                .to_string()
        };

        let html = format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
{scripts}
</head>
<body>
    <div id="app" data-page="{page}"></div>
</body>
</html>"#,
            title = super::escape_html(&self.config.title),
            scripts = scripts,
            page = page_json,
        );

        HttpResponse::html(html)
            .header("Vary", "X-Inertia")
            .with_context(self.component.clone(), self.props.clone())
    }

    /// 409 Conflict telling the client to reload on asset version mismatch
    pub fn version_conflict(url: &str) -> HttpResponse {
        HttpResponse::new()
            .status(409)
            .header("X-Inertia-Location", url)
    }
}
