use super::body::{parse_form, parse_json};
use super::ParamError;
use crate::error::FrameworkError;
use crate::forms::FormData;
use crate::routing::Urls;
use bytes::Bytes;
use http::{Extensions, HeaderMap, HeaderValue, Method, Uri};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// HTTP request with a fully collected body
///
/// The server collects the body before dispatch so the same type can be
/// built in-process by the test client.
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
    extensions: Extensions,
}

impl Request {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: HashMap::new(),
            extensions: Extensions::new(),
        }
    }

    /// Build a request from hyper parts and an already collected body
    pub fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            params: HashMap::new(),
            extensions: parts.extensions,
        }
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a header, ignoring values that are not valid header text
    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Raw query string, without the leading `?`
    pub fn query_string(&self) -> &str {
        self.uri.query().unwrap_or("")
    }

    /// Get a route parameter by name (e.g., /workflows/{workflow_id})
    pub fn param(&self, name: &str) -> Result<&str, ParamError> {
        self.params
            .get(name)
            .map(|s| s.as_str())
            .ok_or_else(|| ParamError {
                param_name: name.to_string(),
            })
    }

    /// Parse a route parameter into an integer id
    pub fn param_id(&self, name: &str) -> Result<i64, FrameworkError> {
        let raw = self.param(name)?;
        raw.parse()
            .map_err(|_| FrameworkError::param_parse(raw, "i64"))
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Check if this is an XHR page request (`X-Inertia: true`)
    pub fn is_inertia(&self) -> bool {
        self.header("X-Inertia")
            .map(|v| v == "true")
            .unwrap_or(false)
    }

    /// Look up a cookie sent with the request
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all("cookie")
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Typed value previously stored in the request extensions
    pub fn extension<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.extensions.get::<T>().cloned()
    }

    /// Path of a named route of the router serving this request
    pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Result<String, FrameworkError> {
        let urls = self
            .extensions
            .get::<Urls>()
            .ok_or_else(|| FrameworkError::internal("request was not dispatched by a router"))?;
        Ok(urls.reverse(name, params)?)
    }

    /// Parse the query string into a type
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        serde_urlencoded::from_str(self.query_string())
            .map_err(|e| FrameworkError::internal(format!("Failed to parse query string: {}", e)))
    }

    /// Query string as a multi-valued field map
    pub fn query_data(&self) -> FormData {
        FormData::from_query(self.query_string())
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        parse_json(&self.body)
    }

    pub fn form<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        parse_form(&self.body)
    }

    /// Body as a multi-valued field map
    ///
    /// JSON bodies are flattened: arrays become repeated values.
    pub fn form_data(&self) -> Result<FormData, FrameworkError> {
        match self.content_type() {
            Some(ct) if ct.starts_with("application/json") => {
                let value: serde_json::Value = parse_json(&self.body)?;
                Ok(FormData::from_json(&value))
            }
            _ => Ok(FormData::from_bytes(&self.body)),
        }
    }

    /// Parse the request body based on Content-Type header
    ///
    /// - `application/x-www-form-urlencoded` -> Form parsing
    /// - Otherwise -> JSON parsing (default)
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        match self.content_type() {
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                parse_form(&self.body)
            }
            _ => parse_json(&self.body),
        }
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("params", &self.params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_lookup_splits_pairs() {
        let request = Request::new(Method::GET, Uri::from_static("/"))
            .with_header("cookie", "theme=dark; sessionid=abc123");
        assert_eq!(request.cookie("sessionid").as_deref(), Some("abc123"));
        assert_eq!(request.cookie("missing"), None);
    }

    #[test]
    fn param_id_rejects_non_numeric() {
        let mut params = HashMap::new();
        params.insert("workflow_id".to_string(), "abc".to_string());
        let request = Request::new(Method::GET, Uri::from_static("/")).with_params(params);
        let err = request.param_id("workflow_id").unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(request.param_id("other").is_err());
    }

    #[test]
    fn form_data_reads_urlencoded_body() {
        let request = Request::new(Method::POST, Uri::from_static("/"))
            .with_header("content-type", "application/x-www-form-urlencoded")
            .with_body("tags=1&tags=2&label=Review");
        let data = request.form_data().unwrap();
        assert_eq!(data.get_all("tags"), vec!["1", "2"]);
        assert_eq!(data.get("label"), Some("Review"));
    }
}
