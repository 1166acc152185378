//! Named route reversal

use super::RouteError;
use std::collections::HashMap;
use std::sync::Arc;

/// Snapshot of a router's named routes
///
/// The router stores one in every request's extensions so handlers can
/// build links without reaching for a global table.
#[derive(Debug, Clone, Default)]
pub struct Urls {
    names: Arc<HashMap<String, String>>,
}

impl Urls {
    pub fn new(names: HashMap<String, String>) -> Self {
        Self {
            names: Arc::new(names),
        }
    }

    pub fn pattern(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    /// Substitute `{param}` segments of the named route's pattern
    pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        let pattern = self.names.get(name).ok_or_else(|| RouteError::NotFound {
            name: name.to_string(),
        })?;

        let mut url = pattern.clone();
        for (key, value) in params {
            url = url.replace(&format!("{{{}}}", key), value);
        }

        if let Some(start) = url.find('{') {
            let param = url[start + 1..]
                .split('}')
                .next()
                .unwrap_or_default()
                .to_string();
            return Err(RouteError::MissingParameter {
                name: name.to_string(),
                param,
            });
        }
        Ok(url)
    }
}
