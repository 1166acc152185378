//! Cookie-keyed server-side sessions
//!
//! The store keeps session values in memory, keyed by a random token sent
//! to the client in the session cookie.

use crate::config::env;
use crate::http::Request;
use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

const TOKEN_LENGTH: usize = 40;

/// Session cookie settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name of the session cookie
    pub cookie_name: String,
    /// Seconds a session stays valid after it is written
    pub ttl_secs: i64,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            cookie_name: env("SESSION_COOKIE", "sessionid".to_string()),
            ttl_secs: env("SESSION_TTL_SECS", 60 * 60 * 24 * 14),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[derive(Debug, Clone)]
struct SessionData {
    values: HashMap<String, Value>,
    expires_at: DateTime<Utc>,
}

/// Shared in-memory session store
#[derive(Debug, Clone)]
pub struct SessionStore {
    config: SessionConfig,
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start a new session holding `values`, returning its token
    pub fn create(&self, values: HashMap<String, Value>) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();
        let data = SessionData {
            values,
            expires_at: Utc::now() + Duration::seconds(self.config.ttl_secs),
        };
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(token.clone(), data);
        }
        token
    }

    /// Value stored under `key` in an unexpired session
    pub fn get(&self, token: &str, key: &str) -> Option<Value> {
        let sessions = self.sessions.read().ok()?;
        let data = sessions.get(token)?;
        if data.expires_at <= Utc::now() {
            return None;
        }
        data.values.get(key).cloned()
    }

    /// Drop a session; unknown tokens are ignored
    pub fn destroy(&self, token: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(token);
        }
    }

    /// Remove every expired session
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        match self.sessions.write() {
            Ok(mut sessions) => {
                let before = sessions.len();
                sessions.retain(|_, data| data.expires_at > now);
                before - sessions.len()
            }
            Err(_) => 0,
        }
    }

    /// Session token carried by the request cookie
    pub fn token(&self, request: &Request) -> Option<String> {
        request.cookie(&self.config.cookie_name)
    }

    /// `Set-Cookie` value establishing `token`
    pub fn cookie(&self, token: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.config.cookie_name, token, self.config.ttl_secs
        )
    }

    /// `Set-Cookie` value clearing the session cookie
    pub fn expired_cookie(&self) -> String {
        format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            self.config.cookie_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Uri};
    use serde_json::json;

    fn store(ttl_secs: i64) -> SessionStore {
        SessionStore::new(SessionConfig {
            cookie_name: "sessionid".to_string(),
            ttl_secs,
        })
    }

    #[test]
    fn created_session_is_readable_until_destroyed() {
        let store = store(60);
        let token = store.create(HashMap::from([("user_id".to_string(), json!(4))]));
        assert_eq!(store.get(&token, "user_id"), Some(json!(4)));

        let request = Request::new(Method::GET, Uri::from_static("/"))
            .with_header("cookie", &format!("sessionid={}", token));
        assert_eq!(store.token(&request).as_deref(), Some(token.as_str()));

        store.destroy(&token);
        assert_eq!(store.get(&token, "user_id"), None);
    }

    #[test]
    fn expired_sessions_are_ignored_and_purged() {
        let store = store(-1);
        let token = store.create(HashMap::from([("user_id".to_string(), json!(1))]));
        assert_eq!(store.get(&token, "user_id"), None);
        assert_eq!(store.purge_expired(), 1);
    }

    #[test]
    fn cookies_carry_configured_name() {
        let store = store(60);
        assert!(store.cookie("abc").starts_with("sessionid=abc;"));
        assert!(store.expired_cookie().contains("Max-Age=0"));
    }
}
