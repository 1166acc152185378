use std::net::{AddrParseError, SocketAddr};

use crate::config::env::env;

/// Listener settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request bodies above this many bytes are rejected
    pub max_body_size: usize,
}

impl ServerConfig {
    /// Read `SERVER_HOST`, `SERVER_PORT` and `SERVER_MAX_BODY_SIZE`
    pub fn from_env() -> Self {
        Self {
            host: env("SERVER_HOST", "127.0.0.1".to_string()),
            port: env("SERVER_PORT", 8080),
            max_body_size: env("SERVER_MAX_BODY_SIZE", 10 * 1024 * 1024),
        }
    }

    pub fn addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(host: &str, port: u16) -> ServerConfig {
        ServerConfig {
            host: host.to_string(),
            port,
            max_body_size: 1024,
        }
    }

    #[test]
    fn addr_joins_host_and_port() {
        assert_eq!(server("0.0.0.0", 9000).addr().unwrap().to_string(), "0.0.0.0:9000");
        assert!(server("not a host", 9000).addr().is_err());
    }
}
