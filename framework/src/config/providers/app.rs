use crate::config::env::{env, Environment};

/// Application-wide settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    pub debug: bool,
    /// Public base URL
    pub url: String,
    /// Default `tracing` filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl AppConfig {
    /// Read `APP_NAME`, `APP_DEBUG`, `APP_URL` and `LOG_LEVEL`
    pub fn from_env() -> Self {
        Self {
            name: env("APP_NAME", "Archivo".to_string()),
            environment: Environment::detect(),
            debug: env("APP_DEBUG", false),
            url: env("APP_URL", "http://localhost:8080".to_string()),
            log_level: env("LOG_LEVEL", "info".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_production_environment_is_production() {
        let mut config = AppConfig {
            environment: Environment::Testing,
            ..AppConfig::from_env()
        };
        assert!(!config.is_production());
        config.environment = Environment::Production;
        assert!(config.is_production());
    }
}
