//! Configuration
//!
//! `.env` files are loaded by environment precedence, then typed config
//! structs are built from the environment and stored in a type-keyed
//! repository.
//!
//! ```rust,no_run
//! use kit::{Config, ServerConfig};
//!
//! Config::init(std::path::Path::new("."));
//! let server = Config::get::<ServerConfig>().unwrap_or_default();
//! println!("Server port: {}", server.port);
//! ```

pub mod env;
pub mod providers;
pub mod repository;

pub use env::{env, env_optional, load_dotenv, Environment};
pub use providers::{AppConfig, ServerConfig};

use crate::database::DatabaseConfig;
use crate::session::SessionConfig;
use crate::view::ViewConfig;
use std::path::Path;

/// Facade over the config repository
pub struct Config;

impl Config {
    /// Load `.env` files and register the framework's config structs
    ///
    /// Returns the detected environment.
    pub fn init(project_root: &Path) -> Environment {
        let env = env::load_dotenv(project_root);

        repository::register(AppConfig::from_env());
        repository::register(ServerConfig::from_env());
        repository::register(DatabaseConfig::from_env());
        repository::register(SessionConfig::from_env());
        repository::register(ViewConfig::from_env());

        env
    }

    /// Get a typed config struct from the repository
    pub fn get<T: std::any::Any + Send + Sync + Clone + 'static>() -> Option<T> {
        repository::get::<T>()
    }

    /// Register a config struct, replacing any previous one of the same type
    pub fn register<T: std::any::Any + Send + Sync + 'static>(config: T) {
        repository::register(config);
    }

    /// Check if a config type is registered
    pub fn has<T: std::any::Any + 'static>() -> bool {
        repository::has::<T>()
    }

    /// Current environment, from `AppConfig` when registered
    pub fn environment() -> Environment {
        Config::get::<AppConfig>()
            .map(|c| c.environment)
            .unwrap_or_else(Environment::detect)
    }

    pub fn is_production() -> bool {
        Self::environment().is_production()
    }

    pub fn is_debug() -> bool {
        Config::get::<AppConfig>().map(|c| c.debug).unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct PreviewConfig {
        dpi: u32,
    }

    #[test]
    fn registered_config_is_retrievable_by_type() {
        assert!(!Config::has::<PreviewConfig>());
        Config::register(PreviewConfig { dpi: 96 });
        assert_eq!(Config::get::<PreviewConfig>(), Some(PreviewConfig { dpi: 96 }));
    }
}
