mod auth;

pub use auth::AuthConfig;

use kit::Config;

/// Register all application configs
pub fn register_all() {
    Config::register(AuthConfig::from_env());
}
