use kit::config::env;

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// bcrypt work factor used when hashing passwords
    pub hash_cost: u32,
    /// Where a login without `next` lands
    pub login_redirect: String,
}

impl AuthConfig {
    /// Build config from environment variables
    pub fn from_env() -> Self {
        Self {
            hash_cost: env("AUTH_HASH_COST", bcrypt::DEFAULT_COST),
            login_redirect: env("LOGIN_REDIRECT_URL", "/about/".to_string()),
        }
    }

    /// Current config, falling back to the environment when unregistered
    pub fn current() -> Self {
        kit::Config::get::<Self>().unwrap_or_else(Self::from_env)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
