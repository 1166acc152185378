use crate::config::env;

/// Page rendering settings
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Title of the HTML shell
    pub title: String,
    /// Vite dev server URL (e.g., "http://localhost:5173")
    pub vite_dev_server: String,
    /// Entry point for the frontend (e.g., "src/main.tsx")
    pub entry_point: String,
    /// Asset version for cache busting
    pub version: String,
    /// Whether we're in development mode (use Vite dev server)
    pub development: bool,
}

impl ViewConfig {
    pub fn from_env() -> Self {
        Self {
            title: env("APP_NAME", "Archivo".to_string()),
            vite_dev_server: env("VITE_DEV_SERVER", "http://localhost:5173".to_string()),
            entry_point: env("VITE_ENTRY_POINT", "src/main.tsx".to_string()),
            version: env("ASSET_VERSION", "1.0".to_string()),
            development: env("VITE_DEVELOPMENT", false),
        }
    }

    pub fn vite_dev_server(mut self, url: impl Into<String>) -> Self {
        self.vite_dev_server = url.into();
        self.development = true;
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
