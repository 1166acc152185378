//! Database connection management

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::database::config::DatabaseConfig;
use crate::error::FrameworkError;

/// Clonable handle to a SeaORM connection pool
///
/// Handlers receive it through the request extensions
/// (see [`Router::state`](crate::Router::state)).
#[derive(Clone)]
pub struct DbConnection {
    inner: Arc<DatabaseConnection>,
}

impl DbConnection {
    /// Connect using `config`
    ///
    /// File-backed SQLite databases are created, with their parent
    /// directories, when missing.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, FrameworkError> {
        let url = sqlite_file_url(&config.url)?;

        let mut opt = ConnectOptions::new(&url);
        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .sqlx_logging(config.logging);

        let conn = Database::connect(opt)
            .await
            .map_err(|e| FrameworkError::database(e.to_string()))?;

        tracing::debug!(backend = ?config.database_type(), "Database connected");
        Ok(Self::from(conn))
    }

    /// Get a reference to the underlying SeaORM connection
    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }
}

fn sqlite_file_url(url: &str) -> Result<String, FrameworkError> {
    let Some(path) = url.strip_prefix("sqlite://") else {
        return Ok(url.to_string());
    };
    let path = path.trim_start_matches("./");
    if path.starts_with(":memory:") {
        return Ok("sqlite::memory:".to_string());
    }

    let file = Path::new(path);
    if let Some(parent) = file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FrameworkError::database(format!("Cannot create {}: {}", parent.display(), e))
            })?;
        }
    }
    Ok(format!("sqlite:{}?mode=rwc", path))
}

impl From<DatabaseConnection> for DbConnection {
    fn from(conn: DatabaseConnection) -> Self {
        Self {
            inner: Arc::new(conn),
        }
    }
}

impl AsRef<DatabaseConnection> for DbConnection {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.inner
    }
}

impl std::ops::Deref for DbConnection {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::fmt::Debug for DbConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConnection").finish_non_exhaustive()
    }
}
