//! Application builder
//!
//! Parses the command line, loads configuration, installs the tracing
//! subscriber and connects the database before running the command.
//!
//! # Example
//!
//! ```rust,ignore
//! use kit::Application;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     Application::new()
//!         .config(config::register_all)
//!         .bootstrap(bootstrap::register)
//!         .routes(routes::register)
//!         .migrations::<migrations::Migrator>()
//!         .run()
//!         .await
//! }
//! ```

use crate::config::{AppConfig, Config};
use crate::database::{DatabaseConfig, DbConnection};
use crate::error::FrameworkError;
use crate::{Router, Server};
use clap::{Parser, Subcommand};
use sea_orm_migration::{MigrationTrait, MigratorTrait};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;
type BootstrapFn =
    Box<dyn FnOnce(DbConnection) -> Pin<Box<dyn Future<Output = Result<(), FrameworkError>> + Send>> + Send>;
type RoutesFn = Box<dyn FnOnce(DbConnection) -> Router + Send>;

#[derive(Parser)]
#[command(name = "archivo")]
#[command(about = "Archivo application server and utilities")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (default command)
    Serve {
        /// Skip running migrations on startup
        #[arg(long)]
        no_migrate: bool,
    },
    /// Run pending database migrations
    Migrate,
    /// Show migration status
    #[command(name = "migrate:status")]
    MigrateStatus,
    /// Rollback the last migration(s)
    #[command(name = "migrate:rollback")]
    MigrateRollback {
        /// Number of migrations to rollback
        #[arg(default_value = "1")]
        steps: u32,
    },
    /// Drop all tables and re-run all migrations
    #[command(name = "migrate:fresh")]
    MigrateFresh,
}

/// Application builder
pub struct Application<M = NoMigrator>
where
    M: MigratorTrait,
{
    config_fn: Option<Box<dyn FnOnce()>>,
    bootstrap_fn: Option<BootstrapFn>,
    routes_fn: Option<RoutesFn>,
    _migrator: std::marker::PhantomData<M>,
}

/// Placeholder type for when no migrator is configured
pub struct NoMigrator;

impl MigratorTrait for NoMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![]
    }
}

impl Application<NoMigrator> {
    pub fn new() -> Self {
        Application {
            config_fn: None,
            bootstrap_fn: None,
            routes_fn: None,
            _migrator: std::marker::PhantomData,
        }
    }
}

impl Default for Application<NoMigrator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Application<M>
where
    M: MigratorTrait,
{
    /// Register application config structs, after the framework's own
    pub fn config<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.config_fn = Some(Box::new(f));
        self
    }

    /// Async setup run against the migrated database before serving
    pub fn bootstrap<F, Fut>(mut self, f: F) -> Self
    where
        F: FnOnce(DbConnection) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), FrameworkError>> + Send + 'static,
    {
        self.bootstrap_fn = Some(Box::new(move |db| Box::pin(f(db))));
        self
    }

    /// Build the router from the database connection
    pub fn routes<F>(mut self, f: F) -> Self
    where
        F: FnOnce(DbConnection) -> Router + Send + 'static,
    {
        self.routes_fn = Some(Box::new(f));
        self
    }

    /// Configure the migrator type for database migrations
    pub fn migrations<NewM>(self) -> Application<NewM>
    where
        NewM: MigratorTrait,
    {
        Application {
            config_fn: self.config_fn,
            bootstrap_fn: self.bootstrap_fn,
            routes_fn: self.routes_fn,
            _migrator: std::marker::PhantomData,
        }
    }

    /// Parse the command line and run the chosen command
    pub async fn run(self) -> Result<(), BoxError> {
        let cli = Cli::parse();

        Config::init(Path::new("."));
        init_tracing(&Config::get::<AppConfig>().unwrap_or_default());

        let Application {
            config_fn,
            bootstrap_fn,
            routes_fn,
            _migrator,
        } = self;

        if let Some(config_fn) = config_fn {
            config_fn();
        }

        let db = DbConnection::connect(&Config::get::<DatabaseConfig>().unwrap_or_default()).await?;

        match cli.command {
            None | Some(Commands::Serve { no_migrate: false }) => {
                M::up(db.inner(), None).await?;
                tracing::info!("Migrations applied");
                Self::serve(db, bootstrap_fn, routes_fn).await
            }
            Some(Commands::Serve { no_migrate: true }) => {
                Self::serve(db, bootstrap_fn, routes_fn).await
            }
            Some(Commands::Migrate) => {
                M::up(db.inner(), None).await?;
                tracing::info!("Migrations completed");
                Ok(())
            }
            Some(Commands::MigrateStatus) => {
                M::status(db.inner()).await?;
                Ok(())
            }
            Some(Commands::MigrateRollback { steps }) => {
                M::down(db.inner(), Some(steps)).await?;
                tracing::info!(steps, "Rollback completed");
                Ok(())
            }
            Some(Commands::MigrateFresh) => {
                tracing::warn!("Dropping all tables and re-running migrations");
                M::fresh(db.inner()).await?;
                Ok(())
            }
        }
    }

    async fn serve(
        db: DbConnection,
        bootstrap_fn: Option<BootstrapFn>,
        routes_fn: Option<RoutesFn>,
    ) -> Result<(), BoxError> {
        if let Some(bootstrap_fn) = bootstrap_fn {
            bootstrap_fn(db.clone()).await?;
        }

        let router = match routes_fn {
            Some(routes_fn) => routes_fn(db),
            None => Router::new(),
        };

        Server::from_config(router).run().await
    }
}

/// Install the fmt subscriber; `RUST_LOG` wins over the configured level
pub fn init_tracing(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
