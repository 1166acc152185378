//! Web framework layer for the Archivo document manager
//!
//! Request/response types, an explicit ordered router, middleware,
//! sessions, forms, page rendering, configuration, database access and
//! test tooling.

pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod forms;
pub mod http;
pub mod middleware;
pub mod routing;
pub mod server;
pub mod session;
pub mod testing;
pub mod view;

pub use app::Application;
pub use config::{AppConfig, Config, Environment, ServerConfig};
pub use database::{db, DatabaseConfig, DbConnection};
pub use error::{AppError, FrameworkError, HttpError, ValidationErrors};
pub use forms::{DynamicForm, Field, FormData, ManagementForm};
pub use http::{json, text, FormRequest, HttpResponse, Redirect, Request, Response, ResponseExt};
pub use middleware::{Middleware, Next, RequestLogger};
pub use routing::{Route, RouteError, Router, Urls};
pub use server::Server;
pub use session::{SessionConfig, SessionStore};
pub use view::View;

pub use async_trait::async_trait;