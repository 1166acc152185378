//! Testing utilities
//!
//! - [`TestClient`]: dispatches requests into a router in-process, with a
//!   cookie jar and redirect following;
//! - [`TestResponse`]: chainable assertions on status, body and context;
//! - [`TestDatabase`]: a private migrated in-memory SQLite database.
//!
//! ```rust,ignore
//! let db = TestDatabase::fresh::<Migrator>().await?;
//! let client = TestClient::new(routes::register(AppState::new(db.into_conn())));
//!
//! client.get("/about/").send().await.assert_ok().assert_contains("About");
//! ```

mod client;
mod database;
mod response;

pub use client::{TestClient, TestRequest};
pub use database::TestDatabase;
pub use response::TestResponse;
