//! Application bootstrap
//!
//! Runs once against the migrated database before the server starts:
//! registered permissions and event types get their database rows.

use kit::{DbConnection, FrameworkError};

use crate::{events, permissions};

pub async fn register(db: DbConnection) -> Result<(), FrameworkError> {
    let permissions = permissions::sync(&db).await?;
    let events = events::sync(&db).await?;
    tracing::info!(permissions, event_types = events.len(), "Registries synchronized");
    Ok(())
}
