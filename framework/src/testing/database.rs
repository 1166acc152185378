use crate::database::{DatabaseConfig, DbConnection};
use crate::error::FrameworkError;
use sea_orm_migration::MigratorTrait;

/// Private, migrated in-memory SQLite database
///
/// ```rust,ignore
/// let db = TestDatabase::fresh::<Migrator>().await?;
/// let workflows = workflow::Entity::find().all(db.conn().inner()).await?;
/// ```
#[derive(Clone, Debug)]
pub struct TestDatabase {
    conn: DbConnection,
}

impl TestDatabase {
    /// Connect and run every migration of `M`
    pub async fn fresh<M: MigratorTrait>() -> Result<Self, FrameworkError> {
        let conn = DbConnection::connect(&DatabaseConfig::in_memory()).await?;
        M::up(conn.inner(), None).await?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &DbConnection {
        &self.conn
    }

    pub fn into_conn(self) -> DbConnection {
        self.conn
    }
}
