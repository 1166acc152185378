pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_accounts_tables;
mod m20250101_000002_create_permission_tables;
mod m20250101_000003_create_event_types_table;
mod m20250101_000004_create_tags_table;
mod m20250101_000005_create_document_states_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_accounts_tables::Migration),
            Box::new(m20250101_000002_create_permission_tables::Migration),
            Box::new(m20250101_000003_create_event_types_table::Migration),
            Box::new(m20250101_000004_create_tags_table::Migration),
            Box::new(m20250101_000005_create_document_states_tables::Migration),
        ]
    }
}
