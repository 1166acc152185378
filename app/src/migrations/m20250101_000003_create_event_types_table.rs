use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventTypes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventTypes::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(EventTypes::Label).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventTypes::Table).to_owned())
            .await
    }
}

/// Table and column identifiers for event_types
#[derive(DeriveIden)]
enum EventTypes {
    Table,
    Id,
    Name,
    Label,
}
