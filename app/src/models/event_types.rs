//! Event types model

use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "event_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// `namespace.name`
    #[sea_orm(unique)]
    pub name: String,
    pub label: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<Model>, DbErr> {
        Self::find().filter(Column::Name.eq(name)).one(db).await
    }

    /// Every stored event type, by name
    pub async fn all(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
        Self::find().order_by_asc(Column::Name).all(db).await
    }
}
