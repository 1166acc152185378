//! Tags model

use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub label: String,
    pub color: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    pub async fn all(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
        Self::find().order_by_asc(Column::Label).all(db).await
    }
}
