//! Groups model

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::user_groups;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Add a user to this group; adding a member twice is a no-op
    pub async fn add_user(&self, db: &DatabaseConnection, user_id: i64) -> Result<(), DbErr> {
        let existing = user_groups::Entity::find()
            .filter(user_groups::Column::GroupId.eq(self.id))
            .filter(user_groups::Column::UserId.eq(user_id))
            .one(db)
            .await?;
        if existing.is_none() {
            user_groups::ActiveModel {
                user_id: Set(user_id),
                group_id: Set(self.id),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }
}
