//! Users model

use sea_orm::entity::prelude::*;

use super::user_groups;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub email: String,
    /// bcrypt hash
    pub password: String,
    pub is_superuser: bool,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    pub async fn find_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<Model>, DbErr> {
        Self::find()
            .filter(Column::Username.eq(username))
            .one(db)
            .await
    }
}

impl Model {
    /// Ids of the groups this user belongs to
    pub async fn group_ids(&self, db: &DatabaseConnection) -> Result<Vec<i64>, DbErr> {
        Ok(user_groups::Entity::find()
            .filter(user_groups::Column::UserId.eq(self.id))
            .all(db)
            .await?
            .into_iter()
            .map(|membership| membership.group_id)
            .collect())
    }
}
