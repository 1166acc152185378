//! Permissions persisted so roles and ACLs can reference them

use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "stored_permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub namespace: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    pub async fn find_by_key(
        db: &DatabaseConnection,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Model>, DbErr> {
        Self::find()
            .filter(Column::Namespace.eq(namespace))
            .filter(Column::Name.eq(name))
            .one(db)
            .await
    }

    /// The row for `namespace.name`, created when missing
    pub async fn get_or_create(
        db: &DatabaseConnection,
        namespace: &str,
        name: &str,
    ) -> Result<Model, DbErr> {
        if let Some(existing) = Self::find_by_key(db, namespace, name).await? {
            return Ok(existing);
        }
        ActiveModel {
            namespace: Set(namespace.to_string()),
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
    }
}
