//! Roles model

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::{role_groups, role_permissions};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub label: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// Ids of the roles bound to any of `group_ids`
    pub async fn ids_for_groups(
        db: &DatabaseConnection,
        group_ids: &[i64],
    ) -> Result<Vec<i64>, DbErr> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut ids: Vec<i64> = role_groups::Entity::find()
            .filter(role_groups::Column::GroupId.is_in(group_ids.iter().copied()))
            .all(db)
            .await?
            .into_iter()
            .map(|binding| binding.role_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

impl Model {
    /// Bind a group to this role; binding twice is a no-op
    pub async fn add_group(&self, db: &DatabaseConnection, group_id: i64) -> Result<(), DbErr> {
        let existing = role_groups::Entity::find()
            .filter(role_groups::Column::RoleId.eq(self.id))
            .filter(role_groups::Column::GroupId.eq(group_id))
            .one(db)
            .await?;
        if existing.is_none() {
            role_groups::ActiveModel {
                role_id: Set(self.id),
                group_id: Set(group_id),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    /// Grant a stored permission globally; granting twice is a no-op
    pub async fn grant(&self, db: &DatabaseConnection, stored_permission_id: i64) -> Result<(), DbErr> {
        let existing = role_permissions::Entity::find()
            .filter(role_permissions::Column::RoleId.eq(self.id))
            .filter(role_permissions::Column::StoredPermissionId.eq(stored_permission_id))
            .one(db)
            .await?;
        if existing.is_none() {
            role_permissions::ActiveModel {
                role_id: Set(self.id),
                stored_permission_id: Set(stored_permission_id),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }
}
