//! Permission held by an access control entry

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "acl_permissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub acl_id: i64,
    pub stored_permission_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
