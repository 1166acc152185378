//! Object-level access control
//!
//! An access control entry grants a role a set of permissions on one
//! object, identified by its content type and id. Holding the permission
//! globally implies access to every object.

use std::collections::HashSet;

use kit::FrameworkError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::models::{access_control_lists as acls, acl_permissions, users, workflows};
use crate::permissions::{self, Permission};

/// Identity of an object access can be granted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub content_type: &'static str,
    pub object_id: i64,
}

/// Objects that carry their own access control entries
pub trait AclObject {
    const CONTENT_TYPE: &'static str;

    fn object_id(&self) -> i64;

    fn acl_ref(&self) -> ObjectRef {
        ObjectRef {
            content_type: Self::CONTENT_TYPE,
            object_id: self.object_id(),
        }
    }
}

impl AclObject for workflows::Model {
    const CONTENT_TYPE: &'static str = "document_states.workflow";

    fn object_id(&self) -> i64 {
        self.id
    }
}

/// Grant `permission` on `object` to a role
pub async fn grant(
    db: &DatabaseConnection,
    role_id: i64,
    permission: &Permission,
    object: ObjectRef,
) -> Result<(), DbErr> {
    let stored = permission.stored(db).await?;

    let acl = match acls::Entity::find()
        .filter(acls::Column::RoleId.eq(role_id))
        .filter(acls::Column::ContentType.eq(object.content_type))
        .filter(acls::Column::ObjectId.eq(object.object_id))
        .one(db)
        .await?
    {
        Some(acl) => acl,
        None => {
            acls::ActiveModel {
                role_id: Set(role_id),
                content_type: Set(object.content_type.to_string()),
                object_id: Set(object.object_id),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };

    let held = acl_permissions::Entity::find()
        .filter(acl_permissions::Column::AclId.eq(acl.id))
        .filter(acl_permissions::Column::StoredPermissionId.eq(stored.id))
        .count(db)
        .await?;
    if held == 0 {
        acl_permissions::ActiveModel {
            acl_id: Set(acl.id),
            stored_permission_id: Set(stored.id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    tracing::debug!(
        role_id,
        permission = %permission.key(),
        content_type = object.content_type,
        object_id = object.object_id,
        "Access granted"
    );
    Ok(())
}

/// Ids of the objects of `content_type` the user may access
///
/// `None` means every object, because a permission is held globally.
pub async fn accessible_ids(
    db: &DatabaseConnection,
    user: &users::Model,
    permissions: &[&Permission],
    content_type: &str,
) -> Result<Option<HashSet<i64>>, DbErr> {
    if permissions::check_permissions(db, user, permissions).await? {
        return Ok(None);
    }

    let role_ids = permissions::user_role_ids(db, user).await?;
    let permission_ids = permissions::stored_ids(db, permissions).await?;
    if role_ids.is_empty() || permission_ids.is_empty() {
        return Ok(Some(HashSet::new()));
    }

    let entries = acls::Entity::find()
        .filter(acls::Column::RoleId.is_in(role_ids))
        .filter(acls::Column::ContentType.eq(content_type))
        .all(db)
        .await?;
    if entries.is_empty() {
        return Ok(Some(HashSet::new()));
    }

    let granted: HashSet<i64> = acl_permissions::Entity::find()
        .filter(acl_permissions::Column::AclId.is_in(entries.iter().map(|acl| acl.id)))
        .filter(acl_permissions::Column::StoredPermissionId.is_in(permission_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|held| held.acl_id)
        .collect();

    Ok(Some(
        entries
            .into_iter()
            .filter(|acl| granted.contains(&acl.id))
            .map(|acl| acl.object_id)
            .collect(),
    ))
}

/// Whether `user` holds any of `permissions` on `object`
pub async fn check_access(
    db: &DatabaseConnection,
    user: &users::Model,
    permissions: &[&Permission],
    object: ObjectRef,
) -> Result<bool, DbErr> {
    Ok(accessible_ids(db, user, permissions, object.content_type)
        .await?
        .map_or(true, |ids| ids.contains(&object.object_id)))
}

/// [`check_access`] as a 403 on denial
pub async fn require_access(
    db: &DatabaseConnection,
    user: &users::Model,
    permissions: &[&Permission],
    object: ObjectRef,
) -> Result<(), FrameworkError> {
    if check_access(db, user, permissions, object).await? {
        Ok(())
    } else {
        tracing::debug!(
            user = %user.username,
            content_type = object.content_type,
            object_id = object.object_id,
            "Access denied"
        );
        Err(FrameworkError::Unauthorized)
    }
}

/// Keep the objects `user` may access with `permission`
pub async fn restrict<T: AclObject>(
    db: &DatabaseConnection,
    user: &users::Model,
    permission: &Permission,
    objects: Vec<T>,
) -> Result<Vec<T>, DbErr> {
    match accessible_ids(db, user, &[permission], T::CONTENT_TYPE).await? {
        None => Ok(objects),
        Some(ids) => Ok(objects
            .into_iter()
            .filter(|object| ids.contains(&object.object_id()))
            .collect()),
    }
}
