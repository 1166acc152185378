//! Permission registry and role-based checks
//!
//! Apps declare permissions as statics and submit them to the registry at
//! link time; [`sync`] persists every registered permission at bootstrap.
//!
//! ```rust,ignore
//! pub static PERMISSION_WORKFLOW_VIEW: Permission =
//!     Permission::new("document_states", "workflow_view", "View workflows");
//! inventory::submit!(PermissionEntry(&PERMISSION_WORKFLOW_VIEW));
//! ```

use kit::FrameworkError;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

use crate::models::{role_permissions, roles, stored_permissions, users};

/// A permission declared by an app
#[derive(Debug, PartialEq, Eq)]
pub struct Permission {
    pub namespace: &'static str,
    pub name: &'static str,
    pub label: &'static str,
}

impl Permission {
    pub const fn new(namespace: &'static str, name: &'static str, label: &'static str) -> Self {
        Self {
            namespace,
            name,
            label,
        }
    }

    /// `namespace.name`
    pub fn key(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    /// Persisted row, created on first use
    pub async fn stored(&self, db: &DatabaseConnection) -> Result<stored_permissions::Model, DbErr> {
        stored_permissions::Entity::get_or_create(db, self.namespace, self.name).await
    }
}

/// Registry entry submitted with `inventory::submit!`
pub struct PermissionEntry(pub &'static Permission);

inventory::collect!(PermissionEntry);

/// Every registered permission, ordered by key
pub fn all() -> Vec<&'static Permission> {
    let mut permissions: Vec<&'static Permission> =
        inventory::iter::<PermissionEntry>.into_iter().map(|entry| entry.0).collect();
    permissions.sort_by_key(|p| (p.namespace, p.name));
    permissions
}

/// Find a registered permission by `namespace.name`
pub fn find(key: &str) -> Option<&'static Permission> {
    inventory::iter::<PermissionEntry>
        .into_iter()
        .map(|entry| entry.0)
        .find(|p| p.key() == key)
}

/// Persist every registered permission, returning how many are registered
pub async fn sync(db: &DatabaseConnection) -> Result<usize, DbErr> {
    let permissions = all();
    for permission in &permissions {
        permission.stored(db).await?;
    }
    tracing::debug!(count = permissions.len(), "Permissions synchronized");
    Ok(permissions.len())
}

/// Ids of the stored rows of `permissions`, skipping ones never stored
pub(crate) async fn stored_ids(
    db: &DatabaseConnection,
    permissions: &[&Permission],
) -> Result<Vec<i64>, DbErr> {
    let mut ids = Vec::with_capacity(permissions.len());
    for permission in permissions {
        if let Some(stored) =
            stored_permissions::Entity::find_by_key(db, permission.namespace, permission.name).await?
        {
            ids.push(stored.id);
        }
    }
    Ok(ids)
}

/// Ids of the roles bound to the user's groups
pub(crate) async fn user_role_ids(db: &DatabaseConnection, user: &users::Model) -> Result<Vec<i64>, DbErr> {
    let group_ids = user.group_ids(db).await?;
    roles::Entity::ids_for_groups(db, &group_ids).await
}

/// Whether `user` holds any of `permissions` globally
///
/// Superusers hold every permission; other users through the roles bound
/// to their groups.
pub async fn check_permissions(
    db: &DatabaseConnection,
    user: &users::Model,
    permissions: &[&Permission],
) -> Result<bool, DbErr> {
    if user.is_superuser {
        return Ok(true);
    }

    let role_ids = user_role_ids(db, user).await?;
    if role_ids.is_empty() {
        return Ok(false);
    }
    let permission_ids = stored_ids(db, permissions).await?;
    if permission_ids.is_empty() {
        return Ok(false);
    }

    let granted = role_permissions::Entity::find()
        .filter(role_permissions::Column::RoleId.is_in(role_ids))
        .filter(role_permissions::Column::StoredPermissionId.is_in(permission_ids))
        .count(db)
        .await?;
    Ok(granted > 0)
}

/// [`check_permissions`] as a 403 on denial
pub async fn require_permissions(
    db: &DatabaseConnection,
    user: &users::Model,
    permissions: &[&Permission],
) -> Result<(), FrameworkError> {
    if check_permissions(db, user, permissions).await? {
        Ok(())
    } else {
        tracing::debug!(user = %user.username, "Permission denied");
        Err(FrameworkError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_joins_namespace_and_name() {
        let permission = Permission::new("document_states", "workflow_view", "View workflows");
        assert_eq!(permission.key(), "document_states.workflow_view");
    }

    #[test]
    fn registered_permissions_are_found_by_key() {
        let found = find("document_states.workflow_view").expect("registered");
        assert_eq!(found.label, "View workflows");
        assert!(find("document_states.unknown").is_none());
        assert!(all().len() >= 5);
    }
}
