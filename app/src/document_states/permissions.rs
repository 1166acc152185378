use crate::permissions::{Permission, PermissionEntry};

pub static PERMISSION_WORKFLOW_VIEW: Permission =
    Permission::new("document_states", "workflow_view", "View workflows");
pub static PERMISSION_WORKFLOW_CREATE: Permission =
    Permission::new("document_states", "workflow_create", "Create workflows");
pub static PERMISSION_WORKFLOW_EDIT: Permission =
    Permission::new("document_states", "workflow_edit", "Edit workflows");
pub static PERMISSION_WORKFLOW_DELETE: Permission =
    Permission::new("document_states", "workflow_delete", "Delete workflows");
pub static PERMISSION_WORKFLOW_TRANSITION: Permission =
    Permission::new("document_states", "workflow_transition", "Transition workflows");

inventory::submit!(PermissionEntry(&PERMISSION_WORKFLOW_VIEW));
inventory::submit!(PermissionEntry(&PERMISSION_WORKFLOW_CREATE));
inventory::submit!(PermissionEntry(&PERMISSION_WORKFLOW_EDIT));
inventory::submit!(PermissionEntry(&PERMISSION_WORKFLOW_DELETE));
inventory::submit!(PermissionEntry(&PERMISSION_WORKFLOW_TRANSITION));
