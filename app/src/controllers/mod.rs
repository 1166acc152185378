//! Request handlers
//!
//! Each handler resolves its objects, checks the acting user's access, and
//! renders a page component. Invalid submissions re-render the form with
//! the errors and status 422.

pub mod actions;
pub mod authentication;
pub mod common;
pub mod instances;
pub mod states;
pub mod transitions;
pub mod workflows;

use kit::{FormRequest, FrameworkError, Request, Response, ResponseExt, ValidationErrors, View};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::Value;

use crate::acls::{self, AclObject};
use crate::document_states::permissions::PERMISSION_WORKFLOW_EDIT;
use crate::models::workflows as workflow_models;
use crate::models::{
    users, workflow_instances, workflow_state_actions, workflow_states, workflow_transitions,
};

/// Render `component` again with the submission's errors
pub(crate) fn form_invalid(
    req: &Request,
    component: &str,
    mut props: Value,
    errors: &ValidationErrors,
) -> Response {
    tracing::debug!(component, errors = ?errors.errors, "Form submission rejected");
    props["errors"] = errors.to_json()["errors"].clone();
    View::render(req, component, props).status(422)
}

/// Validate a static form, keeping invalid submissions apart from failures
pub(crate) fn validated<T: FormRequest>(
    req: &Request,
) -> Result<Result<T, ValidationErrors>, FrameworkError> {
    match T::extract(req) {
        Ok(form) => Ok(Ok(form)),
        Err(FrameworkError::Validation(errors)) => Ok(Err(errors)),
        Err(e) => Err(e),
    }
}

pub(crate) async fn find_workflow(
    db: &DatabaseConnection,
    id: i64,
) -> Result<workflow_models::Model, FrameworkError> {
    workflow_models::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| FrameworkError::model_not_found("Workflow"))
}

pub(crate) async fn find_state(
    db: &DatabaseConnection,
    id: i64,
) -> Result<workflow_states::Model, FrameworkError> {
    workflow_states::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| FrameworkError::model_not_found("Workflow state"))
}

pub(crate) async fn find_transition(
    db: &DatabaseConnection,
    id: i64,
) -> Result<workflow_transitions::Model, FrameworkError> {
    workflow_transitions::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| FrameworkError::model_not_found("Workflow transition"))
}

pub(crate) async fn find_action(
    db: &DatabaseConnection,
    id: i64,
) -> Result<workflow_state_actions::Model, FrameworkError> {
    workflow_state_actions::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| FrameworkError::model_not_found("Workflow state action"))
}

pub(crate) async fn find_instance(
    db: &DatabaseConnection,
    id: i64,
) -> Result<workflow_instances::Model, FrameworkError> {
    workflow_instances::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| FrameworkError::model_not_found("Workflow instance"))
}

/// The workflow, once `user` is allowed to edit it
pub(crate) async fn editable_workflow(
    db: &DatabaseConnection,
    user: &users::Model,
    workflow_id: i64,
) -> Result<workflow_models::Model, FrameworkError> {
    let workflow = find_workflow(db, workflow_id).await?;
    acls::require_access(db, user, &[&PERMISSION_WORKFLOW_EDIT], workflow.acl_ref()).await?;
    Ok(workflow)
}
