//! Workflow template views

use kit::{HttpResponse, Redirect, Request, Response, View};
use sea_orm::{ActiveModelTrait, ModelTrait, Set};
use serde_json::json;

use super::{find_workflow, form_invalid, validated};
use crate::acls::{self, AclObject};
use crate::auth;
use crate::document_states::forms::{WorkflowForm, WorkflowPreviewForm};
use crate::document_states::permissions::{
    PERMISSION_WORKFLOW_CREATE, PERMISSION_WORKFLOW_DELETE, PERMISSION_WORKFLOW_EDIT,
    PERMISSION_WORKFLOW_VIEW,
};
use crate::document_states::preview::{render_dot, DOT_CONTENT_TYPE};
use crate::models::workflows;
use crate::permissions;

const LIST_ROUTE: &str = "document_states:workflow_template_list";

pub async fn list(req: Request) -> Response {
    let db = kit::db(&req)?;
    let user = auth::require_user(&req)?;

    let object_list = acls::restrict(
        &db,
        &user,
        &PERMISSION_WORKFLOW_VIEW,
        workflows::Entity::all(&db).await?,
    )
    .await?;

    View::render(
        &req,
        "DocumentStates/Workflows/List",
        json!({
            "title": "Workflows",
            "object_list": object_list,
        }),
    )
}

pub async fn create_form(req: Request) -> Response {
    let db = kit::db(&req)?;
    let user = auth::require_user(&req)?;
    permissions::require_permissions(&db, &user, &[&PERMISSION_WORKFLOW_CREATE]).await?;

    View::render(
        &req,
        "DocumentStates/Workflows/Create",
        json!({
            "title": "Create workflow",
            "fields": WorkflowForm::fields(None),
        }),
    )
}

pub async fn create(req: Request) -> Response {
    let db = kit::db(&req)?;
    let user = auth::require_user(&req)?;
    permissions::require_permissions(&db, &user, &[&PERMISSION_WORKFLOW_CREATE]).await?;

    let props = json!({
        "title": "Create workflow",
        "fields": WorkflowForm::fields(None),
    });
    let form = match validated::<WorkflowForm>(&req)? {
        Ok(form) => form,
        Err(errors) => return form_invalid(&req, "DocumentStates/Workflows/Create", props, &errors),
    };
    let clashes = form.validate_unique(&db, None).await?;
    if !clashes.is_empty() {
        return form_invalid(&req, "DocumentStates/Workflows/Create", props, &clashes);
    }

    let workflow = form.into_active_model().insert(&*db).await?;
    tracing::info!(workflow_id = workflow.id, user = %user.username, "Workflow created");
    Redirect::to(req.url_for(LIST_ROUTE, &[])?).into()
}

async fn editable(req: &Request) -> Result<(kit::DbConnection, workflows::Model), HttpResponse> {
    let db = kit::db(req)?;
    let user = auth::require_user(req)?;
    let workflow = find_workflow(&db, req.param_id("workflow_template_id")?).await?;
    acls::require_access(&db, &user, &[&PERMISSION_WORKFLOW_EDIT], workflow.acl_ref()).await?;
    Ok((db, workflow))
}

fn edit_props(workflow: &workflows::Model) -> serde_json::Value {
    json!({
        "title": format!("Edit workflow: {}", workflow.label),
        "object": workflow,
        "fields": WorkflowForm::fields(Some(workflow)),
    })
}

pub async fn edit_form(req: Request) -> Response {
    let (_, workflow) = editable(&req).await?;
    View::render(&req, "DocumentStates/Workflows/Edit", edit_props(&workflow))
}

pub async fn edit(req: Request) -> Response {
    let (db, workflow) = editable(&req).await?;

    let form = match validated::<WorkflowForm>(&req)? {
        Ok(form) => form,
        Err(errors) => {
            return form_invalid(&req, "DocumentStates/Workflows/Edit", edit_props(&workflow), &errors)
        }
    };
    let clashes = form.validate_unique(&db, Some(workflow.id)).await?;
    if !clashes.is_empty() {
        return form_invalid(&req, "DocumentStates/Workflows/Edit", edit_props(&workflow), &clashes);
    }

    let mut active: workflows::ActiveModel = workflow.into();
    active.label = Set(form.label);
    active.internal_name = Set(form.internal_name);
    let workflow = active.update(&*db).await?;
    tracing::info!(workflow_id = workflow.id, "Workflow edited");
    Redirect::to(req.url_for(LIST_ROUTE, &[])?).into()
}

async fn deletable(req: &Request) -> Result<(kit::DbConnection, workflows::Model), HttpResponse> {
    let db = kit::db(req)?;
    let user = auth::require_user(req)?;
    let workflow = find_workflow(&db, req.param_id("workflow_template_id")?).await?;
    acls::require_access(&db, &user, &[&PERMISSION_WORKFLOW_DELETE], workflow.acl_ref()).await?;
    Ok((db, workflow))
}

pub async fn delete_form(req: Request) -> Response {
    let (_, workflow) = deletable(&req).await?;
    View::render(
        &req,
        "DocumentStates/Workflows/Delete",
        json!({
            "title": format!("Delete workflow: {}?", workflow.label),
            "object": workflow,
        }),
    )
}

pub async fn delete(req: Request) -> Response {
    let (db, workflow) = deletable(&req).await?;
    let id = workflow.id;
    workflow.delete(&*db).await?;
    tracing::info!(workflow_id = id, "Workflow deleted");
    Redirect::to(req.url_for(LIST_ROUTE, &[])?).into()
}

async fn viewable(req: &Request) -> Result<(kit::DbConnection, workflows::Model), HttpResponse> {
    let db = kit::db(req)?;
    let user = auth::require_user(req)?;
    let workflow = find_workflow(&db, req.param_id("workflow_template_id")?).await?;
    acls::require_access(&db, &user, &[&PERMISSION_WORKFLOW_VIEW], workflow.acl_ref()).await?;
    Ok((db, workflow))
}

pub async fn preview(req: Request) -> Response {
    let (_, workflow) = viewable(&req).await?;
    let id = workflow.id.to_string();
    let image_url = req.url_for(
        "document_states:workflow_template_image",
        &[("workflow_template_id", id.as_str())],
    )?;
    let form = WorkflowPreviewForm::new(&workflow, image_url);

    View::render(
        &req,
        "DocumentStates/Workflows/Preview",
        json!({
            "title": format!("Preview of: {}", workflow.label),
            "object": workflow,
            "fields": form.to_json(),
            "preview": form.render(),
        }),
    )
}

/// Graphviz description of the workflow
pub async fn image(req: Request) -> Response {
    let (db, workflow) = viewable(&req).await?;
    let states = workflow.states(&db).await?;
    let transitions = workflow.transitions(&db).await?;

    Ok(HttpResponse::new()
        .body(render_dot(&workflow, &states, &transitions))
        .header("Content-Type", DOT_CONTENT_TYPE))
}
