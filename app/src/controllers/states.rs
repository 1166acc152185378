//! Workflow state views
//!
//! States are edited through their workflow: every view requires
//! `workflow_edit` on the owning workflow.

use kit::{HttpResponse, Redirect, Request, Response, View};
use sea_orm::{ActiveModelTrait, ModelTrait, Set};
use serde_json::{json, Value};

use super::{editable_workflow, find_state, form_invalid, validated};
use crate::auth;
use crate::document_states::forms::WorkflowStateForm;
use crate::models::{workflow_states, workflows};

const LIST_ROUTE: &str = "document_states:workflow_template_state_list";

fn list_url(req: &Request, workflow_id: i64) -> Result<String, kit::FrameworkError> {
    let id = workflow_id.to_string();
    req.url_for(LIST_ROUTE, &[("workflow_template_id", id.as_str())])
}

async fn workflow_of(req: &Request) -> Result<(kit::DbConnection, workflows::Model), HttpResponse> {
    let db = kit::db(req)?;
    let user = auth::require_user(req)?;
    let workflow = editable_workflow(&db, &user, req.param_id("workflow_template_id")?).await?;
    Ok((db, workflow))
}

async fn state_of(
    req: &Request,
) -> Result<(kit::DbConnection, workflows::Model, workflow_states::Model), HttpResponse> {
    let db = kit::db(req)?;
    let user = auth::require_user(req)?;
    let state = find_state(&db, req.param_id("workflow_template_state_id")?).await?;
    let workflow = editable_workflow(&db, &user, state.workflow_id).await?;
    Ok((db, workflow, state))
}

pub async fn list(req: Request) -> Response {
    let (db, workflow) = workflow_of(&req).await?;
    let object_list = workflow.states(&db).await?;

    View::render(
        &req,
        "DocumentStates/States/List",
        json!({
            "title": format!("States of workflow: {}", workflow.label),
            "workflow": workflow,
            "object_list": object_list,
        }),
    )
}

fn create_props(workflow: &workflows::Model) -> Value {
    json!({
        "title": format!("Create states for workflow: {}", workflow.label),
        "workflow": workflow,
        "fields": WorkflowStateForm::fields(None),
    })
}

pub async fn create_form(req: Request) -> Response {
    let (_, workflow) = workflow_of(&req).await?;
    View::render(&req, "DocumentStates/States/Create", create_props(&workflow))
}

pub async fn create(req: Request) -> Response {
    let (db, workflow) = workflow_of(&req).await?;

    let form = match validated::<WorkflowStateForm>(&req)? {
        Ok(form) => form,
        Err(errors) => {
            return form_invalid(&req, "DocumentStates/States/Create", create_props(&workflow), &errors)
        }
    };
    let clashes = form.validate_unique(&db, workflow.id, None).await?;
    if !clashes.is_empty() {
        return form_invalid(&req, "DocumentStates/States/Create", create_props(&workflow), &clashes);
    }

    let state = workflow_states::ActiveModel {
        workflow_id: Set(workflow.id),
        label: Set(form.label.clone()),
        initial: Set(form.initial),
        completion: Set(form.completion()),
        ..Default::default()
    }
    .insert(&*db)
    .await?;
    tracing::info!(workflow_id = workflow.id, state_id = state.id, "Workflow state created");
    Redirect::to(list_url(&req, workflow.id)?).into()
}

fn edit_props(workflow: &workflows::Model, state: &workflow_states::Model) -> Value {
    json!({
        "title": format!("Edit workflow state: {}", state.label),
        "workflow": workflow,
        "object": state,
        "fields": WorkflowStateForm::fields(Some(state)),
    })
}

pub async fn edit_form(req: Request) -> Response {
    let (_, workflow, state) = state_of(&req).await?;
    View::render(&req, "DocumentStates/States/Edit", edit_props(&workflow, &state))
}

pub async fn edit(req: Request) -> Response {
    let (db, workflow, state) = state_of(&req).await?;

    let form = match validated::<WorkflowStateForm>(&req)? {
        Ok(form) => form,
        Err(errors) => {
            return form_invalid(&req, "DocumentStates/States/Edit", edit_props(&workflow, &state), &errors)
        }
    };
    let clashes = form.validate_unique(&db, workflow.id, Some(state.id)).await?;
    if !clashes.is_empty() {
        return form_invalid(&req, "DocumentStates/States/Edit", edit_props(&workflow, &state), &clashes);
    }

    let mut active: workflow_states::ActiveModel = state.into();
    active.label = Set(form.label.clone());
    active.initial = Set(form.initial);
    active.completion = Set(form.completion());
    let state = active.update(&*db).await?;
    tracing::info!(state_id = state.id, "Workflow state edited");
    Redirect::to(list_url(&req, workflow.id)?).into()
}

pub async fn delete_form(req: Request) -> Response {
    let (_, workflow, state) = state_of(&req).await?;
    View::render(
        &req,
        "DocumentStates/States/Delete",
        json!({
            "title": format!("Delete workflow state: {}?", state.label),
            "workflow": workflow,
            "object": state,
        }),
    )
}

pub async fn delete(req: Request) -> Response {
    let (db, workflow, state) = state_of(&req).await?;
    let id = state.id;
    state.delete(&*db).await?;
    tracing::info!(state_id = id, "Workflow state deleted");
    Redirect::to(list_url(&req, workflow.id)?).into()
}
