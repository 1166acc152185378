//! Workflow state action views

use kit::{FrameworkError, HttpResponse, Redirect, Request, Response, View};
use sea_orm::{ActiveModelTrait, ModelTrait, Set};
use serde_json::{json, Value};

use super::{editable_workflow, find_action, find_state, form_invalid};
use crate::auth;
use crate::document_states::actions::{self, ActionType};
use crate::document_states::forms::{WorkflowActionSelectionForm, WorkflowStateActionDynamicForm};
use crate::models::{workflow_state_actions, workflow_states, workflows};

const LIST_ROUTE: &str = "document_states:workflow_template_state_action_list";

fn list_url(req: &Request, state_id: i64) -> Result<String, FrameworkError> {
    let id = state_id.to_string();
    req.url_for(LIST_ROUTE, &[("workflow_template_state_id", id.as_str())])
}

fn action_type(key: &str) -> Result<&'static ActionType, FrameworkError> {
    actions::get(key).ok_or_else(|| FrameworkError::model_not_found("Action type"))
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

struct ActionContext {
    db: kit::DbConnection,
    workflow: workflows::Model,
    state: workflow_states::Model,
    action: workflow_state_actions::Model,
}

async fn action_of(req: &Request) -> Result<ActionContext, HttpResponse> {
    let db = kit::db(req)?;
    let user = auth::require_user(req)?;
    let action = find_action(&db, req.param_id("workflow_template_state_action_id")?).await?;
    let state = find_state(&db, action.state_id).await?;
    let workflow = editable_workflow(&db, &user, state.workflow_id).await?;
    Ok(ActionContext {
        db,
        workflow,
        state,
        action,
    })
}

pub async fn list(req: Request) -> Response {
    let (db, workflow, state) = state_of(&req).await?;
    let object_list: Vec<Value> = state
        .actions(&db)
        .await?
        .into_iter()
        .map(|action| {
            let type_label = actions::get(&action.action_path).map(|t| t.label);
            let mut entry = json!(action);
            entry["action_type_label"] = json!(type_label);
            entry
        })
        .collect();

    View::render(
        &req,
        "DocumentStates/Actions/List",
        json!({
            "title": format!("Actions for workflow state: {}", state.label),
            "workflow": workflow,
            "state": state,
            "object_list": object_list,
        }),
    )
}

fn selection_props(workflow: &workflows::Model, state: &workflow_states::Model) -> Value {
    json!({
        "title": "New workflow state action selection",
        "workflow": workflow,
        "state": state,
        "fields": WorkflowActionSelectionForm::new().fields(),
    })
}

pub async fn selection_form(req: Request) -> Response {
    let (_, workflow, state) = state_of(&req).await?;
    View::render(&req, "DocumentStates/Actions/Selection", selection_props(&workflow, &state))
}

/// Redirect to the create view of the chosen action type
pub async fn selection(req: Request) -> Response {
    let (_, workflow, state) = state_of(&req).await?;
    let data = req.form_data()?;

    let chosen = match WorkflowActionSelectionForm::new().clean(&data) {
        Ok(chosen) => chosen,
        Err(errors) => {
            return form_invalid(
                &req,
                "DocumentStates/Actions/Selection",
                selection_props(&workflow, &state),
                &errors,
            )
        }
    };

    let id = state.id.to_string();
    Redirect::to(req.url_for(
        "document_states:workflow_template_state_action_create",
        &[("workflow_template_state_id", id.as_str()), ("class_path", chosen.key)],
    )?)
    .into()
}

fn create_props(
    workflow: &workflows::Model,
    state: &workflow_states::Model,
    form: &WorkflowStateActionDynamicForm,
) -> Value {
    json!({
        "title": format!(
            "Create a \"{}\" workflow action for: {}",
            form.action_type().label,
            state.label
        ),
        "workflow": workflow,
        "state": state,
        "action_type": { "key": form.action_type().key, "label": form.action_type().label },
        "fields": form.to_json(),
    })
}

pub async fn create_form(req: Request) -> Response {
    let (db, workflow, state) = state_of(&req).await?;
    let action_type = action_type(req.param("class_path")?)?;
    let form = WorkflowStateActionDynamicForm::new(&db, action_type, None).await?;
    View::render(&req, "DocumentStates/Actions/Create", create_props(&workflow, &state, &form))
}

pub async fn create(req: Request) -> Response {
    let (db, workflow, state) = state_of(&req).await?;
    let action_type = action_type(req.param("class_path")?)?;
    let form = WorkflowStateActionDynamicForm::new(&db, action_type, None).await?;

    let data = match form.clean(&req.form_data()?) {
        Ok(data) => data,
        Err(errors) => {
            return form_invalid(
                &req,
                "DocumentStates/Actions/Create",
                create_props(&workflow, &state, &form),
                &errors,
            )
        }
    };

    let action = workflow_state_actions::ActiveModel {
        state_id: Set(state.id),
        label: Set(data.label),
        enabled: Set(data.enabled),
        when: Set(data.when.as_i32()),
        action_path: Set(data.action_path),
        action_data: Set(data.action_data),
        ..Default::default()
    }
    .insert(&*db)
    .await?;
    tracing::info!(
        state_id = state.id,
        action_id = action.id,
        action_path = %action.action_path,
        "Workflow state action created"
    );
    Redirect::to(list_url(&req, state.id)?).into()
}

fn edit_props(context: &ActionContext, form: &WorkflowStateActionDynamicForm) -> Value {
    json!({
        "title": format!("Edit workflow state action: {}", context.action.label),
        "workflow": context.workflow,
        "state": context.state,
        "object": context.action,
        "action_type": { "key": form.action_type().key, "label": form.action_type().label },
        "fields": form.to_json(),
    })
}

pub async fn edit_form(req: Request) -> Response {
    let context = action_of(&req).await?;
    let action_type = action_type(&context.action.action_path)?;
    let form =
        WorkflowStateActionDynamicForm::new(&context.db, action_type, Some(&context.action)).await?;
    View::render(&req, "DocumentStates/Actions/Edit", edit_props(&context, &form))
}

pub async fn edit(req: Request) -> Response {
    let context = action_of(&req).await?;
    let action_type = action_type(&context.action.action_path)?;
    let form =
        WorkflowStateActionDynamicForm::new(&context.db, action_type, Some(&context.action)).await?;

    let data = match form.clean(&req.form_data()?) {
        Ok(data) => data,
        Err(errors) => {
            return form_invalid(&req, "DocumentStates/Actions/Edit", edit_props(&context, &form), &errors)
        }
    };

    let state_id = context.state.id;
    let mut active: workflow_state_actions::ActiveModel = context.action.into();
    active.label = Set(data.label);
    active.enabled = Set(data.enabled);
    active.when = Set(data.when.as_i32());
    active.action_data = Set(data.action_data);
    let action = active.update(&*context.db).await?;
    tracing::info!(action_id = action.id, "Workflow state action edited");
    Redirect::to(list_url(&req, state_id)?).into()
}

pub async fn delete_form(req: Request) -> Response {
    let context = action_of(&req).await?;
    View::render(
        &req,
        "DocumentStates/Actions/Delete",
        json!({
            "title": format!("Delete workflow state action: {}?", context.action.label),
            "workflow": context.workflow,
            "state": context.state,
            "object": context.action,
        }),
    )
}

pub async fn delete(req: Request) -> Response {
    let context = action_of(&req).await?;
    let id = context.action.id;
    context.action.delete(&*context.db).await?;
    tracing::info!(action_id = id, "Workflow state action deleted");
    Redirect::to(list_url(&req, context.state.id)?).into()
}
