//! Workflow transition views, including the trigger event toggles

use kit::{FrameworkError, HttpResponse, Redirect, Request, Response, View};
use sea_orm::{ActiveModelTrait, ModelTrait, Set};
use serde_json::{json, Value};

use super::{editable_workflow, find_transition, form_invalid};
use crate::auth;
use crate::document_states::forms::{TriggerEventFormSet, WorkflowTransitionForm};
use crate::models::{workflow_transitions, workflows};

const LIST_ROUTE: &str = "document_states:workflow_template_transition_list";

fn list_url(req: &Request, workflow_id: i64) -> Result<String, FrameworkError> {
    let id = workflow_id.to_string();
    req.url_for(LIST_ROUTE, &[("workflow_template_id", id.as_str())])
}

async fn workflow_of(req: &Request) -> Result<(kit::DbConnection, workflows::Model), HttpResponse> {
    let db = kit::db(req)?;
    let user = auth::require_user(req)?;
    let workflow = editable_workflow(&db, &user, req.param_id("workflow_template_id")?).await?;
    Ok((db, workflow))
}

async fn transition_of(
    req: &Request,
) -> Result<(kit::DbConnection, workflows::Model, workflow_transitions::Model), HttpResponse> {
    let db = kit::db(req)?;
    let user = auth::require_user(req)?;
    let transition = find_transition(&db, req.param_id("workflow_template_transition_id")?).await?;
    let workflow = editable_workflow(&db, &user, transition.workflow_id).await?;
    Ok((db, workflow, transition))
}

pub async fn list(req: Request) -> Response {
    let (db, workflow) = workflow_of(&req).await?;
    let object_list = workflow.transitions(&db).await?;

    View::render(
        &req,
        "DocumentStates/Transitions/List",
        json!({
            "title": format!("Transitions of workflow: {}", workflow.label),
            "workflow": workflow,
            "object_list": object_list,
        }),
    )
}

fn create_props(workflow: &workflows::Model, form: &WorkflowTransitionForm) -> Value {
    json!({
        "title": format!("Create transitions for workflow: {}", workflow.label),
        "workflow": workflow,
        "fields": form.to_json(),
    })
}

pub async fn create_form(req: Request) -> Response {
    let (db, workflow) = workflow_of(&req).await?;
    let form = WorkflowTransitionForm::new(&db, &workflow, None).await?;
    View::render(&req, "DocumentStates/Transitions/Create", create_props(&workflow, &form))
}

pub async fn create(req: Request) -> Response {
    let (db, workflow) = workflow_of(&req).await?;
    let form = WorkflowTransitionForm::new(&db, &workflow, None).await?;

    let data = match form.clean(&req.form_data()?) {
        Ok(data) => data,
        Err(errors) => {
            return form_invalid(&req, "DocumentStates/Transitions/Create", create_props(&workflow, &form), &errors)
        }
    };
    let clashes = WorkflowTransitionForm::validate_unique(&db, workflow.id, &data, None).await?;
    if !clashes.is_empty() {
        return form_invalid(&req, "DocumentStates/Transitions/Create", create_props(&workflow, &form), &clashes);
    }

    let transition = workflow_transitions::ActiveModel {
        workflow_id: Set(workflow.id),
        label: Set(data.label),
        origin_state_id: Set(data.origin_state_id),
        destination_state_id: Set(data.destination_state_id),
        ..Default::default()
    }
    .insert(&*db)
    .await?;
    tracing::info!(
        workflow_id = workflow.id,
        transition_id = transition.id,
        "Workflow transition created"
    );
    Redirect::to(list_url(&req, workflow.id)?).into()
}

fn edit_props(
    workflow: &workflows::Model,
    transition: &workflow_transitions::Model,
    form: &WorkflowTransitionForm,
) -> Value {
    json!({
        "title": format!("Edit workflow transition: {}", transition.label),
        "workflow": workflow,
        "object": transition,
        "fields": form.to_json(),
    })
}

pub async fn edit_form(req: Request) -> Response {
    let (db, workflow, transition) = transition_of(&req).await?;
    let form = WorkflowTransitionForm::new(&db, &workflow, Some(&transition)).await?;
    View::render(
        &req,
        "DocumentStates/Transitions/Edit",
        edit_props(&workflow, &transition, &form),
    )
}

pub async fn edit(req: Request) -> Response {
    let (db, workflow, transition) = transition_of(&req).await?;
    let form = WorkflowTransitionForm::new(&db, &workflow, Some(&transition)).await?;

    let data = match form.clean(&req.form_data()?) {
        Ok(data) => data,
        Err(errors) => {
            return form_invalid(
                &req,
                "DocumentStates/Transitions/Edit",
                edit_props(&workflow, &transition, &form),
                &errors,
            )
        }
    };
    let clashes =
        WorkflowTransitionForm::validate_unique(&db, workflow.id, &data, Some(transition.id)).await?;
    if !clashes.is_empty() {
        return form_invalid(
            &req,
            "DocumentStates/Transitions/Edit",
            edit_props(&workflow, &transition, &form),
            &clashes,
        );
    }

    let mut active: workflow_transitions::ActiveModel = transition.into();
    active.label = Set(data.label);
    active.origin_state_id = Set(data.origin_state_id);
    active.destination_state_id = Set(data.destination_state_id);
    let transition = active.update(&*db).await?;
    tracing::info!(transition_id = transition.id, "Workflow transition edited");
    Redirect::to(list_url(&req, workflow.id)?).into()
}

pub async fn delete_form(req: Request) -> Response {
    let (_, workflow, transition) = transition_of(&req).await?;
    View::render(
        &req,
        "DocumentStates/Transitions/Delete",
        json!({
            "title": format!("Delete workflow transition: {}?", transition.label),
            "workflow": workflow,
            "object": transition,
        }),
    )
}

pub async fn delete(req: Request) -> Response {
    let (db, workflow, transition) = transition_of(&req).await?;
    let id = transition.id;
    transition.delete(&*db).await?;
    tracing::info!(transition_id = id, "Workflow transition deleted");
    Redirect::to(list_url(&req, workflow.id)?).into()
}

fn events_props(
    workflow: &workflows::Model,
    transition: &workflow_transitions::Model,
    formset: &TriggerEventFormSet,
) -> Value {
    json!({
        "title": format!("Workflow transition trigger events for: {}", transition.label),
        "workflow": workflow,
        "object": transition,
        "formset": formset.to_json(),
    })
}

pub async fn events_form(req: Request) -> Response {
    let (db, workflow, transition) = transition_of(&req).await?;
    let formset = TriggerEventFormSet::new(&db, &transition).await?;
    View::render(
        &req,
        "DocumentStates/Transitions/Events",
        events_props(&workflow, &transition, &formset),
    )
}

pub async fn events(req: Request) -> Response {
    let (db, workflow, transition) = transition_of(&req).await?;
    let formset = TriggerEventFormSet::new(&db, &transition).await?;

    let relationships = match formset.clean(&req.form_data()?) {
        Ok(relationships) => relationships,
        Err(errors) => {
            return form_invalid(
                &req,
                "DocumentStates/Transitions/Events",
                events_props(&workflow, &transition, &formset),
                &errors,
            )
        }
    };
    formset.save(&db, &relationships).await?;
    tracing::info!(transition_id = transition.id, "Workflow transition trigger events saved");
    Redirect::to(list_url(&req, workflow.id)?).into()
}
