//! Workflow instance views
//!
//! Viewing an instance requires `workflow_view` on its workflow; the
//! transition choices are further limited to users holding
//! `workflow_transition`.

use kit::{HttpResponse, Redirect, Request, Response, View};
use serde_json::{json, Value};

use super::{find_instance, form_invalid};
use crate::acls::{self, AclObject};
use crate::auth;
use crate::document_states::forms::WorkflowInstanceTransitionForm;
use crate::document_states::permissions::PERMISSION_WORKFLOW_VIEW;
use crate::models::{workflow_instances, workflows};

async fn instance_of(
    req: &Request,
) -> Result<(kit::DbConnection, workflows::Model, workflow_instances::Model), HttpResponse> {
    let db = kit::db(req)?;
    let user = auth::require_user(req)?;
    let instance = find_instance(&db, req.param_id("workflow_instance_id")?).await?;
    let workflow = instance
        .workflow(&db)
        .await?
        .ok_or_else(|| kit::FrameworkError::model_not_found("Workflow"))?;
    acls::require_access(&db, &user, &[&PERMISSION_WORKFLOW_VIEW], workflow.acl_ref()).await?;
    Ok((db, workflow, instance))
}

fn props(
    workflow: &workflows::Model,
    instance: &workflow_instances::Model,
    current_state: Value,
    form: &WorkflowInstanceTransitionForm,
) -> Value {
    json!({
        "title": format!("Do transition for workflow: {}", workflow.label),
        "workflow": workflow,
        "object": instance,
        "current_state": current_state,
        "fields": form.to_json(),
    })
}

pub async fn transition_form(req: Request) -> Response {
    let (db, workflow, instance) = instance_of(&req).await?;
    let user = auth::require_user(&req)?;
    let form = WorkflowInstanceTransitionForm::new(&db, &instance, &user).await?;
    let current_state = json!(instance.current_state(&db).await?);

    View::render(
        &req,
        "DocumentStates/Instances/Transition",
        props(&workflow, &instance, current_state, &form),
    )
}

pub async fn transition(req: Request) -> Response {
    let (db, workflow, instance) = instance_of(&req).await?;
    let user = auth::require_user(&req)?;
    let form = WorkflowInstanceTransitionForm::new(&db, &instance, &user).await?;

    let data = match form.clean(&req.form_data()?) {
        Ok(data) => data,
        Err(errors) => {
            let current_state = json!(instance.current_state(&db).await?);
            return form_invalid(
                &req,
                "DocumentStates/Instances/Transition",
                props(&workflow, &instance, current_state, &form),
                &errors,
            );
        }
    };
    WorkflowInstanceTransitionForm::save(&db, &instance, &user, data).await?;

    let id = instance.id.to_string();
    Redirect::to(req.url_for(
        "document_states:workflow_instance_transition",
        &[("workflow_instance_id", id.as_str())],
    )?)
    .into()
}
