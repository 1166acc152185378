//! Route table
//!
//! Everything under `/workflows` requires a logged-in user; the about
//! page and the authentication views are public.

use kit::{Config, DbConnection, RequestLogger, Router, SessionConfig, SessionStore};

use crate::controllers::{
    actions, authentication, common, instances, states, transitions, workflows,
};
use crate::middleware::{Authenticate, RequireLogin};

/// Application router over `db`, with a session store from the environment
pub fn register(db: DbConnection) -> Router {
    let sessions = SessionStore::new(Config::get::<SessionConfig>().unwrap_or_default());
    build(db, sessions)
}

pub fn build(db: DbConnection, sessions: SessionStore) -> Router {
    let router: Router = Router::new()
        .get("/about/", common::about)
        .name("common:about_view")
        .get("/authentication/login/", authentication::login_form)
        .name("authentication:login_view")
        .post("/authentication/login/", authentication::login)
        .name("authentication:login_view")
        .post("/authentication/logout/", authentication::logout)
        .name("authentication:logout_view")
        .group("/workflows", |r| {
            r.get("/", workflows::list)
                .name("document_states:workflow_template_list")
                .get("/create/", workflows::create_form)
                .name("document_states:workflow_template_create")
                .post("/create/", workflows::create)
                .name("document_states:workflow_template_create")
                .get("/templates/{workflow_template_id}/edit/", workflows::edit_form)
                .name("document_states:workflow_template_edit")
                .post("/templates/{workflow_template_id}/edit/", workflows::edit)
                .name("document_states:workflow_template_edit")
                .get("/templates/{workflow_template_id}/delete/", workflows::delete_form)
                .name("document_states:workflow_template_delete")
                .post("/templates/{workflow_template_id}/delete/", workflows::delete)
                .name("document_states:workflow_template_delete")
                .get("/templates/{workflow_template_id}/preview/", workflows::preview)
                .name("document_states:workflow_template_preview")
                .get("/templates/{workflow_template_id}/image/", workflows::image)
                .name("document_states:workflow_template_image")
                // States
                .get("/templates/{workflow_template_id}/states/", states::list)
                .name("document_states:workflow_template_state_list")
                .get("/templates/{workflow_template_id}/states/create/", states::create_form)
                .name("document_states:workflow_template_state_create")
                .post("/templates/{workflow_template_id}/states/create/", states::create)
                .name("document_states:workflow_template_state_create")
                .get("/states/{workflow_template_state_id}/edit/", states::edit_form)
                .name("document_states:workflow_template_state_edit")
                .post("/states/{workflow_template_state_id}/edit/", states::edit)
                .name("document_states:workflow_template_state_edit")
                .get("/states/{workflow_template_state_id}/delete/", states::delete_form)
                .name("document_states:workflow_template_state_delete")
                .post("/states/{workflow_template_state_id}/delete/", states::delete)
                .name("document_states:workflow_template_state_delete")
                // State actions
                .get("/states/{workflow_template_state_id}/actions/", actions::list)
                .name("document_states:workflow_template_state_action_list")
                .get(
                    "/states/{workflow_template_state_id}/actions/selection/",
                    actions::selection_form,
                )
                .name("document_states:workflow_template_state_action_selection")
                .post(
                    "/states/{workflow_template_state_id}/actions/selection/",
                    actions::selection,
                )
                .name("document_states:workflow_template_state_action_selection")
                .get(
                    "/states/{workflow_template_state_id}/actions/create/{class_path}/",
                    actions::create_form,
                )
                .name("document_states:workflow_template_state_action_create")
                .post(
                    "/states/{workflow_template_state_id}/actions/create/{class_path}/",
                    actions::create,
                )
                .name("document_states:workflow_template_state_action_create")
                .get("/actions/{workflow_template_state_action_id}/edit/", actions::edit_form)
                .name("document_states:workflow_template_state_action_edit")
                .post("/actions/{workflow_template_state_action_id}/edit/", actions::edit)
                .name("document_states:workflow_template_state_action_edit")
                .get("/actions/{workflow_template_state_action_id}/delete/", actions::delete_form)
                .name("document_states:workflow_template_state_action_delete")
                .post("/actions/{workflow_template_state_action_id}/delete/", actions::delete)
                .name("document_states:workflow_template_state_action_delete")
                // Transitions
                .get("/templates/{workflow_template_id}/transitions/", transitions::list)
                .name("document_states:workflow_template_transition_list")
                .get(
                    "/templates/{workflow_template_id}/transitions/create/",
                    transitions::create_form,
                )
                .name("document_states:workflow_template_transition_create")
                .post(
                    "/templates/{workflow_template_id}/transitions/create/",
                    transitions::create,
                )
                .name("document_states:workflow_template_transition_create")
                .get("/transitions/{workflow_template_transition_id}/edit/", transitions::edit_form)
                .name("document_states:workflow_template_transition_edit")
                .post("/transitions/{workflow_template_transition_id}/edit/", transitions::edit)
                .name("document_states:workflow_template_transition_edit")
                .get(
                    "/transitions/{workflow_template_transition_id}/delete/",
                    transitions::delete_form,
                )
                .name("document_states:workflow_template_transition_delete")
                .post("/transitions/{workflow_template_transition_id}/delete/", transitions::delete)
                .name("document_states:workflow_template_transition_delete")
                .get(
                    "/transitions/{workflow_template_transition_id}/events/",
                    transitions::events_form,
                )
                .name("document_states:workflow_template_transition_events")
                .post("/transitions/{workflow_template_transition_id}/events/", transitions::events)
                .name("document_states:workflow_template_transition_events")
                // Instances
                .get("/instances/{workflow_instance_id}/transition/", instances::transition_form)
                .name("document_states:workflow_instance_transition")
                .post("/instances/{workflow_instance_id}/transition/", instances::transition)
                .name("document_states:workflow_instance_transition")
        })
        .middleware(RequireLogin)
        .into();

    router
        .global_middleware(RequestLogger)
        .global_middleware(Authenticate)
        .state(db)
        .state(sessions)
}
