use archivo::document_states::preview::DOT_CONTENT_TYPE;
use archivo::models::{workflow_states, workflow_transitions, workflows};
use archivo::testing::ViewTestCase;
use kit::forms::INVALID_CHOICE_MESSAGE;
use kit::FormData;
use pretty_assertions::assert_eq;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

async fn admin_case() -> ViewTestCase {
    let case = ViewTestCase::set_up().await.unwrap();
    assert!(case.login_admin_user().await);
    case
}

async fn create_workflow(case: &ViewTestCase, label: &str, internal_name: &str) -> workflows::Model {
    workflows::ActiveModel {
        label: Set(label.to_string()),
        internal_name: Set(internal_name.to_string()),
        ..Default::default()
    }
    .insert(case.db().inner())
    .await
    .unwrap()
}

async fn create_state(case: &ViewTestCase, workflow: &workflows::Model, label: &str, initial: bool) -> workflow_states::Model {
    workflow_states::ActiveModel {
        workflow_id: Set(workflow.id),
        label: Set(label.to_string()),
        initial: Set(initial),
        completion: Set(0),
        ..Default::default()
    }
    .insert(case.db().inner())
    .await
    .unwrap()
}

#[tokio::test]
async fn create_edit_and_delete_a_workflow() {
    let case = admin_case().await;

    case.post("document_states:workflow_template_create", &[])
        .unwrap()
        .form(FormData::from_pairs([("label", " Invoices "), ("internal_name", "invoices")]))
        .send()
        .await
        .assert_redirect("/workflows/");

    let all = workflows::Entity::all(case.db().inner()).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].label, "Invoices");
    let id = all[0].id.to_string();

    case.post("document_states:workflow_template_edit", &[("workflow_template_id", id.as_str())])
        .unwrap()
        .form(FormData::from_pairs([("label", "Invoices 2024"), ("internal_name", "invoices_2024")]))
        .send()
        .await
        .assert_redirect("/workflows/");
    let edited = workflows::Entity::find_by_id(all[0].id)
        .one(case.db().inner())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.internal_name, "invoices_2024");

    case.post("document_states:workflow_template_delete", &[("workflow_template_id", id.as_str())])
        .unwrap()
        .send()
        .await
        .assert_redirect("/workflows/");
    assert!(workflows::Entity::all(case.db().inner()).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_and_malformed_workflows_are_rejected() {
    let case = admin_case().await;
    create_workflow(&case, "Invoices", "invoices").await;

    let response = case
        .post("document_states:workflow_template_create", &[])
        .unwrap()
        .form(FormData::from_pairs([("label", "Invoices"), ("internal_name", "other")]))
        .send()
        .await;
    response.assert_status(422);
    assert_eq!(
        response.context().unwrap()["errors"]["label"][0],
        "Workflow with this Label already exists."
    );

    let response = case
        .post("document_states:workflow_template_create", &[])
        .unwrap()
        .form(FormData::from_pairs([("label", "Contracts"), ("internal_name", "con-tracts")]))
        .send()
        .await;
    response.assert_status(422);
    assert_eq!(
        response.context().unwrap()["errors"]["internal_name"][0],
        "This value can only contain letters, numbers, and underscores."
    );
    assert_eq!(workflows::Entity::all(case.db().inner()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn regular_user_needs_create_permission() {
    let case = ViewTestCase::set_up().await.unwrap();
    assert!(case.login_user().await);

    case.get("document_states:workflow_template_create", &[])
        .unwrap()
        .send()
        .await
        .assert_status(403);

    case.grant_permission(&archivo::document_states::permissions::PERMISSION_WORKFLOW_CREATE)
        .await
        .unwrap();
    case.get("document_states:workflow_template_create", &[])
        .unwrap()
        .send()
        .await
        .assert_ok();
}

#[tokio::test]
async fn only_one_state_stays_initial() {
    let case = admin_case().await;
    let workflow = create_workflow(&case, "Invoices", "invoices").await;
    let id = workflow.id.to_string();

    for label in ["Received", "Reviewed"] {
        case.post("document_states:workflow_template_state_create", &[("workflow_template_id", id.as_str())])
            .unwrap()
            .form(FormData::from_pairs([("label", label), ("initial", "on"), ("completion", "10")]))
            .send()
            .await
            .assert_redirect(&format!("/workflows/templates/{}/states/", workflow.id));
    }

    let states = workflow.states(case.db().inner()).await.unwrap();
    let initial: Vec<&str> = states
        .iter()
        .filter(|state| state.initial)
        .map(|state| state.label.as_str())
        .collect();
    assert_eq!(initial, vec!["Reviewed"]);
    assert_eq!(
        workflow.initial_state(case.db().inner()).await.unwrap().unwrap().label,
        "Reviewed"
    );
}

#[tokio::test]
async fn state_completion_is_bounded() {
    let case = admin_case().await;
    let workflow = create_workflow(&case, "Invoices", "invoices").await;
    let id = workflow.id.to_string();

    let response = case
        .post("document_states:workflow_template_state_create", &[("workflow_template_id", id.as_str())])
        .unwrap()
        .form(FormData::from_pairs([("label", "Done"), ("completion", "101")]))
        .send()
        .await;
    response.assert_status(422);
    assert!(response.context().unwrap()["errors"]["completion"].is_array());
}

#[tokio::test]
async fn blank_state_completion_defaults_to_zero() {
    let case = admin_case().await;
    let workflow = create_workflow(&case, "Invoices", "invoices").await;
    let id = workflow.id.to_string();

    case.post("document_states:workflow_template_state_create", &[("workflow_template_id", id.as_str())])
        .unwrap()
        .form(FormData::from_pairs([("label", "Done"), ("completion", "")]))
        .send()
        .await
        .assert_redirect(&format!("/workflows/templates/{}/states/", workflow.id));

    let states = workflow.states(case.db().inner()).await.unwrap();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].completion, 0);
}

#[tokio::test]
async fn non_numeric_state_completion_is_a_field_error() {
    let case = admin_case().await;
    let workflow = create_workflow(&case, "Invoices", "invoices").await;
    let id = workflow.id.to_string();

    let response = case
        .post("document_states:workflow_template_state_create", &[("workflow_template_id", id.as_str())])
        .unwrap()
        .form(FormData::from_pairs([("label", "Done"), ("completion", "abc")]))
        .send()
        .await;
    response.assert_status(422);
    assert_eq!(
        response.context().unwrap()["errors"]["completion"],
        serde_json::json!(["Enter a whole number."])
    );
    assert!(workflow.states(case.db().inner()).await.unwrap().is_empty());
}

#[tokio::test]
async fn transition_states_must_belong_to_the_workflow() {
    let case = admin_case().await;
    let invoices = create_workflow(&case, "Invoices", "invoices").await;
    let contracts = create_workflow(&case, "Contracts", "contracts").await;
    let received = create_state(&case, &invoices, "Received", true).await;
    let paid = create_state(&case, &invoices, "Paid", false).await;
    let foreign = create_state(&case, &contracts, "Signed", true).await;
    let id = invoices.id.to_string();

    let response = case
        .post("document_states:workflow_template_transition_create", &[("workflow_template_id", id.as_str())])
        .unwrap()
        .form(FormData::from_pairs([
            ("label", "Pay".to_string()),
            ("origin_state", received.id.to_string()),
            ("destination_state", foreign.id.to_string()),
        ]))
        .send()
        .await;
    response.assert_status(422);
    assert_eq!(
        response.context().unwrap()["errors"]["destination_state"][0],
        INVALID_CHOICE_MESSAGE
    );

    case.post("document_states:workflow_template_transition_create", &[("workflow_template_id", id.as_str())])
        .unwrap()
        .form(FormData::from_pairs([
            ("label", "Pay".to_string()),
            ("origin_state", received.id.to_string()),
            ("destination_state", paid.id.to_string()),
        ]))
        .send()
        .await
        .assert_redirect(&format!("/workflows/templates/{}/transitions/", invoices.id));

    let transitions = invoices.transitions(case.db().inner()).await.unwrap();
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].origin_state_id, received.id);
    assert_eq!(transitions[0].destination_state_id, paid.id);
}

#[tokio::test]
async fn preview_points_at_the_graphviz_image() {
    let case = admin_case().await;
    let workflow = create_workflow(&case, "Invoices", "invoices").await;
    let received = create_state(&case, &workflow, "Received", true).await;
    let paid = create_state(&case, &workflow, "Paid", false).await;
    workflow_transitions::ActiveModel {
        workflow_id: Set(workflow.id),
        label: Set("Pay".to_string()),
        origin_state_id: Set(received.id),
        destination_state_id: Set(paid.id),
        ..Default::default()
    }
    .insert(case.db().inner())
    .await
    .unwrap();
    let id = workflow.id.to_string();
    let image_url = format!("/workflows/templates/{}/image/", workflow.id);

    let response = case
        .get("document_states:workflow_template_preview", &[("workflow_template_id", id.as_str())])
        .unwrap()
        .send()
        .await;
    response.assert_ok();
    let preview = response.context().unwrap()["preview"].as_str().unwrap().to_string();
    assert!(preview.contains(&format!("src=\"{}\"", image_url)));

    let response = case.client.get(image_url).send().await;
    response.assert_ok();
    assert_eq!(response.header("content-type"), Some(DOT_CONTENT_TYPE));
    assert!(response.text().starts_with("digraph \"invoices\" {"));
    assert!(response
        .text()
        .contains(&format!("\"state_{}\" [label=\"Received\", shape=doublecircle];", received.id)));
    assert!(response.text().contains(&format!(
        "\"state_{}\" -> \"state_{}\" [label=\"Pay\"];",
        received.id, paid.id
    )));
}
