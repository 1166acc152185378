use archivo::document_states::permissions::{
    PERMISSION_WORKFLOW_TRANSITION, PERMISSION_WORKFLOW_VIEW,
};
use archivo::models::{workflow_instances, workflow_states, workflow_transitions, workflows};
use archivo::testing::ViewTestCase;
use kit::FormData;
use pretty_assertions::assert_eq;
use sea_orm::{ActiveModelTrait, Set};

struct Fixture {
    case: ViewTestCase,
    workflow: workflows::Model,
    paid: workflow_states::Model,
    pay: workflow_transitions::Model,
    instance: workflow_instances::Model,
}

async fn fixture() -> Fixture {
    let case = ViewTestCase::set_up().await.unwrap();
    let db = case.db().inner();
    let workflow = workflows::ActiveModel {
        label: Set("Invoices".to_string()),
        internal_name: Set("invoices".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    let state = |label: &str, initial: bool| workflow_states::ActiveModel {
        workflow_id: Set(workflow.id),
        label: Set(label.to_string()),
        initial: Set(initial),
        completion: Set(if initial { 0 } else { 100 }),
        ..Default::default()
    };
    let received = state("Received", true).insert(db).await.unwrap();
    let paid = state("Paid", false).insert(db).await.unwrap();
    let pay = workflow_transitions::ActiveModel {
        workflow_id: Set(workflow.id),
        label: Set("Pay".to_string()),
        origin_state_id: Set(received.id),
        destination_state_id: Set(paid.id),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    let instance = workflow_instances::ActiveModel {
        workflow_id: Set(workflow.id),
        document_id: Set(1),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    Fixture {
        case,
        workflow,
        paid,
        pay,
        instance,
    }
}

#[tokio::test]
async fn transition_choices_need_the_transition_permission() {
    let fixture = fixture().await;
    let case = &fixture.case;
    case.grant_access(&PERMISSION_WORKFLOW_VIEW, &fixture.workflow).await.unwrap();
    assert!(case.login_user().await);
    let id = fixture.instance.id.to_string();
    let args = [("workflow_instance_id", id.as_str())];

    let response = case
        .get("document_states:workflow_instance_transition", &args)
        .unwrap()
        .send()
        .await;
    response.assert_ok();
    let context = response.context().unwrap();
    assert_eq!(context["current_state"]["label"], "Received");
    assert_eq!(context["fields"][0]["records"], serde_json::json!([]));

    let response = case
        .post("document_states:workflow_instance_transition", &args)
        .unwrap()
        .form(FormData::from_pairs([("transition", fixture.pay.id.to_string())]))
        .send()
        .await;
    response.assert_status(422);
    assert!(fixture.instance.log_entries(case.db().inner()).await.unwrap().is_empty());
}

#[tokio::test]
async fn valid_transition_is_logged() {
    let fixture = fixture().await;
    let case = &fixture.case;
    case.grant_access(&PERMISSION_WORKFLOW_VIEW, &fixture.workflow).await.unwrap();
    case.grant_access(&PERMISSION_WORKFLOW_TRANSITION, &fixture.workflow)
        .await
        .unwrap();
    assert!(case.login_user().await);
    let id = fixture.instance.id.to_string();

    case.post(
        "document_states:workflow_instance_transition",
        &[("workflow_instance_id", id.as_str())],
    )
    .unwrap()
    .form(FormData::from_pairs([
        ("transition", fixture.pay.id.to_string()),
        ("comment", "Paid by wire".to_string()),
    ]))
    .send()
    .await
    .assert_redirect(&format!("/workflows/instances/{}/transition/", fixture.instance.id));

    let db = case.db().inner();
    let entries = fixture.instance.log_entries(db).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].transition_id, fixture.pay.id);
    assert_eq!(entries[0].user_id, case.test_user.id);
    assert_eq!(entries[0].comment, "Paid by wire");
    assert_eq!(
        fixture.instance.current_state(db).await.unwrap().map(|state| state.id),
        Some(fixture.paid.id)
    );
    assert!(fixture.instance.transition_choices(db).await.unwrap().is_empty());
}

#[tokio::test]
async fn instance_view_needs_view_access() {
    let fixture = fixture().await;
    let case = &fixture.case;
    assert!(case.login_user().await);
    let id = fixture.instance.id.to_string();

    case.get(
        "document_states:workflow_instance_transition",
        &[("workflow_instance_id", id.as_str())],
    )
    .unwrap()
    .send()
    .await
    .assert_status(403);
}
