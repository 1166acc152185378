use archivo::document_states::actions::{self, ActionType, SchemaFuture};
use archivo::document_states::forms::WorkflowStateActionDynamicForm;
use archivo::document_states::ActionWhen;
use archivo::models::{tags, workflow_state_actions, workflow_states, workflows};
use archivo::tags::create_tag;
use archivo::testing::ViewTestCase;
use kit::forms::{Field, Record};
use kit::FormData;
use pretty_assertions::assert_eq;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

fn prioritize_schema(db: &DatabaseConnection) -> SchemaFuture<'_> {
    Box::pin(async move {
        let records: Vec<Record> = tags::Entity::all(db)
            .await?
            .into_iter()
            .map(|tag| Record::new(tag.id, tag.label))
            .collect();
        Ok::<_, DbErr>(vec![
            Field::model_multiple_choice("tags", "Tags", records),
            Field::integer("priority", "Priority").optional().default_value(0),
        ])
    })
}

inventory::submit! {
    ActionType {
        key: "tests.prioritize",
        label: "Prioritize",
        schema: prioritize_schema,
    }
}

struct Fixture {
    case: ViewTestCase,
    state: workflow_states::Model,
}

async fn fixture() -> Fixture {
    let case = ViewTestCase::set_up().await.unwrap();
    let db = case.db().inner();
    create_tag(db, "urgent", "red").await.unwrap();
    create_tag(db, "review", "blue").await.unwrap();
    let workflow = workflows::ActiveModel {
        label: Set("Invoices".to_string()),
        internal_name: Set("invoices".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    let state = workflow_states::ActiveModel {
        workflow_id: Set(workflow.id),
        label: Set("Received".to_string()),
        initial: Set(true),
        completion: Set(0),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    Fixture { case, state }
}

fn prioritize() -> &'static ActionType {
    actions::get("tests.prioritize").unwrap()
}

#[tokio::test]
async fn missing_value_uses_the_schema_default() {
    let fixture = fixture().await;
    let form = WorkflowStateActionDynamicForm::new(fixture.case.db().inner(), prioritize(), None)
        .await
        .unwrap();

    let data = form
        .clean(&FormData::from_pairs([
            ("label", "Flag"),
            ("when", "1"),
            ("enabled", "on"),
            ("tags", "1"),
            ("tags", "2"),
        ]))
        .unwrap();
    assert_eq!(data.action_data, r#"{"tags":[1,2],"priority":0}"#);
    assert_eq!(data.when, ActionWhen::OnEntry);
    assert_eq!(data.action_path, "tests.prioritize");
    assert!(data.enabled);
}

#[tokio::test]
async fn stored_data_round_trips_through_the_form() {
    let fixture = fixture().await;
    let db = fixture.case.db().inner();
    let action = workflow_state_actions::ActiveModel {
        state_id: Set(fixture.state.id),
        label: Set("Flag".to_string()),
        enabled: Set(true),
        when: Set(ActionWhen::OnExit.as_i32()),
        action_path: Set("tests.prioritize".to_string()),
        action_data: Set(r#"{"tags":[2,1],"priority":7}"#.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    let form = WorkflowStateActionDynamicForm::new(db, prioritize(), Some(&action))
        .await
        .unwrap();
    let data = form.clean(&form.initial_data()).unwrap();
    assert_eq!(data.label, "Flag");
    assert_eq!(data.when, ActionWhen::OnExit);
    assert!(data.enabled);
    assert_eq!(data.action_data, r#"{"tags":[2,1],"priority":7}"#);
}

#[tokio::test]
async fn obsolete_keys_are_dropped() {
    let fixture = fixture().await;
    let db = fixture.case.db().inner();
    let action = workflow_state_actions::ActiveModel {
        state_id: Set(fixture.state.id),
        label: Set("Flag".to_string()),
        enabled: Set(false),
        when: Set(ActionWhen::OnEntry.as_i32()),
        action_path: Set("tests.prioritize".to_string()),
        action_data: Set(r#"{"tags":[1],"color":"red"}"#.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();

    let form = WorkflowStateActionDynamicForm::new(db, prioritize(), Some(&action))
        .await
        .unwrap();
    assert!(form.schema().iter().all(|field| field.name != "color"));
    let data = form.clean(&form.initial_data()).unwrap();
    assert!(!data.enabled);
    assert_eq!(data.action_data, r#"{"tags":[1],"priority":0}"#);
}

#[tokio::test]
async fn required_schema_fields_are_enforced() {
    let fixture = fixture().await;
    let http_post = actions::get("document_states.http_post").unwrap();
    let form = WorkflowStateActionDynamicForm::new(fixture.case.db().inner(), http_post, None)
        .await
        .unwrap();

    let errors = form
        .clean(&FormData::from_pairs([("label", "Notify"), ("when", "2")]))
        .unwrap_err();
    assert_eq!(errors.get("url"), Some(&["This field is required.".to_string()][..]));

    let data = form
        .clean(&FormData::from_pairs([
            ("label", "Notify"),
            ("when", "2"),
            ("url", "http://example.com/hook"),
        ]))
        .unwrap();
    assert_eq!(
        data.action_data,
        r#"{"url":"http://example.com/hook","payload":null,"timeout":5}"#
    );
}

#[tokio::test]
async fn selection_then_create_through_the_views() {
    let fixture = fixture().await;
    let case = &fixture.case;
    assert!(case.login_admin_user().await);
    let state_id = fixture.state.id.to_string();
    let args = [("workflow_template_state_id", state_id.as_str())];

    let response = case
        .post("document_states:workflow_template_state_action_selection", &args)
        .unwrap()
        .form(FormData::from_pairs([("klass", "tests.prioritize")]))
        .send()
        .await;
    let create_url = format!(
        "/workflows/states/{}/actions/create/tests.prioritize/",
        fixture.state.id
    );
    response.assert_redirect(&create_url);

    let response = case.client.get(create_url.as_str()).send().await;
    response.assert_ok();
    let fields = response.context().unwrap()["fields"].as_array().unwrap().clone();
    let names: Vec<&str> = fields.iter().map(|field| field["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["label", "when", "enabled", "action_data", "tags", "priority"]);

    case.client
        .post(create_url.as_str())
        .form(FormData::from_pairs([
            ("label", "Flag"),
            ("when", "1"),
            ("enabled", "on"),
            ("tags", "2"),
            ("priority", "3"),
        ]))
        .send()
        .await
        .assert_redirect(&format!("/workflows/states/{}/actions/", fixture.state.id));

    let stored = fixture.state.actions(case.db().inner()).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].action_data, r#"{"tags":[2],"priority":3}"#);
    assert_eq!(stored[0].when, 1);
}

#[tokio::test]
async fn unknown_action_type_is_rejected() {
    let fixture = fixture().await;
    let case = &fixture.case;
    assert!(case.login_admin_user().await);
    let state_id = fixture.state.id.to_string();
    let args = [("workflow_template_state_id", state_id.as_str())];

    let response = case
        .post("document_states:workflow_template_state_action_selection", &args)
        .unwrap()
        .form(FormData::from_pairs([("klass", "tests.missing")]))
        .send()
        .await;
    response.assert_status(422);
    assert!(response.context().unwrap()["errors"]["klass"].is_array());

    case.client
        .get(format!(
            "/workflows/states/{}/actions/create/tests.missing/",
            fixture.state.id
        ))
        .send()
        .await
        .assert_status(404);
}
