use archivo::document_states::forms::{set_relationship, Relationship, TriggerEventFormSet};
use archivo::events;
use archivo::models::workflow_transition_trigger_events as trigger_events;
use archivo::models::{workflow_states, workflow_transitions, workflows};
use archivo::testing::ViewTestCase;
use pretty_assertions::assert_eq;
use sea_orm::{ActiveModelTrait, Set};

async fn transition(case: &ViewTestCase) -> workflow_transitions::Model {
    let db = case.db().inner();
    let workflow = workflows::ActiveModel {
        label: Set("Invoices".to_string()),
        internal_name: Set("invoices".to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    let mut states = Vec::new();
    for (label, initial) in [("Received", true), ("Paid", false)] {
        states.push(
            workflow_states::ActiveModel {
                workflow_id: Set(workflow.id),
                label: Set(label.to_string()),
                initial: Set(initial),
                completion: Set(0),
                ..Default::default()
            }
            .insert(db)
            .await
            .unwrap(),
        );
    }
    workflow_transitions::ActiveModel {
        workflow_id: Set(workflow.id),
        label: Set("Pay".to_string()),
        origin_state_id: Set(states[0].id),
        destination_state_id: Set(states[1].id),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

#[tokio::test]
async fn toggling_is_idempotent() {
    let case = ViewTestCase::set_up().await.unwrap();
    let db = case.db().inner();
    let transition = transition(&case).await;
    let event_type = events::all()[0].stored(db).await.unwrap();

    set_relationship(db, transition.id, event_type.id, Relationship::No).await.unwrap();
    assert!(trigger_events::Entity::find_for(db, transition.id, event_type.id)
        .await
        .unwrap()
        .is_empty());

    set_relationship(db, transition.id, event_type.id, Relationship::Yes).await.unwrap();
    set_relationship(db, transition.id, event_type.id, Relationship::Yes).await.unwrap();
    assert_eq!(
        trigger_events::Entity::find_for(db, transition.id, event_type.id)
            .await
            .unwrap()
            .len(),
        1
    );

    set_relationship(db, transition.id, event_type.id, Relationship::No).await.unwrap();
    assert!(transition.trigger_event_type_ids(db).await.unwrap().is_empty());
}

#[tokio::test]
async fn formset_has_one_toggle_per_event_type() {
    let case = ViewTestCase::set_up().await.unwrap();
    let db = case.db().inner();
    let transition = transition(&case).await;
    let event_type = events::all()[1].stored(db).await.unwrap();
    set_relationship(db, transition.id, event_type.id, Relationship::Yes).await.unwrap();

    let formset = TriggerEventFormSet::new(db, &transition).await.unwrap();
    assert_eq!(formset.forms().len(), events::all().len());
    assert_eq!(formset.forms()[0].relationship, Relationship::No);
    assert_eq!(formset.forms()[1].relationship, Relationship::Yes);

    let initial = formset.initial_data();
    assert_eq!(
        initial.get("form-TOTAL_FORMS"),
        Some(events::all().len().to_string().as_str())
    );
    assert_eq!(initial.get("form-1-relationship"), Some("yes"));
    assert_eq!(
        formset.clean(&initial).unwrap(),
        formset.forms().iter().map(|form| form.relationship).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn events_view_saves_the_toggles() {
    let case = ViewTestCase::set_up().await.unwrap();
    assert!(case.login_admin_user().await);
    let db = case.db().inner();
    let transition = transition(&case).await;
    let id = transition.id.to_string();
    let args = [("workflow_template_transition_id", id.as_str())];

    let response = case
        .get("document_states:workflow_template_transition_events", &args)
        .unwrap()
        .send()
        .await;
    response.assert_ok();
    let formset = &response.context().unwrap()["formset"];
    assert_eq!(formset["management_form"]["total_forms"], events::all().len());
    assert_eq!(formset["forms"][0]["prefix"], "form-0");

    let mut data = TriggerEventFormSet::new(db, &transition)
        .await
        .unwrap()
        .initial_data();
    data.set("form-0-relationship", "yes");
    case.post("document_states:workflow_template_transition_events", &args)
        .unwrap()
        .form(data)
        .send()
        .await
        .assert_redirect(&format!("/workflows/templates/{}/transitions/", transition.workflow_id));

    let first = events::all()[0].stored(db).await.unwrap();
    assert_eq!(transition.trigger_event_type_ids(db).await.unwrap(), vec![first.id]);
}

#[tokio::test]
async fn mismatched_management_form_is_rejected() {
    let case = ViewTestCase::set_up().await.unwrap();
    assert!(case.login_admin_user().await);
    let db = case.db().inner();
    let transition = transition(&case).await;
    let id = transition.id.to_string();

    let mut data = TriggerEventFormSet::new(db, &transition)
        .await
        .unwrap()
        .initial_data();
    data.set("form-TOTAL_FORMS", (events::all().len() + 1).to_string());

    let response = case
        .post(
            "document_states:workflow_template_transition_events",
            &[("workflow_template_transition_id", id.as_str())],
        )
        .unwrap()
        .form(data)
        .send()
        .await;
    response.assert_status(422);
    assert!(response.context().unwrap()["errors"]["__all__"].is_array());
    assert!(transition.trigger_event_type_ids(db).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_choice_is_reported_under_its_prefix() {
    let case = ViewTestCase::set_up().await.unwrap();
    let db = case.db().inner();
    let transition = transition(&case).await;
    let formset = TriggerEventFormSet::new(db, &transition).await.unwrap();

    let mut data = formset.initial_data();
    data.set("form-0-relationship", "maybe");
    let errors = formset.clean(&data).unwrap_err();
    assert!(errors.has("form-0-relationship"));
}

#[tokio::test]
async fn formset_save_applies_every_toggle() {
    let case = ViewTestCase::set_up().await.unwrap();
    let db = case.db().inner();
    let transition = transition(&case).await;
    let formset = TriggerEventFormSet::new(db, &transition).await.unwrap();

    let all_yes = vec![Relationship::Yes; formset.forms().len()];
    formset.save(db, &all_yes).await.unwrap();
    let mut expected = Vec::new();
    for event in events::all() {
        expected.push(event.stored(db).await.unwrap().id);
    }
    let mut linked = transition.trigger_event_type_ids(db).await.unwrap();
    linked.sort();
    expected.sort();
    assert_eq!(linked, expected);

    let all_no = vec![Relationship::No; formset.forms().len()];
    formset.save(db, &all_no).await.unwrap();
    assert!(transition.trigger_event_type_ids(db).await.unwrap().is_empty());
}
