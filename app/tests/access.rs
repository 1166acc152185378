use archivo::document_states::permissions::{
    PERMISSION_WORKFLOW_EDIT, PERMISSION_WORKFLOW_VIEW,
};
use archivo::models::workflows;
use archivo::testing::ViewTestCase;
use archivo::{acls, permissions};
use pretty_assertions::assert_eq;
use sea_orm::{ActiveModelTrait, Set};

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

#[tokio::test]
async fn anonymous_users_are_sent_to_login() {
    let case = ViewTestCase::set_up().await.unwrap();

    let response = case
        .get("document_states:workflow_template_list", &[])
        .unwrap()
        .send()
        .await;
    response.assert_redirect("/authentication/login/");
    assert_eq!(
        response.header("location"),
        Some("/authentication/login/?next=%2Fworkflows%2F")
    );
}

#[tokio::test]
async fn login_follows_next() {
    let case = ViewTestCase::set_up().await.unwrap();

    let response = case
        .post("authentication:login_view", &[])
        .unwrap()
        .form(kit::FormData::from_pairs([
            ("username", "test_user"),
            ("password", "test-user-password"),
            ("next", "/workflows/"),
        ]))
        .follow_redirects(true)
        .send()
        .await;
    response.assert_ok();
    assert_eq!(response.path(), "/workflows/");
}

#[tokio::test]
async fn bad_credentials_rerender_the_login_form() {
    let case = ViewTestCase::set_up().await.unwrap();

    let response = case
        .post("authentication:login_view", &[])
        .unwrap()
        .form(kit::FormData::from_pairs([
            ("username", "test_user"),
            ("password", "nope"),
        ]))
        .send()
        .await;
    response.assert_status(422);
    assert!(response.context().unwrap()["errors"]["__all__"][0]
        .as_str()
        .unwrap()
        .starts_with("Please enter a correct username and password."));
}

#[tokio::test]
async fn object_access_grant_opens_the_edit_view() {
    let mut case = ViewTestCase::set_up().await.unwrap();
    let workflow = create_workflow(&case, "Invoices", "invoices").await;
    let id = workflow.id.to_string();
    assert!(case.login_user().await);

    let response = case
        .get("document_states:workflow_template_edit", &[("workflow_template_id", id.as_str())])
        .unwrap()
        .send()
        .await;
    response.assert_status(403);

    case.grant_access(&PERMISSION_WORKFLOW_EDIT, &workflow).await.unwrap();

    let response = case
        .get("document_states:workflow_template_edit", &[("workflow_template_id", id.as_str())])
        .unwrap()
        .send()
        .await;
    response.assert_ok();
    assert_eq!(response.context().unwrap()["object"]["label"], "Invoices");

    case.tear_down().await.unwrap();
}

#[tokio::test]
async fn list_shows_only_accessible_workflows() {
    let case = ViewTestCase::set_up().await.unwrap();
    let invoices = create_workflow(&case, "Invoices", "invoices").await;
    create_workflow(&case, "Contracts", "contracts").await;
    assert!(case.login_user().await);

    let labels = |response: &kit::testing::TestResponse| -> Vec<String> {
        response.context().unwrap()["object_list"]
            .as_array()
            .unwrap()
            .iter()
            .map(|workflow| workflow["label"].as_str().unwrap().to_string())
            .collect()
    };

    let response = case
        .get("document_states:workflow_template_list", &[])
        .unwrap()
        .send()
        .await;
    assert!(labels(&response).is_empty());

    case.grant_access(&PERMISSION_WORKFLOW_VIEW, &invoices).await.unwrap();
    let response = case
        .get("document_states:workflow_template_list", &[])
        .unwrap()
        .send()
        .await;
    assert_eq!(labels(&response), vec!["Invoices"]);

    case.grant_permission(&PERMISSION_WORKFLOW_VIEW).await.unwrap();
    let response = case
        .get("document_states:workflow_template_list", &[])
        .unwrap()
        .send()
        .await;
    assert_eq!(labels(&response), vec!["Contracts", "Invoices"]);
}

#[tokio::test]
async fn global_grant_implies_object_access() {
    let case = ViewTestCase::set_up().await.unwrap();
    let workflow = create_workflow(&case, "Invoices", "invoices").await;
    let db = case.db().inner();

    assert!(!acls::check_access(db, &case.test_user, &[&PERMISSION_WORKFLOW_EDIT], acls::AclObject::acl_ref(&workflow))
        .await
        .unwrap());
    case.grant_permission(&PERMISSION_WORKFLOW_EDIT).await.unwrap();
    assert!(permissions::check_permissions(db, &case.test_user, &[&PERMISSION_WORKFLOW_EDIT])
        .await
        .unwrap());
    assert!(acls::check_access(db, &case.test_user, &[&PERMISSION_WORKFLOW_EDIT], acls::AclObject::acl_ref(&workflow))
        .await
        .unwrap());
}

#[tokio::test]
async fn superuser_passes_every_check() {
    let case = ViewTestCase::set_up().await.unwrap();
    assert!(permissions::check_permissions(
        case.db().inner(),
        &case.admin_user,
        &[&PERMISSION_WORKFLOW_EDIT]
    )
    .await
    .unwrap());
}
