use archivo::testing::{ViewTestCase, TEST_VIEW_NAME, TEST_VIEW_URL};
use kit::{RouteError, Router};
use pretty_assertions::assert_eq;
use serde_json::json;

fn route_table(case: &ViewTestCase) -> Vec<(String, String)> {
    case.client
        .router()
        .table()
        .iter()
        .map(|route| (route.method().to_string(), route.pattern().to_string()))
        .collect()
}

#[tokio::test]
async fn about_view_is_public() {
    let case = ViewTestCase::set_up().await.unwrap();

    let response = case.get("common:about_view", &[]).unwrap().send().await;
    response.assert_ok().assert_contains("About");
    assert_eq!(response.component(), Some("Common/About"));
    assert_eq!(response.context().unwrap()["title"], "About");
}

#[tokio::test]
async fn test_view_is_inserted_first_and_removed_on_tear_down() {
    let mut case = ViewTestCase::set_up().await.unwrap();
    let before = route_table(&case);

    case.add_test_view(json!("test object")).unwrap();
    {
        let router = case.client.router();
        assert_eq!(router.table().len(), before.len() + 1);
        let first = router.table().get(0).unwrap();
        assert_eq!(first.pattern(), TEST_VIEW_URL);
        assert_eq!(first.route_name(), Some(TEST_VIEW_NAME));
    }
    assert_eq!(case.client.reverse(TEST_VIEW_NAME, &[]).unwrap(), TEST_VIEW_URL);

    let response = case.client.get(TEST_VIEW_URL).send().await;
    response.assert_ok();
    assert_eq!(response.text(), "test object");

    case.tear_down().await.unwrap();
    assert_eq!(route_table(&case), before);
    case.client.get(TEST_VIEW_URL).send().await.assert_status(404);
}

#[tokio::test]
async fn test_view_context_carries_object_and_request() {
    let mut case = ViewTestCase::set_up().await.unwrap();
    case.add_test_view(json!({"label": "Invoices"})).unwrap();

    let context = case.get_test_view().await;
    assert_eq!(context["object"], json!({"label": "Invoices"}));
    assert_eq!(context["resolved_object"], json!({"label": "Invoices"}));
    assert_eq!(context["request"]["path"], TEST_VIEW_URL);
    assert_eq!(context["request"]["status"], 200);

    case.tear_down().await.unwrap();
}

#[tokio::test]
async fn tear_down_without_test_view_leaves_routes_alone() {
    let mut case = ViewTestCase::set_up().await.unwrap();
    let before = route_table(&case);
    case.tear_down().await.unwrap();
    assert_eq!(route_table(&case), before);
}

#[test]
fn removing_from_an_empty_table_fails() {
    let mut router = Router::new();
    let err = router.remove_route(0).unwrap_err();
    assert_eq!(err, RouteError::IndexOutOfRange { index: 0, len: 0 });
}

#[tokio::test]
async fn fixtures_log_in() {
    let case = ViewTestCase::set_up().await.unwrap();
    assert!(case.login_user().await);
    case.logout().await;
    assert!(case.login_admin_user().await);
    assert!(!case.login("test_user", "wrong password").await);
}
