use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check_reports_a_valid_environment() {
    let test_app = spawn_app().await;

    let response = test_app.check_health().await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value =
        response.json().await.expect("Body was not json");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"]["valid"], true);
    assert_eq!(
        body["environment"]["variablesConfigured"]["database"],
        true
    );
    assert_eq!(
        body["environment"]["variablesConfigured"]["email_client"],
        true
    );
    assert!(body["timestamp"].as_str().is_some());
    assert!(body["env"].as_str().is_some());
}
