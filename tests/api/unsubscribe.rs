use crate::helpers::{fetch_subscriber, spawn_app};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn soft_unsubscribe_deactivates_and_clears_preferences() {
    let test_app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;
    let token = test_app
        .subscribe_and_get_token(
            "reader@example.com",
            &["aviation", "education"],
        )
        .await;

    let response = test_app
        .unsubscribe(serde_json::json!({"token": token}))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value =
        response.json().await.expect("Body was not json");
    assert_eq!(body["success"], true);

    let mut connection =
        test_app.pool.get().await.expect("Could not get connection");
    let rows =
        fetch_subscriber(&mut connection, "reader@example.com").await;
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].active);
    assert!(rows[0].unsubscribed_at.is_some());

    // The row survives, so the token still resolves, with all topics off.
    let response = test_app.get_preferences(&token).await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value =
        response.json().await.expect("Body was not json");
    for topic in ["aviation", "dev-startup", "education", "all"] {
        assert_eq!(body["preferences"][topic], false);
    }
}

#[tokio::test]
async fn soft_unsubscribe_is_idempotent_in_effect() {
    let test_app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;
    let token = test_app
        .subscribe_and_get_token("reader@example.com", &["aviation"])
        .await;

    let first = test_app
        .unsubscribe(serde_json::json!({"token": token}))
        .await;
    let second = test_app
        .unsubscribe(serde_json::json!({"token": token}))
        .await;

    assert_eq!(200, first.status().as_u16());
    assert_eq!(200, second.status().as_u16());
}

#[tokio::test]
async fn hard_delete_removes_the_row_and_later_lookups_404() {
    let test_app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;
    let token = test_app
        .subscribe_and_get_token("reader@example.com", &["aviation"])
        .await;

    let response = test_app
        .unsubscribe(
            serde_json::json!({"token": token, "hardDelete": true}),
        )
        .await;
    assert_eq!(200, response.status().as_u16());

    let mut connection =
        test_app.pool.get().await.expect("Could not get connection");
    let rows =
        fetch_subscriber(&mut connection, "reader@example.com").await;
    assert!(rows.is_empty());

    let response = test_app.get_preferences(&token).await;
    assert_eq!(404, response.status().as_u16());
    // A repeated hard delete has nothing to find.
    let response = test_app
        .unsubscribe(
            serde_json::json!({"token": token, "hardDelete": true}),
        )
        .await;
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn soft_and_hard_paths_answer_with_distinct_messages() {
    let test_app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;
    let soft_token = test_app
        .subscribe_and_get_token("soft@example.com", &["aviation"])
        .await;
    let hard_token = test_app
        .subscribe_and_get_token("hard@example.com", &["aviation"])
        .await;

    let soft: serde_json::Value = test_app
        .unsubscribe(serde_json::json!({"token": soft_token}))
        .await
        .json()
        .await
        .expect("Body was not json");
    let hard: serde_json::Value = test_app
        .unsubscribe(
            serde_json::json!({"token": hard_token, "hardDelete": true}),
        )
        .await
        .json()
        .await
        .expect("Body was not json");

    assert_ne!(soft["message"], hard["message"]);
}

#[tokio::test]
async fn unsubscribe_returns_400_when_the_token_field_is_missing() {
    let test_app = spawn_app().await;

    let response = test_app
        .unsubscribe(serde_json::json!({"hardDelete": true}))
        .await;

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value =
        response.json().await.expect("Body was not json");
    assert_eq!(body["errors"][0]["field"], "token");
}

#[tokio::test]
async fn unsubscribe_returns_400_for_a_malformed_token() {
    let test_app = spawn_app().await;

    let response = test_app
        .unsubscribe(serde_json::json!({"token": "nope"}))
        .await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn only_the_soft_path_sends_a_goodbye_email() {
    let test_app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;
    let token = test_app
        .subscribe_and_get_token("reader@example.com", &["aviation"])
        .await;
    // Welcome email from the subscribe above.
    test_app.wait_for_emails(1).await;

    test_app
        .unsubscribe(serde_json::json!({"token": token}))
        .await;
    test_app.wait_for_emails(2).await;

    let requests =
        test_app.email_server.received_requests().await.unwrap();
    let goodbye: serde_json::Value =
        serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(goodbye["subject"], "Sorry to see you go");
}
