use crate::helpers::{fetch_preference_rows, fetch_subscriber, spawn_app};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn subscribe_returns_200_and_a_64_hex_token() {
    let test_app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .subscribe(serde_json::json!({
            "email": "reader@example.com",
            "newsletterTypes": ["aviation", "education"],
            "source": "blog-footer",
        }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value =
        response.json().await.expect("Body was not json");
    assert_eq!(body["success"], true);
    let token = body["unsubscribeToken"].as_str().unwrap();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));

    let mut connection =
        test_app.pool.get().await.expect("Could not get connection");
    let rows =
        fetch_subscriber(&mut connection, "reader@example.com").await;
    assert_eq!(rows.len(), 1);
    assert!(rows[0].active);
    assert_eq!(rows[0].source.as_deref(), Some("blog-footer"));
    let preferences =
        fetch_preference_rows(&mut connection, &rows[0].id).await;
    let mut active: Vec<&str> = preferences
        .iter()
        .filter(|p| p.subscribed)
        .map(|p| p.topic.as_str())
        .collect();
    active.sort();
    assert_eq!(active, vec!["aviation", "education"]);
}

#[tokio::test]
async fn subscribing_twice_replaces_topics_and_reuses_the_token() {
    let test_app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;

    let first_token = test_app
        .subscribe_and_get_token("reader@example.com", &["aviation"])
        .await;
    let second_token = test_app
        .subscribe_and_get_token(
            "reader@example.com",
            &["dev-startup", "all"],
        )
        .await;

    assert_eq!(first_token, second_token);

    let mut connection =
        test_app.pool.get().await.expect("Could not get connection");
    let rows =
        fetch_subscriber(&mut connection, "reader@example.com").await;
    assert_eq!(rows.len(), 1);
    let preferences =
        fetch_preference_rows(&mut connection, &rows[0].id).await;
    // Replace semantics: only the second topic set remains at all.
    let mut topics: Vec<&str> =
        preferences.iter().map(|p| p.topic.as_str()).collect();
    topics.sort();
    assert_eq!(topics, vec!["all", "dev-startup"]);
    assert!(preferences.iter().all(|p| p.subscribed));
}

#[tokio::test]
async fn subscribe_sends_a_welcome_email_with_the_token_link() {
    let test_app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let token = test_app
        .subscribe_and_get_token("reader@example.com", &["aviation"])
        .await;
    test_app.wait_for_emails(1).await;

    let email_request =
        &test_app.email_server.received_requests().await.unwrap()[0];
    let body: serde_json::Value =
        serde_json::from_slice(&email_request.body).unwrap();
    let links: Vec<_> = linkify::LinkFinder::new()
        .links(body["text_body"].as_str().unwrap())
        .filter(|l| *l.kind() == linkify::LinkKind::Url)
        .collect();
    assert_eq!(links.len(), 1);
    assert!(links[0].as_str().contains(&token));
}

#[tokio::test]
async fn an_email_failure_does_not_fail_the_subscription() {
    let test_app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .subscribe(serde_json::json!({
            "email": "reader@example.com",
            "newsletterTypes": ["aviation"],
        }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let mut connection =
        test_app.pool.get().await.expect("Could not get connection");
    let rows =
        fetch_subscriber(&mut connection, "reader@example.com").await;
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn subscribe_returns_400_with_field_errors_for_invalid_data() {
    let test_app = spawn_app().await;

    let test_cases = vec![
        (
            serde_json::json!({
                "email": "not-an-email",
                "newsletterTypes": ["aviation"],
            }),
            "email",
        ),
        (
            serde_json::json!({
                "email": "reader@example.com",
                "newsletterTypes": [],
            }),
            "newsletterTypes",
        ),
        (
            serde_json::json!({
                "email": "reader@example.com",
                "newsletterTypes": ["aviation"],
                "source": "s".repeat(51),
            }),
            "source",
        ),
    ];
    for (body, expected_field) in test_cases {
        let response = test_app.subscribe(body).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not reject an invalid {}",
            expected_field
        );
        let body: serde_json::Value =
            response.json().await.expect("Body was not json");
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .expect("No field error list")
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&expected_field));
    }
}

#[tokio::test]
async fn subscribe_returns_400_with_field_errors_when_the_body_shape_is_wrong(
) {
    let test_app = spawn_app().await;

    let test_cases = vec![
        (serde_json::json!({"newsletterTypes": ["aviation"]}), "email"),
        (
            serde_json::json!({"email": "reader@example.com"}),
            "newsletterTypes",
        ),
        (
            serde_json::json!({
                "email": "reader@example.com",
                "newsletterTypes": ["sports"],
            }),
            "newsletterTypes",
        ),
    ];
    for (body, expected_field) in test_cases {
        let response = test_app.subscribe(body).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not reject a malformed body touching {}",
            expected_field
        );
        let body: serde_json::Value =
            response.json().await.expect("Body was not json");
        assert_eq!(body["success"], false);
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .expect("No field error list")
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&expected_field));
    }
}
