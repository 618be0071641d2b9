use crate::helpers::spawn_app;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn valid_unknown_token() -> String {
    "0".repeat(64)
}

#[tokio::test]
async fn get_preferences_returns_400_for_a_malformed_token() {
    let test_app = spawn_app().await;

    let response = test_app.get_preferences("not-a-token").await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn get_preferences_returns_404_for_an_unknown_token() {
    let test_app = spawn_app().await;

    let response =
        test_app.get_preferences(&valid_unknown_token()).await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn get_preferences_reflects_the_subscription() {
    let test_app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;
    let token = test_app
        .subscribe_and_get_token(
            "reader@example.com",
            &["aviation", "dev-startup"],
        )
        .await;

    let response = test_app.get_preferences(&token).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value =
        response.json().await.expect("Body was not json");
    assert_eq!(body["email"], "reader@example.com");
    assert_eq!(body["preferences"]["aviation"], true);
    assert_eq!(body["preferences"]["dev-startup"], true);
    assert_eq!(body["preferences"]["education"], false);
    assert_eq!(body["preferences"]["all"], false);
    assert!(body["subscribedAt"].as_str().is_some());
}

#[tokio::test]
async fn update_rejects_a_body_leaving_zero_active_topics() {
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
        .patch_preferences(serde_json::json!({
            "token": token,
            "preferences": {
                "aviation": false,
                "dev-startup": false,
                "education": false,
                "all": false,
            },
        }))
        .await;

    assert_eq!(400, response.status().as_u16());
    // Stored state is untouched.
    let response = test_app.get_preferences(&token).await;
    let body: serde_json::Value =
        response.json().await.expect("Body was not json");
    assert_eq!(body["preferences"]["aviation"], true);
}

#[tokio::test]
async fn update_upserts_topics_that_never_had_a_row() {
    let test_app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;
    // Subscribe created rows for aviation only; the update touches all
    // four topics, rows that never existed included.
    let token = test_app
        .subscribe_and_get_token("reader@example.com", &["aviation"])
        .await;

    let response = test_app
        .patch_preferences(serde_json::json!({
            "token": token,
            "preferences": {
                "aviation": false,
                "dev-startup": true,
                "education": true,
                "all": false,
            },
        }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let response = test_app.get_preferences(&token).await;
    let body: serde_json::Value =
        response.json().await.expect("Body was not json");
    assert_eq!(body["preferences"]["aviation"], false);
    assert_eq!(body["preferences"]["dev-startup"], true);
    assert_eq!(body["preferences"]["education"], true);
    assert_eq!(body["preferences"]["all"], false);
}

#[tokio::test]
async fn the_update_email_names_only_the_newly_activated_topics() {
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

    let response = test_app
        .patch_preferences(serde_json::json!({
            "token": token,
            "preferences": {
                "aviation": true,
                "dev-startup": true,
                "education": true,
                "all": false,
            },
        }))
        .await;
    assert_eq!(200, response.status().as_u16());
    test_app.wait_for_emails(2).await;

    let requests =
        test_app.email_server.received_requests().await.unwrap();
    let update: serde_json::Value =
        serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(
        update["subject"],
        "Your newsletter preferences were updated"
    );
    let text = update["text_body"].as_str().unwrap();
    let listed = text
        .lines()
        .find(|line| line.starts_with("Newly activated topics:"))
        .expect("No newly-activated line in the email");
    // aviation stayed on and all stayed off, so neither is listed.
    assert!(listed.contains("dev-startup"));
    assert!(listed.contains("education"));
    assert!(!listed.contains("aviation"));
    assert!(!listed.contains("all"));
}

#[tokio::test]
async fn update_returns_400_when_the_body_shape_is_wrong() {
    let test_app = spawn_app().await;

    let response = test_app
        .patch_preferences(serde_json::json!({
            "preferences": {
                "aviation": true,
                "dev-startup": false,
                "education": false,
                "all": false,
            },
        }))
        .await;

    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value =
        response.json().await.expect("Body was not json");
    assert_eq!(body["errors"][0]["field"], "token");
}

#[tokio::test]
async fn update_returns_404_for_an_unknown_token() {
    let test_app = spawn_app().await;

    let response = test_app
        .patch_preferences(serde_json::json!({
            "token": valid_unknown_token(),
            "preferences": {
                "aviation": true,
                "dev-startup": false,
                "education": false,
                "all": false,
            },
        }))
        .await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn the_sixth_read_in_a_window_is_rate_limited() {
    let test_app = spawn_app().await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;
    let token = test_app
        .subscribe_and_get_token("reader@example.com", &["aviation"])
        .await;

    for _ in 0..5 {
        let response = test_app.get_preferences(&token).await;
        assert_eq!(200, response.status().as_u16());
    }
    let response = test_app.get_preferences(&token).await;

    assert_eq!(429, response.status().as_u16());
    assert_eq!(
        response
            .headers()
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok()),
        Some("0")
    );
    let retry_after: u64 = response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .expect("Missing Retry-After header");
    assert!(retry_after <= 60);
    // Reset is the end of the window as a unix timestamp, not a delta.
    let reset_at: u64 = response
        .headers()
        .get("X-RateLimit-Reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .expect("Missing X-RateLimit-Reset header");
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    assert!(reset_at >= now);
    assert!(reset_at <= now + 60);
}
