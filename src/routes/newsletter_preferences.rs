use std::net::SocketAddr;

use anyhow::Context;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::AsyncConnection;

use crate::database::queries;
use crate::domain::{
    NewsletterTopic, TopicPreferences, UnsubscribeToken,
};
use crate::email_client::send::send_preference_update_email;
use crate::rate_limit::RateLimitDecision;
use crate::routes::ApiJson;
use crate::startup::ApplicationState;

#[derive(serde::Serialize)]
pub struct PreferencesResponse {
    pub success: bool,
    pub email: String,
    pub preferences: TopicPreferences,
    #[serde(rename = "subscribedAt")]
    pub subscribed_at: String,
}

#[tracing::instrument(
    name = "Reading newsletter preferences",
    skip(app_state, raw_token)
)]
pub async fn get_preferences(
    State(app_state): State<ApplicationState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path(raw_token): Path<String>,
) -> Result<Json<PreferencesResponse>, PreferencesError> {
    let decision = app_state
        .rate_limiter
        .check(
            &peer.ip().to_string(),
            app_state.settings.rate_limit.max_requests,
            app_state.settings.rate_limit.window(),
        )
        .await;
    if !decision.allowed {
        return Err(PreferencesError::RateLimited(decision));
    }

    let token = UnsubscribeToken::try_from(raw_token)
        .map_err(|_| PreferencesError::MalformedToken)?;

    let mut connection =
        crate::database::get_connection(app_state.database_pool)
            .await
            .context("Could not get connection from pool.")?;
    let subscriber =
        queries::find_subscriber_by_token(&mut connection, &token)
            .await?
            .ok_or(PreferencesError::UnknownToken)?;
    let preferences =
        queries::load_preferences(&mut connection, &subscriber.id).await?;

    Ok(Json(PreferencesResponse {
        success: true,
        email: subscriber.email,
        preferences,
        subscribed_at: subscriber.subscribed_at.to_rfc3339(),
    }))
}

#[derive(serde::Deserialize)]
pub struct UpdatePreferencesBody {
    pub token: String,
    pub preferences: TopicPreferences,
}

#[derive(serde::Serialize)]
pub struct UpdatePreferencesResponse {
    pub success: bool,
    pub message: String,
}

#[tracing::instrument(
    name = "Updating newsletter preferences",
    skip(app_state, body)
)]
pub async fn update_preferences(
    State(app_state): State<ApplicationState>,
    ApiJson(body): ApiJson<UpdatePreferencesBody>,
) -> Result<Json<UpdatePreferencesResponse>, PreferencesError> {
    let token = UnsubscribeToken::try_from(body.token)
        .map_err(|_| PreferencesError::MalformedToken)?;
    let requested = body.preferences;
    if !requested.any_subscribed() {
        return Err(PreferencesError::NoActiveTopics);
    }

    let mut connection =
        crate::database::get_connection(app_state.database_pool)
            .await
            .context("Could not get connection from pool.")?;
    let subscriber =
        queries::find_subscriber_by_token(&mut connection, &token)
            .await?
            .ok_or(PreferencesError::UnknownToken)?;

    let subscriber_id = subscriber.id;
    let previous = connection
        .transaction::<_, PreferencesError, _>(|conn| {
            async move {
                let previous =
                    queries::load_preferences(conn, &subscriber_id).await?;
                queries::upsert_preferences(conn, &subscriber_id, &requested)
                    .await?;
                queries::reactivate_subscriber(conn, &subscriber_id).await?;
                Ok(previous)
            }
            .scope_boxed()
        })
        .await?;

    let newly_active: Vec<NewsletterTopic> = requested
        .subscribed_topics()
        .into_iter()
        .filter(|topic| !previous.get(*topic))
        .collect();
    let email_client = app_state.email_client.clone();
    let base_url = app_state.base_url.clone();
    let recipient = crate::domain::SubscriberEmail::try_from(
        subscriber.email.clone(),
    );
    let stored_token = subscriber.unsubscribe_token.clone();
    tokio::spawn(async move {
        let recipient = match recipient {
            Ok(recipient) => recipient,
            Err(e) => {
                tracing::warn!(
                    "Stored subscriber email is invalid, skipping email: {}",
                    e
                );
                return;
            }
        };
        if let Err(e) = send_preference_update_email(
            &email_client,
            &recipient,
            &newly_active,
            &base_url,
            &stored_token,
        )
        .await
        {
            tracing::error!(
                "Failed to send preference update email: {:?}",
                e
            );
        }
    });

    Ok(Json(UpdatePreferencesResponse {
        success: true,
        message: "Preferences updated.".to_string(),
    }))
}

#[derive(thiserror::Error, Debug)]
pub enum PreferencesError {
    #[error("Too many requests.")]
    RateLimited(RateLimitDecision),
    #[error("Unsubscribe token is malformed.")]
    MalformedToken,
    #[error("At least one newsletter topic must remain active.")]
    NoActiveTopics,
    #[error("No subscriber matches this token.")]
    UnknownToken,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("Unknown database error.")]
    DatabaseError(#[from] diesel::result::Error),
}

impl IntoResponse for PreferencesError {
    fn into_response(self) -> axum::response::Response {
        #[derive(serde::Serialize)]
        struct PreferencesErrorResponse {
            success: bool,
            message: String,
        }
        tracing::error!("{} Reason: {:?}", self, self);
        let (status, message) = match &self {
            PreferencesError::RateLimited(decision) => {
                let mut headers = HeaderMap::new();
                let retry_after = decision.retry_after.as_secs();
                headers.insert(
                    "X-RateLimit-Limit",
                    HeaderValue::from(decision.limit),
                );
                headers.insert(
                    "X-RateLimit-Remaining",
                    HeaderValue::from(decision.remaining),
                );
                headers.insert(
                    "X-RateLimit-Reset",
                    HeaderValue::from(decision.reset_at_unix),
                );
                headers.insert(
                    "Retry-After",
                    HeaderValue::from(retry_after),
                );
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    headers,
                    axum::Json(PreferencesErrorResponse {
                        success: false,
                        message: "Too many requests, slow down.".to_string(),
                    }),
                )
                    .into_response();
            }
            PreferencesError::MalformedToken => (
                StatusCode::BAD_REQUEST,
                "Unsubscribe token is malformed.".to_string(),
            ),
            PreferencesError::NoActiveTopics => (
                StatusCode::BAD_REQUEST,
                "At least one newsletter topic must remain active."
                    .to_string(),
            ),
            PreferencesError::UnknownToken => (
                StatusCode::NOT_FOUND,
                "No subscriber matches this token.".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong".to_string(),
            ),
        };
        (
            status,
            axum::Json(PreferencesErrorResponse {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}
