use crate::database::queries;
use crate::domain::{
    FieldError, InvalidSubscription, NewSubscription, NewsletterTopic,
    UnsubscribeToken,
};
use crate::email_client::send::send_welcome_email;
use crate::routes::ApiJson;
use crate::startup::ApplicationState;
use anyhow::Context;
use axum::response::IntoResponse;
use axum::{extract::State, http::StatusCode, Json};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::AsyncConnection;

#[derive(serde::Deserialize)]
pub struct SubscribeBody {
    pub email: String,
    #[serde(rename = "newsletterTypes")]
    pub newsletter_types: Vec<NewsletterTopic>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(serde::Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "unsubscribeToken")]
    pub unsubscribe_token: String,
}

#[tracing::instrument(
    name = "Subscribing to the newsletter",
    skip(body, app_state),
    fields(subscriber_email = %body.email)
)]
pub async fn subscribe(
    State(app_state): State<ApplicationState>,
    ApiJson(body): ApiJson<SubscribeBody>,
) -> Result<Json<SubscribeResponse>, SubscribeError> {
    let subscription: NewSubscription =
        body.try_into().map_err(SubscribeError::Validation)?;

    let mut connection =
        crate::database::get_connection(app_state.database_pool)
            .await
            .context("Could not get connection from pool.")?;

    // A fresh token is offered to the upsert; on an email conflict the
    // stored one wins and comes back in the returning clause.
    let token = UnsubscribeToken::generate();
    let subscription_ref = &subscription;
    let token_ref = &token;
    let (_subscriber_id, stored_token) = connection
        .transaction::<_, SubscribeError, _>(|conn| {
            async move {
                let (subscriber_id, stored_token) =
                    queries::upsert_subscriber(
                        conn,
                        subscription_ref,
                        token_ref,
                    )
                    .await?;
                queries::replace_preferences(
                    conn,
                    &subscriber_id,
                    &subscription_ref.topics,
                )
                .await?;
                Ok((subscriber_id, stored_token))
            }
            .scope_boxed()
        })
        .await?;

    let email_client = app_state.email_client.clone();
    let base_url = app_state.base_url.clone();
    let recipient = subscription.email.clone();
    let topics = subscription.topics.clone();
    let token_for_email = stored_token.clone();
    tokio::spawn(async move {
        if let Err(e) = send_welcome_email(
            &email_client,
            &recipient,
            &topics,
            &base_url,
            &token_for_email,
        )
        .await
        {
            tracing::error!("Failed to send welcome email: {:?}", e);
        }
    });

    Ok(Json(SubscribeResponse {
        success: true,
        message: "Subscribed to the newsletter.".to_string(),
        unsubscribe_token: stored_token,
    }))
}

#[derive(thiserror::Error, Debug)]
pub enum SubscribeError {
    #[error("{0}")]
    Validation(InvalidSubscription),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("Unknown database error.")]
    DatabaseError(#[from] diesel::result::Error),
}

impl IntoResponse for SubscribeError {
    fn into_response(self) -> axum::response::Response {
        #[derive(serde::Serialize)]
        struct SubscribeErrorResponse {
            success: bool,
            message: String,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            errors: Vec<FieldError>,
        }
        tracing::error!("{} Reason: {:?}", self, self);
        let (status, message, errors) = match self {
            SubscribeError::Validation(invalid) => (
                StatusCode::BAD_REQUEST,
                "Request validation failed.".to_string(),
                invalid.0,
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong".to_string(),
                Vec::new(),
            ),
        };
        (
            status,
            axum::Json(SubscribeErrorResponse {
                success: false,
                message,
                errors,
            }),
        )
            .into_response()
    }
}
