use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::AsyncConnection;

use crate::database::queries;
use crate::domain::{SubscriberEmail, UnsubscribeToken};
use crate::routes::ApiJson;
use crate::email_client::send::send_goodbye_email;
use crate::startup::ApplicationState;

#[derive(serde::Deserialize)]
pub struct UnsubscribeBody {
    pub token: String,
    #[serde(rename = "hardDelete", default)]
    pub hard_delete: bool,
}

#[derive(serde::Serialize)]
pub struct UnsubscribeResponse {
    pub success: bool,
    pub message: String,
}

#[tracing::instrument(
    name = "Unsubscribing from the newsletter",
    skip(app_state, body),
    fields(hard_delete = body.hard_delete)
)]
pub async fn unsubscribe(
    State(app_state): State<ApplicationState>,
    ApiJson(body): ApiJson<UnsubscribeBody>,
) -> Result<Json<UnsubscribeResponse>, UnsubscribeError> {
    let token = UnsubscribeToken::try_from(body.token)
        .map_err(|_| UnsubscribeError::MalformedToken)?;

    let mut connection =
        crate::database::get_connection(app_state.database_pool)
            .await
            .context("Could not get connection from pool.")?;
    let subscriber =
        queries::find_subscriber_by_token(&mut connection, &token)
            .await?
            .ok_or(UnsubscribeError::UnknownToken)?;
    let subscriber_id = subscriber.id;

    if body.hard_delete {
        queries::delete_subscriber(&mut connection, &subscriber_id).await?;
        return Ok(Json(UnsubscribeResponse {
            success: true,
            message: "Your data has been permanently deleted.".to_string(),
        }));
    }

    connection
        .transaction::<_, UnsubscribeError, _>(|conn| {
            async move {
                queries::deactivate_subscriber(conn, &subscriber_id).await?;
                queries::clear_preferences(conn, &subscriber_id).await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await?;

    let email_client = app_state.email_client.clone();
    let base_url = app_state.base_url.clone();
    let recipient = SubscriberEmail::try_from(subscriber.email.clone());
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
        if let Err(e) =
            send_goodbye_email(&email_client, &recipient, &base_url).await
        {
            tracing::error!("Failed to send goodbye email: {:?}", e);
        }
    });

    Ok(Json(UnsubscribeResponse {
        success: true,
        message: "You have been unsubscribed from all newsletters."
            .to_string(),
    }))
}

#[derive(thiserror::Error, Debug)]
pub enum UnsubscribeError {
    #[error("Unsubscribe token is malformed.")]
    MalformedToken,
    #[error("No subscriber matches this token.")]
    UnknownToken,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("Unknown database error.")]
    DatabaseError(#[from] diesel::result::Error),
}

impl IntoResponse for UnsubscribeError {
    fn into_response(self) -> axum::response::Response {
        #[derive(serde::Serialize)]
        struct UnsubscribeErrorResponse {
            success: bool,
            message: String,
        }
        tracing::error!("{} Reason: {:?}", self, self);
        let (status, message) = match self {
            UnsubscribeError::MalformedToken => (
                StatusCode::BAD_REQUEST,
                "Unsubscribe token is malformed.".to_string(),
            ),
            UnsubscribeError::UnknownToken => (
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
            axum::Json(UnsubscribeErrorResponse {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}
