use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::FieldError;

/// Json extractor whose rejection speaks the API's validation shape:
/// a 400 with a field error list instead of axum's plain-text 422.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = InvalidBody;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(InvalidBody)?;
        Ok(Self(value))
    }
}

#[derive(Debug)]
pub struct InvalidBody(JsonRejection);

// The closed set of body field names across the newsletter endpoints.
const BODY_FIELDS: [&str; 6] = [
    "newsletterTypes",
    "hardDelete",
    "preferences",
    "email",
    "source",
    "token",
];

/// Serde rejections carry the offending path in their message
/// ("missing field `email`", "newsletterTypes[0]: ..."), so matching
/// against the known field names pins the error to a field.
fn offending_field(detail: &str) -> &'static str {
    BODY_FIELDS
        .iter()
        .copied()
        .find(|field| detail.contains(field))
        .unwrap_or("body")
}

impl IntoResponse for InvalidBody {
    fn into_response(self) -> axum::response::Response {
        #[derive(serde::Serialize)]
        struct InvalidBodyResponse {
            success: bool,
            message: String,
            errors: Vec<FieldError>,
        }
        tracing::error!("Request body rejected: {:?}", self.0);
        let detail = self.0.body_text();
        (
            StatusCode::BAD_REQUEST,
            axum::Json(InvalidBodyResponse {
                success: false,
                message: "Request validation failed.".to_string(),
                errors: vec![FieldError {
                    field: offending_field(&detail),
                    message: detail,
                }],
            }),
        )
            .into_response()
    }
}
