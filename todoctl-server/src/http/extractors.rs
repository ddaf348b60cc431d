//! Custom Axum extractors
//!
//! Both reject with [`ApiError`], so malformed paths and bodies get the
//! same JSON error shape as store failures.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::ValidationError;

/// Extract and validate an integer todo id from path
pub struct TodoId(pub i64);

impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        let id = id.parse::<i64>().map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "must be an integer",
            })
        })?;

        Ok(Self(id))
    }
}

/// JSON request body whose rejection is an [`ApiError`]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "rejected request body");
                Err(ApiError::Validation(body_error(&rejection)))
            }
        }
    }
}

fn body_error(rejection: &JsonRejection) -> ValidationError {
    let reason = match rejection {
        JsonRejection::JsonDataError(_) => "does not match the expected fields",
        JsonRejection::JsonSyntaxError(_) => "is not valid JSON",
        JsonRejection::MissingJsonContentType(_) => "requires Content-Type: application/json",
        _ => "could not be read",
    };
    ValidationError::InvalidFormat {
        field: "body",
        reason,
    }
}
