//! Request extractors shared by handlers.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has been deserialised and passed its validation rules.
///
/// Rejects with 422 and a list of issues when the body is not valid JSON,
/// misses required fields, or breaks a field rule.
///
/// ```ignore
/// async fn create(ValidatedJson(input): ValidatedJson<NewMovie>) -> StoreReply {
///     // input satisfies every #[validate] rule on NewMovie
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string decoded into `T`.
///
/// Same as [`Query`] except that a string that does not decode (unknown
/// shape, repeated key) is rejected with a 400 JSON `{ "error": ... }`
/// body instead of plain text.
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(QueryParams(value))
    }
}
