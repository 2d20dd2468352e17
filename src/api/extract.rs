//! Request extractors with taxonomy-mapped rejections.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::Error;

/// JSON body extractor whose rejections speak the crate's error taxonomy:
/// well-formed JSON with missing or mistyped fields is 422, syntactically
/// broken JSON is 400.
#[derive(Debug)]
pub struct Json<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(match rejection {
                JsonRejection::JsonSyntaxError(e) => Error::BadRequest(e.body_text()),
                JsonRejection::JsonDataError(e) => Error::UnprocessableEntity(e.body_text()),
                other => Error::UnprocessableEntity(other.body_text()),
            }),
        }
    }
}
