//! JSON body extractor whose rejections keep the API's error shape.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::CadastroError;

/// Like `axum::Json`, but a bad body answers `{"error": ...}` with the
/// rejection's status (400 syntax, 415 content type, 422 wrong shape).
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = CadastroError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(body))
    }
}
