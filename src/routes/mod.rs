use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::error::Error;

pub mod applications;
pub mod categories;
pub mod comments;
pub mod health;
pub mod jobs;
pub mod likes;
pub mod profile;

/// Path extractor whose rejection uses the error envelope, so a
/// malformed id yields the same `{success, message}` shape as every
/// other 400.
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Path(value)),
            Err(_) => Err(Error::BadRequest("Invalid id format".to_string())),
        }
    }
}
