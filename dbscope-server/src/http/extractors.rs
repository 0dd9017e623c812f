//! Custom Axum extractors

use axum::extract::{FromRef, FromRequestParts, Path};
use axum::http::request::Parts;
use dbscope_core::{Database, Session};

use super::error::ApiError;
use crate::models::ValidationError;

/// One database session for the lifetime of a request handler.
///
/// Acquired before the handler runs and released when the handler's
/// future completes or is dropped, whichever comes first.
pub struct DbSession(pub Session);

impl<S> FromRequestParts<S> for DbSession
where
    Database: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let db = Database::from_ref(state);
        let session = db.session().await?;
        tracing::trace!(session_id = session.id(), "session bound to request");
        Ok(Self(session))
    }
}

/// Extract and validate a numeric id from path
pub struct ValidId(pub i64);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Blank { field: "id" }))?;

        let id = raw.parse::<i64>().map_err(|_| {
            ApiError::Validation(ValidationError::NotAnInteger {
                field: "id",
                value: raw.clone(),
            })
        })?;

        Ok(Self(id))
    }
}
