//! Custom extractors whose rejections use the response envelope.

use super::error::ApiError;
use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use featuredesk_core::FeatureId;
use serde::de::DeserializeOwned;

/// JSON body extractor. Malformed bodies become a 400 envelope.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Feature id from the `{id}` path segment.
///
/// A non-numeric id cannot name a feature, so it is a 404.
#[derive(Debug, Clone, Copy)]
pub struct FeatureIdPath(pub FeatureId);

impl<S> FromRequestParts<S> for FeatureIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<i64> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::feature_not_found())?;
        Ok(Self(FeatureId(id)))
    }
}
