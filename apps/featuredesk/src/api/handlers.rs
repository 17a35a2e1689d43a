//! # API Endpoint Handlers
//!
//! Thin adapters from HTTP to [`FeatureService`](featuredesk_core::FeatureService).
//! Every JSON reply is an [`ApiResponse`] envelope.

use super::{
    AppState,
    error::ApiError,
    extract::{ApiJson, FeatureIdPath},
    types::{ApiResponse, FeatureResponse, HealthResponse},
};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
};
use chrono::Utc;
use featuredesk_core::{CreateFeatureRequest, FeatureError, UpdateFeatureRequest};

/// Result type for handlers.
type ApiResult<T> = Result<T, ApiError>;

impl AppState {
    fn api_error(&self, err: FeatureError) -> ApiError {
        ApiError::from_feature_error(err, self.config.is_development())
    }
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        &state.config.application_name,
        &state.config.version,
        Utc::now(),
    ))
}

// =============================================================================
// READ HANDLERS
// =============================================================================

/// List all features ordered by name.
pub async fn list_features_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<FeatureResponse>>>> {
    let features = state
        .service
        .list_all()
        .await
        .map_err(|e| state.api_error(e))?;

    let data = features.into_iter().map(FeatureResponse::from).collect();
    Ok(Json(ApiResponse::success(
        "Features retrieved successfully",
        data,
    )))
}

/// Get one feature by id.
pub async fn get_feature_handler(
    State(state): State<AppState>,
    FeatureIdPath(id): FeatureIdPath,
) -> ApiResult<Json<ApiResponse<FeatureResponse>>> {
    let feature = state
        .service
        .get_by_id(id)
        .await
        .map_err(|e| state.api_error(e))?
        .ok_or_else(ApiError::feature_not_found)?;

    Ok(Json(ApiResponse::success(
        "Feature retrieved successfully",
        feature.into(),
    )))
}

/// Get one feature by exact name.
pub async fn get_feature_by_name_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ApiResponse<FeatureResponse>>> {
    let feature = state
        .service
        .get_by_name(&name)
        .await
        .map_err(|e| state.api_error(e))?
        .ok_or_else(ApiError::feature_not_found)?;

    Ok(Json(ApiResponse::success(
        "Feature retrieved successfully",
        feature.into(),
    )))
}

/// Rendered, sanitized HTML of a feature's Markdown description.
pub async fn feature_description_handler(
    State(state): State<AppState>,
    FeatureIdPath(id): FeatureIdPath,
) -> ApiResult<Html<String>> {
    let feature = state
        .service
        .get_by_id(id)
        .await
        .map_err(|e| state.api_error(e))?
        .ok_or_else(ApiError::feature_not_found)?;

    Ok(Html(state.markdown.render_to_html(&feature.description)))
}

// =============================================================================
// WRITE HANDLERS
// =============================================================================

/// Create a feature. Responds 201 with a `Location` header.
pub async fn create_feature_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateFeatureRequest>,
) -> ApiResult<impl IntoResponse> {
    let feature = state
        .service
        .create(&request)
        .await
        .map_err(|e| state.api_error(e))?;

    let location = format!("/features/{}", feature.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(
            "Feature created successfully",
            FeatureResponse::from(feature),
        )),
    ))
}

/// Apply a partial update.
pub async fn update_feature_handler(
    State(state): State<AppState>,
    FeatureIdPath(id): FeatureIdPath,
    ApiJson(request): ApiJson<UpdateFeatureRequest>,
) -> ApiResult<Json<ApiResponse<FeatureResponse>>> {
    let feature = state
        .service
        .update(id, &request)
        .await
        .map_err(|e| state.api_error(e))?;

    Ok(Json(ApiResponse::success(
        "Feature updated successfully",
        feature.into(),
    )))
}

/// Delete a feature.
pub async fn delete_feature_handler(
    State(state): State<AppState>,
    FeatureIdPath(id): FeatureIdPath,
) -> ApiResult<Json<ApiResponse<()>>> {
    let deleted = state
        .service
        .delete(id)
        .await
        .map_err(|e| state.api_error(e))?;

    if !deleted {
        return Err(ApiError::feature_not_found());
    }
    Ok(Json(ApiResponse::acknowledged("Feature deleted successfully")))
}

// =============================================================================
// FALLBACK
// =============================================================================

/// Unknown routes still answer with the envelope.
pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound("Resource not found".to_string())
}
