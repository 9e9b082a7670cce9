use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use super::ApiQuery;
use crate::error::AppError;
use crate::models::{ExportParams, ValidateParams, ValidationReport};
use crate::services;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/v1/validate_dsd",
    tag = "DSD",
    params(ValidateParams),
    responses((status = 200, description = "Warnings found in the current DSD", body = ValidationReport)),
)]
pub async fn validate_dsd(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ValidateParams>,
) -> Result<Json<ValidationReport>, AppError> {
    let warnings = services::validate_dsd(state.catalog()?, params.max_hours).await?;
    Ok(Json(ValidationReport { warnings }))
}

#[utoipa::path(
    get,
    path = "/v1/export_dsd",
    tag = "DSD",
    params(ExportParams),
    responses((status = 200, description = "DSD file download")),
)]
pub async fn export_dsd(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ExportParams>,
) -> Result<impl IntoResponse, AppError> {
    let file = services::export_dsd(state.catalog()?, params.file_type).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.filename);

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.body,
    ))
}
