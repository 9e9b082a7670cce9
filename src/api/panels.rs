//! Precomputed views used by the frontend's main panels.

use axum::Json;
use axum::extract::State;
use serde_json::Value;

use super::ApiQuery;
use crate::db::query::Statement;
use crate::error::AppError;
use crate::models::panel::prof_total_hours_statement;
use crate::models::{PanelParams, ProfessorPanelParams, keyed};
use crate::state::AppState;

async fn data(state: &AppState, statement: Statement) -> Result<Json<Value>, AppError> {
    let records = state.catalog()?.fetch(&statement).await?;
    Ok(Json(keyed("data", records)))
}

#[utoipa::path(
    get,
    path = "/v1/classes_main_panel_info",
    tag = "Panels",
    params(PanelParams),
    responses(
        (status = 200, description = "`{data: [...]}`", body = serde_json::Value),
        (status = 400, description = "Invalid ordering clause"),
    ),
)]
pub async fn classes_main_panel_info(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PanelParams>,
) -> Result<Json<Value>, AppError> {
    data(&state, params.classes_statement()?).await
}

#[utoipa::path(
    get,
    path = "/v1/professors_main_panel_info",
    tag = "Panels",
    params(ProfessorPanelParams),
    responses(
        (status = 200, description = "`{data: [...]}`", body = serde_json::Value),
        (status = 400, description = "Invalid ordering clause or id list"),
    ),
)]
pub async fn professors_main_panel_info(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ProfessorPanelParams>,
) -> Result<Json<Value>, AppError> {
    data(&state, params.statement()?).await
}

/// Total hours assigned to each professor.
#[utoipa::path(
    get,
    path = "/v1/prof_total_hours",
    tag = "Panels",
    responses((status = 200, description = "`{data: [...]}`", body = serde_json::Value)),
)]
pub async fn prof_total_hours(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    data(&state, prof_total_hours_statement()).await
}
