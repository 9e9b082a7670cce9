//! Filterable resources backed by stored procedures, plus the two updates.

use axum::Json;
use axum::extract::State;
use serde_json::Value;

use super::ApiQuery;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

async fn filtered<F: ProcedureFilter>(state: &AppState, filter: &F) -> Result<Json<Value>, AppError> {
    let records = state.catalog()?.fetch(&filter.statement()).await?;
    Ok(Json(keyed(F::KEY, records)))
}

/// Classes, filtered by any combination of fields.
#[utoipa::path(
    get,
    path = "/v1/classes",
    tag = "Classes",
    params(ClassFilter),
    responses((status = 200, description = "`{classes: [...]}`", body = serde_json::Value)),
)]
pub async fn get_classes(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ClassFilter>,
) -> Result<Json<Value>, AppError> {
    filtered(&state, &filter).await
}

#[utoipa::path(
    get,
    path = "/v1/departments",
    tag = "Departments",
    params(DepartmentFilter),
    responses((status = 200, description = "`{departments: [...]}`", body = serde_json::Value)),
)]
pub async fn get_departments(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<DepartmentFilter>,
) -> Result<Json<Value>, AppError> {
    filtered(&state, &filter).await
}

#[utoipa::path(
    get,
    path = "/v1/professors",
    tag = "Professors",
    params(ProfessorFilter),
    responses((status = 200, description = "`{professors: [...]}`", body = serde_json::Value)),
)]
pub async fn get_professors(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ProfessorFilter>,
) -> Result<Json<Value>, AppError> {
    filtered(&state, &filter).await
}

#[utoipa::path(
    get,
    path = "/v1/dsders",
    tag = "Dsders",
    params(DsderFilter),
    responses((status = 200, description = "`{dsders: [...]}`", body = serde_json::Value)),
)]
pub async fn get_dsders(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<DsderFilter>,
) -> Result<Json<Value>, AppError> {
    filtered(&state, &filter).await
}

#[utoipa::path(
    get,
    path = "/v1/courses",
    tag = "Courses",
    params(CourseFilter),
    responses((status = 200, description = "`{courses: [...]}`", body = serde_json::Value)),
)]
pub async fn get_courses(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<CourseFilter>,
) -> Result<Json<Value>, AppError> {
    filtered(&state, &filter).await
}

/// Curricular units.
#[utoipa::path(
    get,
    path = "/v1/ucs",
    tag = "Ucs",
    params(UcFilter),
    responses((status = 200, description = "`{ucs: [...]}`", body = serde_json::Value)),
)]
pub async fn get_ucs(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<UcFilter>,
) -> Result<Json<Value>, AppError> {
    filtered(&state, &filter).await
}

#[utoipa::path(
    get,
    path = "/v1/wishlists",
    tag = "Wishlists",
    params(WishlistFilter),
    responses((status = 200, description = "`{wishlists: [...]}`", body = serde_json::Value)),
)]
pub async fn get_wishlists(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<WishlistFilter>,
) -> Result<Json<Value>, AppError> {
    filtered(&state, &filter).await
}

/// Assign a professor to a class, or clear it with `prof_id=-1`.
#[utoipa::path(
    put,
    path = "/v1/classes",
    tag = "Classes",
    params(AssignProfessorRequest),
    responses((status = 200, description = "Rows affected", body = UpdateResponse)),
)]
pub async fn assign_prof_to_class(
    State(state): State<AppState>,
    ApiQuery(req): ApiQuery<AssignProfessorRequest>,
) -> Result<Json<UpdateResponse>, AppError> {
    let affected = state.catalog()?.execute(&req.statement()).await?;
    tracing::info!("class {} assigned to professor {}: {} row(s)", req.class_id, req.prof_id, affected);
    Ok(Json(UpdateResponse::affected(affected)))
}

#[utoipa::path(
    put,
    path = "/v1/professors",
    tag = "Professors",
    params(UpdateAcronymRequest),
    responses((status = 200, description = "Rows affected", body = UpdateResponse)),
)]
pub async fn update_prof_acronym(
    State(state): State<AppState>,
    ApiQuery(req): ApiQuery<UpdateAcronymRequest>,
) -> Result<Json<UpdateResponse>, AppError> {
    let affected = state.catalog()?.execute(&req.statement()).await?;
    tracing::info!("professor {} acronym set to {:?}: {} row(s)", req.prof_id, req.acronym, affected);
    Ok(Json(UpdateResponse::affected(affected)))
}
