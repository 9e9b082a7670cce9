pub mod docs;
pub mod dsd;
pub mod panels;
pub mod resources;

use axum::extract::{FromRequestParts, Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Redirect;
use axum::routing::get;
use axum::{Json, Router};
use tower::Layer;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;

use crate::db::pool::Readiness;
use crate::error::AppError;
use crate::state::AppState;

/// Query-string extractor whose rejections render as [`AppError`].
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

pub type App = Router;

pub fn router(state: AppState, cors_origins: &[String]) -> App {
    let v1 = Router::new()
        .route(
            "/classes",
            get(resources::get_classes).put(resources::assign_prof_to_class),
        )
        .route("/departments", get(resources::get_departments))
        .route(
            "/professors",
            get(resources::get_professors).put(resources::update_prof_acronym),
        )
        .route("/dsders", get(resources::get_dsders))
        .route("/courses", get(resources::get_courses))
        .route("/ucs", get(resources::get_ucs))
        .route("/wishlists", get(resources::get_wishlists))
        .route("/classes_main_panel_info", get(panels::classes_main_panel_info))
        .route("/professors_main_panel_info", get(panels::professors_main_panel_info))
        .route("/prof_total_hours", get(panels::prof_total_hours))
        .route("/validate_dsd", get(dsd::validate_dsd))
        .route("/export_dsd", get(dsd::export_dsd))
        .fallback(|| async { AppError::NotFound })
        .with_state(state.clone());

    // Data routes are registered without trailing slashes; `/v1/classes/` still
    // matches. The docs stay outside, Swagger UI lives at `/docs/`.
    let v1 = NormalizePathLayer::trim_trailing_slash().layer(v1);

    Router::new()
        .route("/", get(|| async { Redirect::temporary("/docs/") }))
        .route("/health", get(health))
        .nest_service("/v1", v1)
        .merge(docs_router())
        .fallback(|| async { AppError::NotFound })
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(feature = "swagger-ui")]
fn docs_router() -> Router<AppState> {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    SwaggerUi::new("/docs")
        .url("/openapi.json", docs::ApiDoc::openapi())
        .into()
}

#[cfg(not(feature = "swagger-ui"))]
fn docs_router() -> Router<AppState> {
    use utoipa::OpenApi;

    Router::new().route("/openapi.json", get(|| async { Json(docs::ApiDoc::openapi()) }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) if o != "*" => Some(origin),
            _ => {
                tracing::warn!("ignoring invalid CORS origin {:?}", o);
                None
            }
        })
        .collect();
    tracing::info!("CORS: allowing origins {:?}", origins);

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let readiness = state.readiness();
    let status = if readiness.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(readiness))
}
