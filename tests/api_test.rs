use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use dsd_api::api::{App, router};
use dsd_api::db::MemoryCatalog;
use dsd_api::db::pool::Readiness;
use dsd_api::db::query::SqlArg;
use dsd_api::models::Record;
use dsd_api::state::AppState;
use serde_json::{Value, json};
use tokio::sync::watch;
use tower::ServiceExt;

const FRONTEND: &str = "http://172.18.0.2:3000";

fn app_with(catalog: Arc<MemoryCatalog>) -> App {
    router(AppState::ready(catalog), &[FRONTEND.to_string()])
}

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => panic!("not an object"),
    }
}

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

async fn send(app: App, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.expect("infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn unfiltered_classes_pass_every_sentinel() {
    let rows = vec![
        record(json!({"class_id": 1, "year": 2023, "prof_id": 7})),
        record(json!({"class_id": 2, "year": 2023, "prof_id": null})),
    ];
    let catalog = Arc::new(MemoryCatalog::new().with_rows("FilterClasses", rows));

    let (status, body) = send(app_with(catalog.clone()), request(Method::GET, "/v1/classes")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classes"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["classes"][1]["prof_id"], Value::Null);

    let statements = catalog.statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].sql, "CALL FilterClasses(?, ?, ?, ?, ?, ?)");
    assert_eq!(
        statements[0].args,
        vec![
            SqlArg::Int(-1),
            SqlArg::Int(-1),
            SqlArg::Int(-1),
            SqlArg::Text(None),
            SqlArg::Float(-1.0),
            SqlArg::Int(-1),
        ]
    );
}

#[tokio::test]
async fn record_keys_keep_column_order() {
    let rows = vec![record(json!({"zeta": 1, "alpha": 2, "mid": 3}))];
    let catalog = Arc::new(MemoryCatalog::new().with_rows("FilterDsders", rows));

    let response = app_with(catalog)
        .oneshot(request(Method::GET, "/v1/dsders"))
        .await
        .expect("infallible");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");

    assert_eq!(std::str::from_utf8(&bytes).unwrap(), r#"{"dsders":[{"zeta":1,"alpha":2,"mid":3}]}"#);
}

#[tokio::test]
async fn trailing_slash_matches_the_same_route() {
    let catalog = Arc::new(MemoryCatalog::new());

    let (status, body) = send(app_with(catalog.clone()), request(Method::GET, "/v1/ucs/?director=4")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ucs": []}));
    assert_eq!(
        catalog.statements()[0].args,
        vec![SqlArg::Int(-1), SqlArg::Text(None), SqlArg::Text(None), SqlArg::Int(4)]
    );
}

#[tokio::test]
async fn filters_bind_in_procedure_order() {
    let catalog = Arc::new(MemoryCatalog::new());
    let uri = "/v1/professors?department=3&name=Ana%20Silva&rank=NULL";

    let (status, _) = send(app_with(catalog.clone()), request(Method::GET, uri)).await;

    assert_eq!(status, StatusCode::OK);
    let stmt = &catalog.statements()[0];
    assert_eq!(stmt.sql, "CALL FilterProfessors(?, ?, ?, ?, ?, ?, ?, ?, ?)");
    assert_eq!(stmt.args[5], SqlArg::Text(Some("Ana Silva".to_string())));
    assert_eq!(stmt.args[6], SqlArg::Text(None));
    assert_eq!(stmt.args[8], SqlArg::Int(3));
}

#[tokio::test]
async fn hours_filter_is_a_float() {
    let catalog = Arc::new(MemoryCatalog::new());

    send(app_with(catalog.clone()), request(Method::GET, "/v1/classes?hours=1.5&component=TP")).await;

    let args = &catalog.statements()[0].args;
    assert_eq!(args[3], SqlArg::Text(Some("TP".to_string())));
    assert_eq!(args[4], SqlArg::Float(1.5));
}

#[tokio::test]
async fn mistyped_filter_is_a_bad_request() {
    let catalog = Arc::new(MemoryCatalog::new());

    let (status, body) = send(app_with(catalog.clone()), request(Method::GET, "/v1/courses?id=abc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
    assert!(catalog.statements().is_empty());
}

#[tokio::test]
async fn unassigning_a_professor_binds_null() {
    let catalog = Arc::new(MemoryCatalog::new().with_affected(1));

    let (status, body) = send(
        app_with(catalog.clone()),
        request(Method::PUT, "/v1/classes?class_id=5&prof_id=-1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "1 record(s) affected"}));
    let stmt = &catalog.statements()[0];
    assert_eq!(stmt.sql, "UPDATE classes SET prof_id = ? WHERE class_id = ?");
    assert_eq!(stmt.args, vec![SqlArg::NullableInt(None), SqlArg::Int(5)]);
}

#[tokio::test]
async fn update_of_missing_professor_reports_zero_rows() {
    let catalog = Arc::new(MemoryCatalog::new().with_affected(0));

    let (status, body) = send(
        app_with(catalog),
        request(Method::PUT, "/v1/professors?prof_id=999&acronym=XYZ"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "0 record(s) affected"}));
}

#[tokio::test]
async fn update_requires_its_keys() {
    let catalog = Arc::new(MemoryCatalog::new());

    let (status, _) = send(app_with(catalog), request(Method::PUT, "/v1/professors?prof_id=3")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn panel_ordering_is_applied() {
    let catalog = Arc::new(MemoryCatalog::new());

    let (status, body) = send(
        app_with(catalog.clone()),
        request(Method::GET, "/v1/professors_main_panel_info?params=total_hours%20desc&prof_ids=1,2"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": []}));
    let stmt = &catalog.statements()[0];
    assert_eq!(
        stmt.sql,
        "SELECT * FROM professors_main_panel_info WHERE `prof_id` IN (?, ?) ORDER BY `total_hours` DESC"
    );
}

#[tokio::test]
async fn panel_rejects_sql_in_ordering() {
    let catalog = Arc::new(MemoryCatalog::new());

    let (status, _) = send(
        app_with(catalog.clone()),
        request(Method::GET, "/v1/classes_main_panel_info?params=uc_name%3B%20DROP%20TABLE%20classes"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(catalog.statements().is_empty());
}

#[tokio::test]
async fn prof_total_hours_returns_data() {
    let rows = vec![record(json!({"prof_id": 1, "total_hours": 6.0}))];
    let catalog = Arc::new(MemoryCatalog::new().with_rows("prof_total_hours", rows));

    let (status, body) = send(app_with(catalog), request(Method::GET, "/v1/prof_total_hours")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["total_hours"], json!(6.0));
}

#[tokio::test]
async fn validate_reports_warnings() {
    let catalog = Arc::new(
        MemoryCatalog::new()
            .with_rows("prof_total_hours", vec![record(json!({"prof_acronym": "AAA", "total_hours": 14}))])
            .with_rows("FilterClasses", vec![record(json!({"class_id": 3, "prof_id": null}))]),
    );

    let (status, body) = send(app_with(catalog), request(Method::GET, "/v1/validate_dsd?max_hours=12")).await;

    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<&str> = body["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|w| w["kind"].as_str())
        .collect();
    assert_eq!(kinds, vec!["overloaded_professor", "unassigned_class"]);
}

#[tokio::test]
async fn export_sets_download_headers() {
    let rows = vec![record(json!({"uc_name": "Calculus", "prof_acronym": "AAA"}))];
    let catalog = Arc::new(MemoryCatalog::new().with_rows("classes_main_panel_info", rows));

    let response = app_with(catalog)
        .oneshot(request(Method::GET, "/v1/export_dsd?file_type=csv"))
        .await
        .expect("infallible");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"dsd_"));
    assert!(disposition.ends_with(".csv\""));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), "uc_name,prof_acronym\r\nCalculus,AAA\r\n");
}

#[tokio::test]
async fn xls_export_is_an_xlsx_workbook() {
    let rows = vec![record(json!({"uc_name": "Calculus", "hours": 4.5}))];
    let catalog = Arc::new(MemoryCatalog::new().with_rows("classes_main_panel_info", rows));

    let response = app_with(catalog)
        .oneshot(request(Method::GET, "/v1/export_dsd?file_type=xls"))
        .await
        .expect("infallible");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.ends_with(".xlsx\""));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn export_rejects_unknown_file_type() {
    let catalog = Arc::new(MemoryCatalog::new());

    let (status, _) = send(app_with(catalog), request(Method::GET, "/v1/export_dsd?file_type=pdf")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn data_endpoints_wait_for_the_database() {
    let (_tx, rx) = watch::channel(Readiness::Connecting { attempt: 2 });
    let catalog = Arc::new(MemoryCatalog::new());
    let state = AppState::new(catalog.clone(), rx);

    let (status, _) = send(router(state.clone(), &[]), request(Method::GET, "/v1/classes")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(catalog.statements().is_empty());

    let (status, body) = send(router(state, &[]), request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"status": "connecting", "attempt": 2}));
}

#[tokio::test]
async fn health_is_ok_when_ready() {
    let (status, body) = send(app_with(Arc::new(MemoryCatalog::new())), request(Method::GET, "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ready"}));
}

#[tokio::test]
async fn root_redirects_to_docs() {
    let response = app_with(Arc::new(MemoryCatalog::new()))
        .oneshot(request(Method::GET, "/"))
        .await
        .expect("infallible");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/docs/");
}

#[cfg(feature = "swagger-ui")]
#[tokio::test]
async fn docs_redirect_lands_on_the_swagger_page() {
    let app = app_with(Arc::new(MemoryCatalog::new()));

    let response = app.clone().oneshot(request(Method::GET, "/docs")).await.expect("infallible");
    assert!(response.status().is_redirection());
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert_eq!(location, "/docs/");

    let response = app.oneshot(request(Method::GET, &location)).await.expect("infallible");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_under_v1_is_not_found() {
    let (status, body) = send(app_with(Arc::new(MemoryCatalog::new())), request(Method::GET, "/v1/nope/")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = send(app_with(Arc::new(MemoryCatalog::new())), request(Method::GET, "/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/v1/classes"]["get"].is_object());
    assert!(body["paths"]["/v1/classes"]["put"].is_object());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, body) = send(app_with(Arc::new(MemoryCatalog::new())), request(Method::GET, "/v2/classes")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");
}

#[tokio::test]
async fn cors_allows_only_the_frontend() {
    let allowed = Request::builder()
        .uri("/v1/dsders")
        .header(header::ORIGIN, FRONTEND)
        .body(Body::empty())
        .unwrap();
    let response = app_with(Arc::new(MemoryCatalog::new())).oneshot(allowed).await.unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], FRONTEND);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

    let foreign = Request::builder()
        .uri("/v1/dsders")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app_with(Arc::new(MemoryCatalog::new())).oneshot(foreign).await.unwrap();
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn wildcard_origin_is_ignored_instead_of_panicking() {
    let app = router(AppState::ready(Arc::new(MemoryCatalog::new())), &["*".to_string()]);
    let req = Request::builder()
        .uri("/v1/dsders")
        .header(header::ORIGIN, FRONTEND)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
