mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use common::{Campus, campus, feedback_questions, memory_db};
use feedback_api_types::{CatalogEntry, ErrorResponse};
use feedback_core::domain::{CourseId, FormId};
use feedback_server::api::{AppState, STUDENT_HEADER, create_router};
use feedback_server::config::AdminSiteConfig;
use feedback_server::export::XLSX_CONTENT_TYPE;
use feedback_server::repository::{FormRepository, NewForm, SeaOrmFormRepository};
use serde::de::DeserializeOwned;
use serde_json::json;
use tower::ServiceExt;

fn router(campus: &Campus) -> Router {
    create_router(AppState::new(campus.db.clone(), AdminSiteConfig::default()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.expect("request should complete");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body).expect("json body")
}

async fn open_form(campus: &Campus) -> FormId {
    SeaOrmFormRepository::new(campus.db.clone())
        .create(NewForm {
            course_id: campus.courses[0].id,
            teacher_id: campus.teachers[0].id,
            title: "Weekly Check-in".to_string(),
            description: String::new(),
            is_active: true,
            questions: feedback_questions(),
        })
        .await
        .expect("form should be created")
        .id
}

#[tokio::test]
async fn test_health_check() {
    let app = create_router(AppState::new(memory_db().await, AdminSiteConfig::default()));

    let (status, body) = send(app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = parse(&body);
    assert_eq!(value["status"], "ok");
}

#[tokio::test]
async fn test_cascade_lookups_tolerate_bad_ids() {
    let campus = campus().await;

    let uri = format!("/api/catalog/courses?department={}", campus.department.id);
    let (status, body) = send(router(&campus), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    let courses: Vec<CatalogEntry<CourseId>> = parse(&body);
    assert_eq!(courses.len(), 3);

    for uri in [
        "/api/catalog/courses",
        "/api/catalog/courses?department=not-a-uuid",
        "/api/catalog/departments?school=",
    ] {
        let (status, body) = send(router(&campus), get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        let value: serde_json::Value = parse(&body);
        assert_eq!(value, json!([]), "{uri}");
    }
}

#[tokio::test]
async fn test_student_routes_require_identity() {
    let campus = campus().await;

    let (status, body) = send(router(&campus), get("/api/forms/dashboard")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.code, "UNAUTHORIZED");

    let request = Request::builder()
        .uri("/api/forms/dashboard")
        .header(STUDENT_HEADER, FormId::new().to_string())
        .body(Body::empty())
        .expect("valid request");
    let (status, _) = send(router(&campus), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_submit_over_http_once() {
    let campus = campus().await;
    let student = campus.register("21CS010", "Hana Sato", &[0]).await;
    let form_id = open_form(&campus).await;
    let questions = SeaOrmFormRepository::new(campus.db.clone())
        .questions(form_id)
        .await
        .expect("questions");

    let mut answers = serde_json::Map::new();
    answers.insert(
        questions[0].id.to_string(),
        json!(questions[0].options[0].id.to_string()),
    );
    answers.insert(questions[1].id.to_string(), json!("Great pacing"));
    let payload = json!({ "answers": answers });
    let submit = || {
        Request::builder()
            .method("POST")
            .uri(format!("/api/forms/{form_id}/submit"))
            .header(STUDENT_HEADER, student.id.to_string())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("valid request")
    };

    let (status, body) = send(router(&campus), submit()).await;
    assert_eq!(status, StatusCode::CREATED);
    let value: serde_json::Value = parse(&body);
    assert_eq!(
        value["message"],
        "Thank you! Your feedback has been submitted successfully."
    );

    let (status, body) = send(router(&campus), submit()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.code, "ALREADY_SUBMITTED");

    let fill_view = Request::builder()
        .uri(format!("/api/forms/{form_id}"))
        .header(STUDENT_HEADER, student.id.to_string())
        .body(Body::empty())
        .expect("valid request");
    let (status, _) = send(router(&campus), fill_view).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_form_export_is_an_attachment() {
    let campus = campus().await;
    let form_id = open_form(&campus).await;

    let response = router(&campus)
        .oneshot(get(&format!("/api/analytics/forms/{form_id}/export")))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        XLSX_CONTENT_TYPE
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .expect("ascii header");
    assert!(disposition.starts_with("attachment; filename=\"Feedback_CS201_Priya_Nair_"));
    assert!(disposition.ends_with(".xlsx\""));

    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert!(body.starts_with(b"PK"));
}

#[tokio::test]
async fn test_unknown_form_results_are_not_found() {
    let campus = campus().await;

    let uri = format!("/api/analytics/forms/{}/results", FormId::new());
    let (status, body) = send(router(&campus), get(&uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.code, "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_path_id_gets_json_error() {
    let campus = campus().await;

    let (status, body) = send(
        router(&campus),
        get("/api/analytics/forms/not-a-uuid/results"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = parse(&body);
    assert_eq!(error.code, "VALIDATION_ERROR");
    assert!(!error.error.is_empty());
}
