use actix_web::{http::StatusCode, test, App};
use serde_json::json;

use rust_mps::config::Settings;
use rust_mps::routes;

const FIXTURE: &str = "\
* Generated by MPModelProtoExporter
*   Name             : unbounded_integers
*   Format           : Free
*   Constraints      : 1
*   Variables        : 2
*     Binary         : 0
*     Integer        : 2
*     Continuous     : 0
NAME          unbounded_integers
ROWS
 N  COST
 G  c
COLUMNS
  INTSTART  'MARKER'                            'INTORG'
    x       COST         1  c            1
    y       COST         1  c            1
  INTEND    'MARKER'                            'INTEND'
RHS
    RHS     c            2
BOUNDS
 LI BOUND   x            1
 LI BOUND   y            4
ENDATA
";

fn fixture_model() -> serde_json::Value {
    json!({
        "name": "unbounded_integers",
        "variables": [
            {"name": "x", "lower": 1, "upper": "Infinity", "is_integer": true},
            {"name": "y", "lower": 4, "upper": "Infinity", "is_integer": true}
        ],
        "linear_constraints": [
            {"name": "c", "lower": 2, "coefficients": {"x": 1, "y": 1}}
        ],
        "objective": {"sense": "minimize", "coefficients": {"x": 1, "y": 1}}
    })
}

fn protected() -> Settings {
    Settings {
        protect: true,
        api_key: Some("test-key".to_string()),
        ..Settings::default()
    }
}

macro_rules! service {
    ($settings:expr) => {
        test::init_service(App::new().configure(routes::configure($settings))).await
    };
}

#[actix_web::test]
async fn test_health_endpoint() {
    let app = service!(Settings::default());
    let req = test::TestRequest::get().uri("/health").to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = test::read_body(response).await;
    assert_eq!(body, "OK");
}

#[actix_web::test]
async fn test_root_redirects_to_docs() {
    let app = service!(Settings::default());
    let req = test::TestRequest::get().uri("/").to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get("Location").unwrap(), "/docs");
}

#[actix_web::test]
async fn test_docs_endpoint() {
    let app = service!(Settings::default());
    let req = test::TestRequest::get().uri("/docs").to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = test::read_body(response).await;
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("<!DOCTYPE html"));
    assert!(body.contains("MPS Conversion API"));
}

#[actix_web::test]
async fn test_mps_to_model_valid_request() {
    let app = service!(Settings::default());
    let req = test::TestRequest::post()
        .uri("/mps-to-model")
        .set_payload(FIXTURE)
        .to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["name"], "unbounded_integers");
    assert_eq!(body["variables"][1]["lower"], 4.0);
    assert_eq!(body["variables"][1]["upper"], "Infinity");
    assert_eq!(body["linear_constraints"][0]["upper"], "Infinity");
    assert_eq!(body["objective"]["sense"], "minimize");
}

#[actix_web::test]
async fn test_model_to_mps_reproduces_fixture() {
    let app = service!(Settings::default());
    let req = test::TestRequest::post()
        .uri("/model-to-mps")
        .set_json(fixture_model())
        .to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = test::read_body(response).await;
    assert_eq!(body, FIXTURE);
}

#[actix_web::test]
async fn test_mps_parse_error_reports_line() {
    let app = service!(Settings::default());
    let req = test::TestRequest::post()
        .uri("/mps-to-model")
        .set_payload("NAME broken\nROWS\n N obj\nCOLUMNS\n x obj 1\nBOUNDS\n UP BND z 4\nENDATA\n")
        .to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "MPS_REFERENTIAL");
    assert_eq!(body["line"], 7);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn test_model_to_mps_invalid_json() {
    let app = service!(Settings::default());
    let req = test::TestRequest::post()
        .uri("/model-to-mps")
        .insert_header(("content-type", "application/json"))
        .set_payload("invalid json")
        .to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "JSON_INVALID");
    assert!(body.get("line").is_none());
}

#[actix_web::test]
async fn test_model_to_mps_unwritable_model() {
    let app = service!(Settings::default());
    let mut model = fixture_model();
    model["variables"][0]["name"] = json!("x with spaces");
    let req = test::TestRequest::post()
        .uri("/model-to-mps")
        .set_json(model)
        .to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "WRITE_INVALID_NAME");
}

#[actix_web::test]
async fn test_convert_between_formats() {
    let app = service!(Settings::default());
    let req = test::TestRequest::post()
        .uri("/convert?from=json&to=mps")
        .set_json(fixture_model())
        .to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::OK);
    let mps = test::read_body(response).await;
    assert_eq!(mps, FIXTURE);

    let req = test::TestRequest::post()
        .uri("/convert?from=MPS&to=mps")
        .set_payload(FIXTURE)
        .to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(test::read_body(response).await, FIXTURE);
}

#[actix_web::test]
async fn test_convert_unknown_format() {
    let app = service!(Settings::default());
    let req = test::TestRequest::post()
        .uri("/convert?from=mps&to=lp")
        .set_payload(FIXTURE)
        .to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "UNKNOWN_FORMAT");
}

#[actix_web::test]
async fn test_convert_missing_query() {
    let app = service!(Settings::default());
    let req = test::TestRequest::post()
        .uri("/convert")
        .set_payload(FIXTURE)
        .to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "INVALID_QUERY");
}

#[actix_web::test]
async fn test_protected_mode_requires_api_key() {
    let app = service!(protected());

    let req = test::TestRequest::post()
        .uri("/mps-to-model")
        .set_payload(FIXTURE)
        .to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/mps-to-model")
        .insert_header(("X-API-Key", "wrong"))
        .set_payload(FIXTURE)
        .to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/mps-to-model")
        .insert_header(("X-API-Key", "test-key"))
        .set_payload(FIXTURE)
        .to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::OK);

    // health stays open
    let req = test::TestRequest::get().uri("/health").to_request();
    let response = test::call_service(&app, req).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_payload_limit() {
    let app = service!(Settings {
        payload_limit: 64,
        ..Settings::default()
    });
    let req = test::TestRequest::post()
        .uri("/mps-to-model")
        .set_payload(FIXTURE)
        .to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[actix_web::test]
async fn test_nonexistent_endpoint() {
    let app = service!(Settings::default());
    let req = test::TestRequest::get().uri("/nonexistent").to_request();
    let response = test::call_service(&app, req).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
