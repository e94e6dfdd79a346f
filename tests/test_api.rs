// API tests
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::Value;

use iris_explorer::{
    api::{configure, AppState},
    data::{decode, FileSource},
    storage::DatasetLoader,
};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/iris.csv");

fn state(path: &str) -> web::Data<AppState> {
    web::Data::new(AppState::new(Arc::new(DatasetLoader::new(FileSource::new(path))), 10))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state).configure(configure)).await
    };
}

#[actix_web::test]
async fn test_health() {
    let app = app!(state(FIXTURE));
    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["dataset_loaded"], false);
}

#[actix_web::test]
async fn test_controls() {
    let app = app!(state(FIXTURE));
    let req = test::TestRequest::get().uri("/api/v1/controls").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["species"], serde_json::json!(["All", "setosa", "versicolor", "virginica"]));
    assert_eq!(body["total_rows"], 150);
    assert_eq!(body["numeric_columns"][0], "sepal_length");
    assert_eq!(body["bounds"][1]["attribute"], "sepal_width");
    assert_eq!(body["bounds"][1]["min"], 2.0);
    assert_eq!(body["bounds"][1]["max"], 4.4);
}

#[actix_web::test]
async fn test_explore_defaults() {
    let app = app!(state(FIXTURE));
    let req = test::TestRequest::get().uri("/api/v1/explore").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["filter"]["category"], "All");
    assert_eq!(body["filter"]["x_axis"], "sepal_length");
    assert_eq!(body["filter"]["range"], serde_json::json!([4.3, 7.9]));
    assert_eq!(body["summary"]["row_count"], 150);
    assert_eq!(body["summary"]["category_count"], 3);
    assert_eq!(body["summary"]["mean_y_display"], "5.84");
    assert_eq!(body["describe"].as_array().unwrap().len(), 4);
    assert_eq!(body["describe"][0]["count"], 150);
    assert_eq!(body["describe"][0]["display"][0]["label"], "count");
    assert_eq!(body["describe"][0]["display"][0]["value"], "150.00");
    assert_eq!(body["charts"]["scatter"].as_array().unwrap().len(), 3);
    assert_eq!(body["charts"]["histogram"]["edges"].as_array().unwrap().len(), 11);
    assert!(body.get("raw").is_none());
}

#[actix_web::test]
async fn test_explore_species_with_raw_rows() {
    let app = app!(state(FIXTURE));
    let req = test::TestRequest::get()
        .uri("/api/v1/explore?species=setosa&x_axis=petal_length&y_axis=petal_width&show_raw=true")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["summary"]["row_count"], 50);
    assert_eq!(body["summary"]["category_count"], 1);
    assert_eq!(body["raw"].as_array().unwrap().len(), 50);
    assert_eq!(body["raw"][0]["Species"], "setosa");
}

#[actix_web::test]
async fn test_explore_empty_result_reports_null_mean() {
    let app = app!(state(FIXTURE));
    let req = test::TestRequest::get()
        .uri("/api/v1/explore?x_axis=sepal_width&x_min=5.0&x_max=5.0&y_axis=petal_length")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    // 5.0 lies above every sepal width, so both bounds clamp to the maximum
    assert_eq!(body["filter"]["range"], serde_json::json!([4.4, 4.4]));
    assert_eq!(body["summary"]["row_count"], 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/explore?species=setosa&x_axis=petal_length&x_min=3.0&x_max=4.0")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["summary"]["row_count"], 0);
    assert_eq!(body["summary"]["category_count"], 0);
    assert!(body["summary"]["mean_y"].is_null());
    assert_eq!(body["summary"]["mean_y_display"], "NaN");
    assert_eq!(body["describe"][0]["count"], 0);
    assert!(body["charts"]["boxes"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_explore_rejects_unknown_axis() {
    let app = app!(state(FIXTURE));
    let req = test::TestRequest::get().uri("/api/v1/explore?x_axis=stem").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation");
}

#[actix_web::test]
async fn test_malformed_query_returns_json_error() {
    let app = app!(state(FIXTURE));

    for uri in ["/api/v1/explore?x_min=abc", "/api/v1/export?x_max=abc", "/api/v1/explore?show_raw=maybe"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "validation", "{}", uri);
        assert!(body["message"].is_string());
    }
}

#[actix_web::test]
async fn test_export_download() {
    let app = app!(state(FIXTURE));
    let req = test::TestRequest::get()
        .uri("/api/v1/export?species=virginica")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "text/csv");
    let disposition = resp.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("iris_filtered.csv"));

    let body = test::read_body(resp).await;
    let table = decode(&body).unwrap();
    assert_eq!(table.len(), 50);
    assert!(table.iter().all(|r| r.species == "virginica"));
}

#[actix_web::test]
async fn test_unavailable_source_is_bad_gateway() {
    let app = app!(state("/nonexistent/iris.csv"));
    let req = test::TestRequest::get().uri("/api/v1/controls").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "source_unavailable");
}
