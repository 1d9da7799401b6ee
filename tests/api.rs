//! HTTP API tests against the full router

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use stress_inference::{
    config::Config,
    create_router,
    logic::features::{layout_hash, FEATURE_COUNT, FEATURE_ORDER},
    logic::model::{ResourceProvider, ResourceSettings},
    AppState,
};

// ============================================================================
// HELPERS
// ============================================================================

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(value.to_string().as_bytes()).unwrap();
    path
}

/// Binary model that leans on HR_mean (feature 19)
fn hr_model(dir: &Path) -> PathBuf {
    let mut row = vec![0.0; FEATURE_COUNT];
    row[19] = 2.0;
    write_json(
        dir,
        "model.json",
        &json!({
            "name": "hr-only",
            "coefficients": [row],
            "intercepts": [-1.0],
            "layout_hash": layout_hash(),
        }),
    )
}

/// Standard scaler centring HR_mean on 80 bpm with 10 bpm scale
fn hr_scaler(dir: &Path) -> PathBuf {
    let mut mean = vec![0.0; FEATURE_COUNT];
    let mut scale = vec![1.0; FEATURE_COUNT];
    mean[19] = 80.0;
    scale[19] = 10.0;
    write_json(
        dir,
        "scaler.json",
        &json!({ "kind": "standard", "mean": mean, "scale": scale }),
    )
}

fn app(settings: ResourceSettings) -> Router {
    let provider = Arc::new(ResourceProvider::new(settings));
    create_router(AppState::new(Config::default(), provider))
}

fn persisted_app(dir: &Path) -> Router {
    app(ResourceSettings {
        model_path: hr_model(dir),
        scaler_path: hr_scaler(dir),
        ..ResourceSettings::default()
    })
}

fn fallback_app(dir: &Path) -> Router {
    app(ResourceSettings {
        model_path: dir.join("no_model.json"),
        scaler_path: dir.join("no_scaler.json"),
        ..ResourceSettings::default()
    })
}

/// Representative wrist-sensor statistics
fn features(hr_mean: f64) -> Value {
    let mut body = serde_json::Map::new();
    for (i, name) in FEATURE_ORDER.iter().enumerate() {
        body.insert(name.to_string(), json!(0.1 * (i + 1) as f64));
    }
    body.insert("HR_mean".to_string(), json!(hr_mean));
    body.insert("TEMP_mean".to_string(), json!(33.4));
    Value::Object(body)
}

async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    read(response).await
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ============================================================================
// PREDICTION
// ============================================================================

#[tokio::test]
async fn test_predict_stress() {
    let dir = tempfile::tempdir().unwrap();
    let body = features(105.0);

    let (status, value) =
        post_json(persisted_app(dir.path()), "/api/v1/predict_features", body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["success"], true);

    let prediction = &value["prediction"];
    assert_eq!(prediction["stress_state"], "Stress");
    assert_eq!(prediction["stress_level"], "High");
    assert_eq!(prediction["severity"], 4);
    assert_eq!(prediction["description"], "Experiencing stress");

    let stress = prediction["probabilities"]["Stress"].as_f64().unwrap();
    let baseline = prediction["probabilities"]["Baseline"].as_f64().unwrap();
    assert_eq!(prediction["confidence"].as_f64().unwrap(), stress);
    assert!(stress > baseline);
    assert!((stress + baseline - 1.0).abs() < 1e-6);

    assert_eq!(value["features"], body);
    assert!(value["timestamp"].is_string());
}

#[tokio::test]
async fn test_predict_baseline() {
    let dir = tempfile::tempdir().unwrap();

    let (status, value) = post_json(
        persisted_app(dir.path()),
        "/api/v1/predict_features",
        features(62.0).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["prediction"]["stress_state"], "Baseline");
    assert_eq!(value["prediction"]["severity"], 1);
}

#[tokio::test]
async fn test_predict_is_deterministic_apart_from_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let router = persisted_app(dir.path());
    let body = features(91.0).to_string();

    let (_, mut first) = post_json(router.clone(), "/api/v1/predict_features", body.clone()).await;
    let (_, mut second) = post_json(router, "/api/v1/predict_features", body).await;

    first.as_object_mut().unwrap().remove("timestamp");
    second.as_object_mut().unwrap().remove("timestamp");
    assert_eq!(first.to_string(), second.to_string());
}

#[tokio::test]
async fn test_missing_feature_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = features(80.0);
    body.as_object_mut().unwrap().remove("EDA_mean");

    let (status, value) =
        post_json(persisted_app(dir.path()), "/api/v1/predict_features", body.to_string()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(value["success"], false);
    assert_eq!(value["error"], "Missing feature in request: EDA_mean");
    assert!(value.get("prediction").is_none());
    assert!(value["timestamp"].is_string());
}

#[tokio::test]
async fn test_null_feature_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = features(80.0);
    body["Z_max"] = Value::Null;

    let (status, value) =
        post_json(persisted_app(dir.path()), "/api/v1/predict_features", body.to_string()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(value["error"].as_str().unwrap().contains("Z_max"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();

    let (status, value) = post_json(
        persisted_app(dir.path()),
        "/api/v1/predict_features",
        "{\"X_std\": 0.1,".to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["success"], false);
    assert_eq!(value["error"], "Malformed request body");
}

#[tokio::test]
async fn test_required_model_missing_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let router = app(ResourceSettings {
        model_path: dir.path().join("no_model.json"),
        scaler_path: dir.path().join("no_scaler.json"),
        require_model: true,
        ..ResourceSettings::default()
    });

    let (status, value) =
        post_json(router, "/api/v1/predict_features", features(80.0).to_string()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(value["success"], false);
    assert_eq!(value["error"], "Model or scaler is not loaded on the server.");
    assert!(value["details"].as_str().unwrap().starts_with("model unavailable"));
}

#[tokio::test]
async fn test_three_class_model_reports_unrecognized_class() {
    let dir = tempfile::tempdir().unwrap();
    let model = write_json(
        dir.path(),
        "three.json",
        &json!({
            "coefficients": vec![vec![0.0; FEATURE_COUNT]; 3],
            "intercepts": [0.0, 0.0, 3.0],
        }),
    );
    let router = app(ResourceSettings {
        model_path: model,
        scaler_path: dir.path().join("no_scaler.json"),
        ..ResourceSettings::default()
    });

    let (status, value) =
        post_json(router, "/api/v1/predict_features", features(80.0).to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(value["success"], false);
    assert_eq!(value["error"], "unrecognized class index 2");
    assert_eq!(value["features"]["TEMP_mean"], 33.4);
}

#[tokio::test]
async fn test_fallback_resources_still_predict() {
    let dir = tempfile::tempdir().unwrap();
    let router = fallback_app(dir.path());

    for _ in 0..10 {
        let (status, value) =
            post_json(router.clone(), "/api/v1/predict_features", features(80.0).to_string()).await;

        assert_eq!(status, StatusCode::OK);
        let state = value["prediction"]["stress_state"].as_str().unwrap();
        assert!(state == "Baseline" || state == "Stress");

        let sum: f64 = value["prediction"]["probabilities"]
            .as_object()
            .unwrap()
            .values()
            .map(|p| p.as_f64().unwrap())
            .sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }
}

// ============================================================================
// LEGACY
// ============================================================================

#[tokio::test]
async fn test_legacy_stats_shape() {
    let dir = tempfile::tempdir().unwrap();

    let (status, value) =
        post_json(persisted_app(dir.path()), "/api/stats", features(105.0).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["isSuccessful"], true);
    assert_eq!(value["prediction"], 1);
    assert!(value["confidence"].as_f64().unwrap() > 0.5);
    assert_eq!(value["features_received"]["HR_mean"], 105.0);
}

// ============================================================================
// STATUS
// ============================================================================

#[tokio::test]
async fn test_health_does_not_load_resources() {
    let dir = tempfile::tempdir().unwrap();
    let router = persisted_app(dir.path());

    let (status, value) = get(router.clone(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "ok");
    assert_eq!(value["model_loaded"], false);
    assert_eq!(value["scaler_loaded"], false);
    assert_eq!(value["feature_layout"]["feature_count"], 24);

    post_json(router.clone(), "/api/v1/predict_features", features(70.0).to_string()).await;

    let (_, value) = get(router, "/api/health").await;
    assert_eq!(value["model_loaded"], true);
    assert_eq!(value["scaler_loaded"], true);
    assert_eq!(value["model_kind"], "linear");
    assert_eq!(value["scaler_kind"], "standard");
    assert_eq!(value["degraded"], false);
}

#[tokio::test]
async fn test_health_reports_degraded_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let router = fallback_app(dir.path());

    post_json(router.clone(), "/api/v1/predict_features", features(70.0).to_string()).await;

    let (_, value) = get(router, "/api/health").await;
    assert_eq!(value["model_loaded"], true);
    assert_eq!(value["model_kind"], "fallback");
    assert_eq!(value["scaler_kind"], "identity");
    assert_eq!(value["degraded"], true);
}

#[tokio::test]
async fn test_feature_layout_endpoint() {
    let dir = tempfile::tempdir().unwrap();

    let (status, value) = get(fallback_app(dir.path()), "/api/v1/features").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["feature_count"], 24);
    assert_eq!(value["hash"], layout_hash());
    assert_eq!(value["feature_names"][0], "X_std");
    assert_eq!(value["feature_names"][23], "TEMP_mean");
}
