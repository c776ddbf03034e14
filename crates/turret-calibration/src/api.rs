//! HTTP API for turret calibration.

use crate::error::Error;
use crate::models::{CalibrationCounter, RunResponse, SettingsRequest, ValidationErrors};
use crate::node::CalibrationState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

type AppState = Arc<CalibrationState>;

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allow_origin(&state.config.cors_origin))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/calibration/settings", put(put_settings))
        .route("/calibration/run", post(run))
        .route("/calibration/counters", get(list_counters))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn allow_origin(origin: &str) -> AllowOrigin {
    if origin == "*" {
        return AllowOrigin::from(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => AllowOrigin::exact(value),
        Err(e) => {
            tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
            AllowOrigin::from(Any)
        }
    }
}

/// Errors surfaced to HTTP clients.
enum ApiError {
    /// Body could not be parsed (unknown turret, wrong types, bad JSON)
    Malformed(String),
    /// Body parsed but failed field checks
    Invalid(ValidationErrors),
    /// Service error
    Service(Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Malformed(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Invalid(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::Service(err) => {
                let status = match err {
                    Error::NotConfigured | Error::Validation(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, Json(json!({ "error": err.to_string() }))).into_response()
            }
        }
    }
}

// --- Health ---

async fn health() -> &'static str {
    "OK"
}

// --- Calibration endpoints ---

async fn put_settings(
    State(state): State<AppState>,
    payload: Result<Json<SettingsRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!("Rejected settings body: {}", rejection.body_text());
        ApiError::Malformed(rejection.body_text())
    })?;

    match state.service.configure_request(&request).await {
        Ok(_) => Ok(StatusCode::ACCEPTED),
        Err(Error::Validation(errors)) => {
            tracing::warn!(
                "Rejected settings {:?} with {} invalid field(s): {}",
                request,
                errors.len(),
                errors
            );
            Err(ApiError::Invalid(errors))
        }
        Err(e) => Err(ApiError::Service(e)),
    }
}

async fn run(State(state): State<AppState>) -> Result<Json<RunResponse>, ApiError> {
    let response = state.service.run().await.map_err(ApiError::Service)?;
    Ok(Json(response))
}

async fn list_counters(
    State(state): State<AppState>,
) -> Result<Json<Vec<CalibrationCounter>>, ApiError> {
    let counters = state.service.counters().map_err(ApiError::Service)?;
    Ok(Json(counters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TurretLocation;
    use crate::node::CalibrationConfig;
    use crate::service::CalibrationService;
    use crate::storage::MemoryStore;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_with(store: MemoryStore) -> Router {
        let state = Arc::new(CalibrationState {
            service: CalibrationService::new(Arc::new(store)),
            config: CalibrationConfig::default(),
        });
        build_router(state)
    }

    fn settings_request(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::PUT)
            .uri("/calibration/settings")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn run_request() -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/calibration/run")
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn settings_json(caliber: i64, location: &str, start: i64, end: i64, rotations: i32) -> String {
        json!({
            "caliber": caliber,
            "location": location,
            "rotation_start_point": start,
            "rotation_end_point": end,
            "rotations": rotations,
        })
        .to_string()
    }

    #[tokio::test]
    async fn health_ok() {
        let app = app_with(MemoryStore::new());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn settings_then_run() {
        let app = app_with(MemoryStore::with_counters([CalibrationCounter {
            turret_location: TurretLocation::Stern,
            number_of_tests: 2,
        }]));

        let response = app
            .clone()
            .oneshot(settings_request(&settings_json(110, "Stern", 20, 120, 3)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = app.clone().oneshot(run_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body, json!({ "distanceInDegrees": 300, "numberOfTests": 3 }));

        let response = app.oneshot(run_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(
            body["error"],
            "Calibration Settings do not exist. Please set it before running a test."
        );
    }

    #[tokio::test]
    async fn run_without_settings_is_bad_request() {
        let app = app_with(MemoryStore::new());
        let response = app.oneshot(run_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn field_validation_messages() {
        let cases = [
            (
                settings_json(101, "Stern", 100, 120, 3),
                "caliber",
                "Minimum value of caliber is 102",
            ),
            (
                settings_json(550, "Stern", 100, 120, 3),
                "caliber",
                "Maximum value of caliber is 450",
            ),
            (
                settings_json(150, "Stern", 20, 120, -1),
                "rotations",
                "Minimum value of rotations is 1",
            ),
            (
                settings_json(150, "Stern", -1, 120, 9),
                "rotationStartPoint",
                "Minimum value of rotation_start_point is 0",
            ),
            (
                settings_json(150, "Stern", 10, 181, 9),
                "rotationEndPoint",
                "Maximum value of rotation_end_point is 180",
            ),
            (
                settings_json(150, "Stern", 100, 99, 9),
                "settingsRequest",
                "rotation_end_point must be greater than rotation_start_point",
            ),
        ];

        let app = app_with(MemoryStore::new());
        for (body, field, message) in cases {
            let response = app.clone().oneshot(settings_request(&body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
            let errors = json_body(response).await;
            assert_eq!(errors[field], message, "{}", body);
        }

        // Nothing was staged by the rejected requests.
        let response = app.oneshot(run_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_location_is_bad_request() {
        let app = app_with(MemoryStore::new());
        let response = app
            .oneshot(settings_request(&settings_json(150, "Front", 100, 120, 9)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("unknown variant `Front`"), "{}", message);
    }

    #[tokio::test]
    async fn counters_endpoint_lists_runs() {
        let app = app_with(MemoryStore::new());

        for location in ["Port", "Port", "Bow"] {
            let response = app
                .clone()
                .oneshot(settings_request(&settings_json(200, location, 0, 90, 1)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::ACCEPTED);
            let response = app.clone().oneshot(run_request()).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(Request::get("/calibration/counters").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body,
            json!([
                { "turretLocation": "Bow", "numberOfTests": 1 },
                { "turretLocation": "Port", "numberOfTests": 2 },
            ])
        );
    }
}
