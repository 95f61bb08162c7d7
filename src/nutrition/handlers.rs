use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    app::route_not_found,
    auth::MasterKey,
    error::AppError,
    nutrition::repo_types::NewNutritionEntry,
    state::AppState,
};

use super::dto::{CreatedNutritionResponse, NutritionListResponse};
use super::extractors::NutritionPayload;
use super::services::{create_entry, list_entries};

pub fn nutrition_routes() -> Router<AppState> {
    Router::new().route(
        "/nutrition",
        get(list_nutrition)
            .post(create_nutrition)
            .fallback(route_not_found),
    )
}

/// POST /api/health/nutrition { totalCalorie, totalProtien, totalFats?, totalCarbs? }
/// as JSON or a urlencoded form.
#[instrument(skip(state, payload))]
pub async fn create_nutrition(
    State(state): State<AppState>,
    _key: MasterKey,
    payload: NutritionPayload,
) -> Result<(StatusCode, Json<CreatedNutritionResponse>), AppError> {
    let entry = NewNutritionEntry::from_payload(&payload.0)
        .inspect_err(|e| warn!(error = %e, "nutrition payload rejected"))?;

    let created = create_entry(&state, entry).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedNutritionResponse {
            success: true,
            message: "Nutrition data stored successfully",
            data: created,
        }),
    ))
}

/// GET /api/health/nutrition, newest first
#[instrument(skip(state))]
pub async fn list_nutrition(
    State(state): State<AppState>,
    _key: MasterKey,
) -> Result<Json<NutritionListResponse>, AppError> {
    let data = list_entries(&state).await?;
    Ok(Json(NutritionListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::app::build_app;
    use crate::config::AppEnv;
    use crate::nutrition::repo::memory::MemoryNutritionStore;
    use crate::state::AppState;

    use super::*;

    const KEY: &str = "test-master-key";
    const PATH: &str = "/api/health/nutrition";

    fn app_with(store: Arc<MemoryNutritionStore>) -> Router {
        build_app(AppState::fake_with(store, AppEnv::Development))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(body: Value) -> Request<Body> {
        Request::post(PATH)
            .header("content-type", "application/json")
            .header("x-master-key", KEY)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn list() -> Request<Body> {
        Request::get(PATH)
            .header("x-master-key", KEY)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn create_returns_created_entry_with_null_optionals() {
        let store = Arc::new(MemoryNutritionStore::default());
        let app = app_with(store.clone());

        let (status, body) = send(&app, post(json!({ "totalCalorie": 2000, "totalProtien": 150 }))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Nutrition data stored successfully");
        assert_eq!(body["data"]["totalCalorie"], 2000.0);
        assert_eq!(body["data"]["totalProtien"], 150.0);
        assert!(body["data"]["totalFats"].is_null());
        assert!(body["data"]["totalCarbs"].is_null());
        assert!(body["data"]["_id"].is_string());
        assert!(body["data"]["createdAt"].is_string());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn create_without_protein_is_rejected_and_not_stored() {
        let store = Arc::new(MemoryNutritionStore::default());
        let app = app_with(store.clone());

        let (status, body) = send(&app, post(json!({ "totalCalorie": 2000 }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "success": false, "message": "totalProtien is required" })
        );
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn create_with_negative_value_is_not_stored() {
        let store = Arc::new(MemoryNutritionStore::default());
        let app = app_with(store.clone());

        let (status, body) =
            send(&app, post(json!({ "totalCalorie": -5, "totalProtien": 1 }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Calories cannot be negative");
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = app_with(Arc::new(MemoryNutritionStore::default()));
        let req = Request::post(PATH)
            .header("content-type", "application/json")
            .header("x-master-key", KEY)
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn form_post_is_cast_and_stored() {
        let store = Arc::new(MemoryNutritionStore::default());
        let app = app_with(store.clone());
        let req = Request::post(PATH)
            .header("content-type", "application/x-www-form-urlencoded")
            .header("x-master-key", KEY)
            .body(Body::from("totalCalorie=2000&totalProtien=150&totalCarbs=250"))
            .unwrap();

        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["totalCalorie"], 2000.0);
        assert_eq!(body["data"]["totalProtien"], 150.0);
        assert!(body["data"]["totalFats"].is_null());
        assert_eq!(body["data"]["totalCarbs"], 250.0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn form_post_with_text_value_is_rejected() {
        let store = Arc::new(MemoryNutritionStore::default());
        let app = app_with(store.clone());
        let req = Request::post(PATH)
            .header("content-type", "application/x-www-form-urlencoded")
            .header("x-master-key", KEY)
            .body(Body::from("totalCalorie=lots&totalProtien=150"))
            .unwrap();

        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "totalCalorie must be a number");
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn body_without_known_content_type_reads_as_empty() {
        let store = Arc::new(MemoryNutritionStore::default());
        let app = app_with(store.clone());
        let req = Request::post(PATH)
            .header("x-master-key", KEY)
            .body(Body::from(r#"{"totalCalorie":1,"totalProtien":1}"#))
            .unwrap();

        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "success": false, "message": "totalCalorie is required" })
        );
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn misspelling_fix_is_not_accepted_as_protein() {
        let store = Arc::new(MemoryNutritionStore::default());
        let app = app_with(store.clone());

        let (status, body) =
            send(&app, post(json!({ "totalCalorie": 5, "totalProtein": 7 }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "totalProtien is required");
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn identical_creates_yield_distinct_entries() {
        let app = app_with(Arc::new(MemoryNutritionStore::default()));
        let payload = json!({ "totalCalorie": 100, "totalProtien": 10 });

        let (_, first) = send(&app, post(payload.clone())).await;
        let (_, second) = send(&app, post(payload)).await;

        assert_ne!(first["data"]["_id"], second["data"]["_id"]);
    }

    #[tokio::test]
    async fn list_returns_count_and_newest_first() {
        let app = app_with(Arc::new(MemoryNutritionStore::default()));
        send(&app, post(json!({ "totalCalorie": 1000, "totalProtien": 50 }))).await;
        send(&app, post(json!({ "totalCalorie": 2000, "totalProtien": 150, "totalFats": 60 }))).await;

        let (status, body) = send(&app, list()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 2);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["totalCalorie"], 2000.0);
        assert_eq!(data[0]["totalFats"], 60.0);
        assert_eq!(data[1]["totalCalorie"], 1000.0);
    }

    #[tokio::test]
    async fn list_without_key_is_unauthenticated() {
        let app = app_with(Arc::new(MemoryNutritionStore::default()));
        let req = Request::get(PATH).body(Body::empty()).unwrap();

        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Authentication failed: No master key provided");
    }

    #[tokio::test]
    async fn wrong_key_is_forbidden_before_validation() {
        let store = Arc::new(MemoryNutritionStore::default());
        let app = app_with(store.clone());
        let req = Request::post(PATH)
            .header("content-type", "application/json")
            .header("authorization", "wrong")
            .body(Body::from("{}"))
            .unwrap();

        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Authentication failed: Invalid master key");
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn authorization_header_is_accepted() {
        let app = app_with(Arc::new(MemoryNutritionStore::default()));
        let req = Request::get(PATH)
            .header("authorization", KEY)
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn store_failures_surface_underlying_error() {
        let app = app_with(Arc::new(MemoryNutritionStore::failing()));

        let (status, body) = send(&app, post(json!({ "totalCalorie": 1, "totalProtien": 1 }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Error storing nutrition data");
        assert_eq!(body["error"], "connection refused");

        let (status, body) = send(&app, list()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Error fetching nutrition data");
        assert_eq!(body["error"], "connection refused");
    }
}
