//! Service router.
//!
//! CORS is wide open, matching the original deployment where the frontend is
//! served from a different origin.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints::symptoms;
use crate::api::types::ApiContext;

/// Build the application router.
pub fn app_router(ctx: ApiContext) -> Router {
    let symptom_routes = Router::new()
        .route("/", get(symptoms::index))
        .route("/test-api", get(symptoms::test_api))
        .route("/analyze/quick", post(symptoms::analyze_quick))
        .route("/analyze", post(symptoms::analyze_clinical))
        .route("/analyze/technical", post(symptoms::analyze_technical))
        .with_state(ctx);

    Router::new()
        .route("/", get(symptoms::banner))
        .nest("/api/symptoms", symptom_routes)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppConfig;
    use crate::inference::client::{GenerationParams, TextGeneration};
    use crate::inference::{InferenceError, MockTextGeneration};

    fn test_ctx(generator: Arc<dyn TextGeneration>) -> ApiContext {
        ApiContext::with_generator(AppConfig::default(), generator)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn banner_responds() {
        let app = app_router(test_ctx(Arc::new(MockTextGeneration::new(""))));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "API is working!");
    }

    #[tokio::test]
    async fn endpoint_listing_names_all_analyze_routes() {
        let app = app_router(test_ctx(Arc::new(MockTextGeneration::new(""))));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/symptoms")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["availableEndpoints"]["analyzeTechnical"]["path"]
            .as_str()
            .unwrap()
            .ends_with("/analyze/technical"));
    }

    #[tokio::test]
    async fn clinical_analyze_returns_structured_fields() {
        let raw = "DIAGNOSIS:\nFlu-like illness\n\nRECOMMENDATIONS:\n1. Rest\n2. Hydrate\n\nSEVERITY:\nMild\n\nURGENT CARE NEEDED IF:\nHigh fever persists";
        let app = app_router(test_ctx(Arc::new(MockTextGeneration::new(raw))));

        let response = app
            .oneshot(post_json(
                "/api/symptoms/analyze",
                serde_json::json!({ "symptoms": ["fever", "cough"] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["diagnosis"], "Flu-like illness");
        assert_eq!(json["recommendations"][0], "Rest");
        assert_eq!(json["severity"], "Mild");
        assert_eq!(json["urgentCare"], "High fever persists");
        assert!(json["disclaimer"].as_str().unwrap().contains("AI-generated"));
    }

    #[tokio::test]
    async fn quick_analyze_drops_placeholder_lines() {
        let raw = "Possible Diagnosis:\nLikely a common cold.\n\nRecommendations:\nRest well.\n[ACTUAL RECOMMENDATION 2]";
        let app = app_router(test_ctx(Arc::new(MockTextGeneration::new(raw))));

        let response = app
            .oneshot(post_json(
                "/api/symptoms/analyze/quick",
                serde_json::json!({ "symptoms": ["sneezing"] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["diagnosis"], "Likely a common cold.");
        assert_eq!(json["recommendations"], serde_json::json!(["Rest well."]));
        assert!(json.get("severity").is_none());
    }

    #[tokio::test]
    async fn empty_symptom_list_is_a_client_error() {
        let app = app_router(test_ctx(Arc::new(MockTextGeneration::new("unused"))));
        let response = app
            .oneshot(post_json(
                "/api/symptoms/analyze",
                serde_json::json!({ "symptoms": [] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_bad_gateway() {
        let app = app_router(test_ctx(Arc::new(MockTextGeneration::failing(
            "invalid token",
        ))));
        let response = app
            .oneshot(post_json(
                "/api/symptoms/analyze",
                serde_json::json!({ "symptoms": ["fever"] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INFERENCE_FAILED");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("invalid token"));
    }

    /// Succeeds for the main symptom analysis but fails for any per-document
    /// pass, to exercise failure isolation.
    struct DocumentFailingMock;

    #[async_trait::async_trait]
    impl TextGeneration for DocumentFailingMock {
        async fn generate(
            &self,
            _model: &str,
            prompt: &str,
            _params: &GenerationParams,
        ) -> Result<String, InferenceError> {
            if prompt.contains("Document content:") {
                Err(InferenceError::Api {
                    status: 500,
                    body: "no extractable text".into(),
                })
            } else {
                Ok("1. Clinical Assessment:\nViral syndrome.\n".to_string())
            }
        }
    }

    #[tokio::test]
    async fn failing_document_is_annotated_not_fatal() {
        let app = app_router(test_ctx(Arc::new(DocumentFailingMock)));
        let response = app
            .oneshot(post_json(
                "/api/symptoms/analyze/technical",
                serde_json::json!({
                    "symptoms": ["fever"],
                    "patientId": "p-123",
                    "documents": [{ "name": "scan.pdf", "text": "..." }]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["patientId"], "p-123");
        assert_eq!(json["diagnosis"], "Viral syndrome.");
        let annotation = json["documents"][0]["analysis"].as_str().unwrap();
        assert!(annotation.starts_with("[Analysis unavailable for scan.pdf"));
    }

    #[tokio::test]
    async fn test_api_reports_backend_response() {
        let app = app_router(test_ctx(Arc::new(MockTextGeneration::new("pong"))));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/symptoms/test-api")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["response"], "pong");
    }
}
