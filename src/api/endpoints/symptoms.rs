//! Symptom analysis endpoints.
//!
//! Three analyze routes, one per response format, plus a connectivity probe.
//! Each analyze handler validates input, makes a single generation call, and
//! hands the raw text to the parsing core. The only error paths are invalid
//! input (rejected before any backend call) and upstream failures.

use axum::extract::State;
use axum::Json;
use futures_util::future::{join, join_all};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::analysis::{assemble, AnalysisMode, StructuredAnalysis};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::inference::prompt;
use crate::inference::GenerationParams;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub symptoms: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalAnalyzeRequest {
    pub symptoms: Vec<String>,
    /// Forwarded untouched — does not affect parsing.
    pub patient_id: Option<String>,
    /// Already-extracted document texts analyzed alongside the symptoms.
    /// Upload and text-extraction mechanics live outside this service.
    #[serde(default)]
    pub documents: Vec<DocumentInput>,
}

#[derive(Deserialize)]
pub struct DocumentInput {
    pub name: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct DocumentAnalysis {
    pub name: String,
    pub analysis: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalAnalyzeResponse {
    #[serde(flatten)]
    pub analysis: StructuredAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<DocumentAnalysis>,
}

#[derive(Serialize)]
pub struct TestApiResponse {
    pub success: bool,
    pub message: &'static str,
    pub response: String,
}

/// `GET /` — liveness banner.
pub async fn banner() -> Json<Value> {
    Json(json!({ "message": "API is working!" }))
}

/// `GET /api/symptoms` — list the available endpoints.
pub async fn index() -> Json<Value> {
    Json(json!({
        "availableEndpoints": {
            "testApi": {
                "method": "GET",
                "path": "/api/symptoms/test-api",
                "description": "Test inference API connection"
            },
            "analyzeQuick": {
                "method": "POST",
                "path": "/api/symptoms/analyze/quick",
                "description": "Analyze symptoms and get a short diagnosis with recommendations"
            },
            "analyze": {
                "method": "POST",
                "path": "/api/symptoms/analyze",
                "description": "Analyze symptoms and get structured medical advice"
            },
            "analyzeTechnical": {
                "method": "POST",
                "path": "/api/symptoms/analyze/technical",
                "description": "Detailed clinical analysis with differential diagnosis and references"
            }
        }
    }))
}

/// `GET /api/symptoms/test-api` — verify the inference API is reachable
/// and the configured token is accepted.
pub async fn test_api(State(ctx): State<ApiContext>) -> Result<Json<TestApiResponse>, ApiError> {
    let params = GenerationParams {
        max_new_tokens: 50,
        ..Default::default()
    };
    let response = ctx
        .generator
        .generate(prompt::QUICK_MODEL, "Hello, this is a test message.", &params)
        .await?;
    Ok(Json(TestApiResponse {
        success: true,
        message: "API key is working",
        response,
    }))
}

/// `POST /api/symptoms/analyze/quick` — two-field response format.
pub async fn analyze_quick(
    State(ctx): State<ApiContext>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<StructuredAnalysis>, ApiError> {
    let symptoms_text = validated_symptoms(&req.symptoms)?;
    let analysis = run_analysis(&ctx, AnalysisMode::Quick, &symptoms_text).await?;
    Ok(Json(analysis))
}

/// `POST /api/symptoms/analyze` — clinical format with severity and
/// urgent-care guidance.
pub async fn analyze_clinical(
    State(ctx): State<ApiContext>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<StructuredAnalysis>, ApiError> {
    let symptoms_text = validated_symptoms(&req.symptoms)?;
    let analysis = run_analysis(&ctx, AnalysisMode::Clinical, &symptoms_text).await?;
    Ok(Json(analysis))
}

/// `POST /api/symptoms/analyze/technical` — numbered-section clinical report
/// with differential diagnosis and literature references.
///
/// Document passes fan out concurrently and fan back in before assembly; no
/// state is shared between branches. A failing document is replaced with an
/// inline annotation and never aborts the other documents or the request.
pub async fn analyze_technical(
    State(ctx): State<ApiContext>,
    Json(req): Json<TechnicalAnalyzeRequest>,
) -> Result<Json<TechnicalAnalyzeResponse>, ApiError> {
    let symptoms_text = validated_symptoms(&req.symptoms)?;

    let document_passes = req.documents.iter().map(|doc| analyze_document(&ctx, doc));
    let (analysis, documents) = join(
        run_analysis(&ctx, AnalysisMode::Technical, &symptoms_text),
        join_all(document_passes),
    )
    .await;

    Ok(Json(TechnicalAnalyzeResponse {
        analysis: analysis?,
        patient_id: req.patient_id,
        documents,
    }))
}

/// One generation call plus assembly. The parsing step cannot fail; only the
/// upstream call can.
async fn run_analysis(
    ctx: &ApiContext,
    mode: AnalysisMode,
    symptoms_text: &str,
) -> Result<StructuredAnalysis, ApiError> {
    let spec = prompt::request_for(mode, symptoms_text);
    tracing::info!(model = spec.model, ?mode, "Requesting analysis");

    let raw = ctx
        .generator
        .generate(spec.model, &spec.prompt, &spec.params)
        .await?;
    tracing::debug!(chars = raw.len(), "Raw response received");

    Ok(assemble(&raw, mode))
}

async fn analyze_document(ctx: &ApiContext, doc: &DocumentInput) -> DocumentAnalysis {
    let spec = prompt::document_prompt(&doc.name, &doc.text);
    let analysis = match ctx
        .generator
        .generate(spec.model, &spec.prompt, &spec.params)
        .await
    {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(document = %doc.name, error = %err, "Document analysis failed");
            format!("[Analysis unavailable for {}: {}]", doc.name, err)
        }
    };
    DocumentAnalysis {
        name: doc.name.clone(),
        analysis,
    }
}

/// Reject before any backend call unless `symptoms` is a non-empty list of
/// non-empty strings. Returns the comma-joined symptom text.
fn validated_symptoms(symptoms: &[String]) -> Result<String, ApiError> {
    let cleaned: Vec<&str> = symptoms
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if cleaned.is_empty() {
        return Err(ApiError::BadRequest(
            "symptoms must be a non-empty list of non-empty strings".into(),
        ));
    }
    Ok(cleaned.join(", "))
}
