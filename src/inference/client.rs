use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::InferenceError;

/// Sampling parameters forwarded to the text-generation endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 500,
            temperature: 0.7,
            top_p: Some(0.9),
            do_sample: false,
        }
    }
}

/// Opaque supplier of generated text. The seam between the service and the
/// hosted model — endpoint handlers and tests only see this trait.
#[async_trait]
pub trait TextGeneration: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, InferenceError>;
}

/// Hugging Face Inference API client.
pub struct HfClient {
    base_url: String,
    api_token: Option<String>,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HfClient {
    pub fn new(base_url: &str, api_token: Option<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
            client,
            timeout_secs,
        }
    }
}

/// Request body for the hosted inference endpoint.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParams,
}

/// The hosted API answers with either a bare object or a one-element array,
/// and the text field's casing has varied. Normalised before any parsing
/// logic runs.
#[derive(Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Many(Vec<Generated>),
    One(Generated),
}

#[derive(Deserialize)]
struct Generated {
    #[serde(alias = "generatedText")]
    generated_text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String, InferenceError> {
        let first = match self {
            GenerateResponse::One(g) => Some(g),
            GenerateResponse::Many(v) => v.into_iter().next(),
        };
        first
            .and_then(|g| g.generated_text)
            .ok_or_else(|| InferenceError::MalformedResponse("No generated_text field".into()))
    }
}

#[async_trait]
impl TextGeneration for HfClient {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, InferenceError> {
        let url = format!("{}/models/{}", self.base_url, model);
        let body = GenerateRequest {
            inputs: prompt,
            parameters: params,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                InferenceError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                InferenceError::Timeout(self.timeout_secs)
            } else {
                InferenceError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

        parsed.into_text()
    }
}

/// Mock generator for tests — returns a configured response or error.
pub struct MockTextGeneration {
    outcome: Result<String, String>,
}

impl MockTextGeneration {
    pub fn new(response: &str) -> Self {
        Self {
            outcome: Ok(response.to_string()),
        }
    }

    /// A mock whose every call fails with the given API error body.
    pub fn failing(body: &str) -> Self {
        Self {
            outcome: Err(body.to_string()),
        }
    }
}

#[async_trait]
impl TextGeneration for MockTextGeneration {
    async fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, InferenceError> {
        match &self.outcome {
            Ok(text) => Ok(text.clone()),
            Err(body) => Err(InferenceError::Api {
                status: 503,
                body: body.clone(),
            }),
        }
    }
}
