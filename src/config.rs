use std::net::SocketAddr;

pub const APP_NAME: &str = "symptomscope";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Service configuration, read once at startup and passed explicitly into
/// the components that need it. No module-level client state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Bearer token for the inference API. `None` is allowed at startup; the
    /// upstream call will then fail with an auth error surfaced per request.
    pub api_token: Option<String>,
    pub inference_base_url: String,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Load from the environment (`PORT`, `HUGGINGFACE_API_KEY`,
    /// `INFERENCE_BASE_URL`, `INFERENCE_TIMEOUT_SECS`), falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let api_token = std::env::var("HUGGINGFACE_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());
        if api_token.is_none() {
            tracing::warn!(
                "HUGGINGFACE_API_KEY not set — inference calls will be rejected upstream"
            );
        }

        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            api_token,
            inference_base_url: std::env::var("INFERENCE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            request_timeout_secs: std::env::var("INFERENCE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            api_token: None,
            inference_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

pub fn default_log_filter() -> String {
    format!("{APP_NAME}=info,tower_http=info")
}
