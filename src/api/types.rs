//! Shared state for the API layer.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::inference::{HfClient, TextGeneration};

/// Shared context for all API routes.
///
/// Holds the configuration and the text-generation client behind its trait,
/// so endpoint tests can swap in a mock without touching the network.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<AppConfig>,
    pub generator: Arc<dyn TextGeneration>,
}

impl ApiContext {
    /// Production context: a real inference client built from config.
    pub fn new(config: AppConfig) -> Self {
        let generator = HfClient::new(
            &config.inference_base_url,
            config.api_token.clone(),
            config.request_timeout_secs,
        );
        Self {
            config: Arc::new(config),
            generator: Arc::new(generator),
        }
    }

    /// Context with an explicit generator — used by tests.
    pub fn with_generator(config: AppConfig, generator: Arc<dyn TextGeneration>) -> Self {
        Self {
            config: Arc::new(config),
            generator,
        }
    }
}
