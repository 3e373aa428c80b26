//! Gateway and pipeline configuration

use crate::error::{GenerationError, Result};
use std::time::Duration;

pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_SCRIPT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "google/gemini-2.5-flash-image-preview";

/// Connection settings for the AI gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub api_key: String,
    /// Chat completions endpoint
    pub url: String,
    pub script_model: String,
    pub image_model: String,
    /// Per-request timeout enforced by the HTTP client
    pub request_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            url: DEFAULT_GATEWAY_URL.to_string(),
            script_model: DEFAULT_SCRIPT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            request_timeout: Duration::from_secs(300),
        }
    }

    /// Create config from environment variables
    ///
    /// Reads:
    /// - `AI_GATEWAY_API_KEY` (required)
    /// - `AI_GATEWAY_URL`
    /// - `AI_GATEWAY_SCRIPT_MODEL`
    /// - `AI_GATEWAY_IMAGE_MODEL`
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_key(None)
    }

    /// Like [`GatewayConfig::from_env`], with `api_key` taking precedence
    /// over `AI_GATEWAY_API_KEY`
    pub fn from_env_with_key(api_key: Option<String>) -> Result<Self> {
        Self::from_lookup(api_key, |name| std::env::var(name).ok())
    }

    fn from_lookup<F>(api_key: Option<String>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = api_key
            .or_else(|| lookup("AI_GATEWAY_API_KEY"))
            .ok_or_else(|| {
                GenerationError::ConfigError("AI_GATEWAY_API_KEY is not configured".into())
            })?;

        let mut config = Self::new(api_key);
        if let Some(url) = lookup("AI_GATEWAY_URL") {
            config.url = url;
        }
        if let Some(model) = lookup("AI_GATEWAY_SCRIPT_MODEL") {
            config.script_model = model;
        }
        if let Some(model) = lookup("AI_GATEWAY_IMAGE_MODEL") {
            config.image_model = model;
        }
        Ok(config)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// How many scene images to request and how many may be in flight at once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePolicy {
    pub max_images: usize,
    pub concurrency: usize,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            max_images: 3,
            concurrency: 1,
        }
    }
}

/// Knobs for one orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Pause used by the `scenes` and `complete` stages
    pub pacing: Duration,
    /// Upper bound for each gateway call; `None` waits forever
    pub call_timeout: Option<Duration>,
    pub images: ImagePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(500),
            call_timeout: Some(Duration::from_secs(120)),
            images: ImagePolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// No pacing pauses, default everything else
    pub fn immediate() -> Self {
        Self {
            pacing: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_images(mut self, images: ImagePolicy) -> Self {
        self.images = images;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }
}
