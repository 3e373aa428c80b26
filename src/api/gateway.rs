use crate::config::GatewayConfig;
use crate::error::{GenerationError, Result};
use crate::script::Language;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, instrument, warn};

/// Body of a script generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRequest {
    pub question: String,
    pub language: Language,
}

/// Body of a scene image call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneImageRequest {
    pub visual_prompt: String,
    pub scene_number: u32,
    pub title: String,
}

/// Remote AI operations the pipeline depends on
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Ask for an explainer script. Returns the model's raw text, which
    /// nominally holds the script as JSON.
    async fn generate_script(&self, request: &ScriptRequest) -> Result<String>;

    /// Ask for a scene illustration. `Ok(None)` means the call went through
    /// but no image came back.
    async fn generate_scene_image(&self, request: &SceneImageRequest) -> Result<Option<String>>;
}

#[async_trait]
impl<G: Gateway + ?Sized> Gateway for std::sync::Arc<G> {
    async fn generate_script(&self, request: &ScriptRequest) -> Result<String> {
        (**self).generate_script(request).await
    }

    async fn generate_scene_image(&self, request: &SceneImageRequest) -> Result<Option<String>> {
        (**self).generate_scene_image(request).await
    }
}

/// Gateway backed by an OpenAI compatible chat completions endpoint
#[derive(Debug, Clone)]
pub struct GatewayClient {
    config: GatewayConfig,
    client: Client,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    async fn post(&self, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(&self.config.url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("AI API error: {} {}", status, error_text);
            return Err(classify_status(status));
        }

        let payload: Value = response.json().await?;
        check_payload(payload)
    }
}

#[async_trait]
impl Gateway for GatewayClient {
    #[instrument(skip(self, request), fields(language = %request.language))]
    async fn generate_script(&self, request: &ScriptRequest) -> Result<String> {
        info!("Generating script for question: {}", request.question);

        let body = json!({
            "model": self.config.script_model,
            "messages": [
                { "role": "system", "content": system_prompt(request.language) },
                {
                    "role": "user",
                    "content": format!(
                        "Create an explainer video script for the following topic: \"{}\"",
                        request.question
                    )
                }
            ]
        });

        let payload = self.post(&body).await?;
        let content = extract_content(&payload)
            .ok_or_else(|| GenerationError::Upstream("No content in AI response".to_string()))?;

        info!("AI response received ({} characters)", content.len());
        Ok(content.to_string())
    }

    #[instrument(skip(self, request), fields(scene = request.scene_number))]
    async fn generate_scene_image(&self, request: &SceneImageRequest) -> Result<Option<String>> {
        info!("Generating image for scene: {}", request.scene_number);

        let body = json!({
            "model": self.config.image_model,
            "messages": [
                { "role": "user", "content": image_prompt(request) }
            ],
            "modalities": ["image", "text"]
        });

        let payload = self.post(&body).await?;
        let url = extract_image_url(&payload).map(str::to_string);
        if url.is_none() {
            warn!("No image in response for scene {}", request.scene_number);
        }
        Ok(url)
    }
}

fn system_prompt(language: Language) -> String {
    format!(
        r#"You are an expert educational content creator who creates engaging explainer video scripts.
Your task is to generate a comprehensive video script that explains topics clearly and engagingly.

Generate the response in {} language.

You must respond with a valid JSON object with this exact structure:
{{
  "title": "A catchy, descriptive title for the video",
  "duration": "Estimated duration (e.g., '2-3 minutes')",
  "narration": "The full narration script, conversational and educational, 200-400 words.",
  "scenes": [
    {{
      "sceneNumber": 1,
      "title": "Scene title",
      "description": "What visuals should appear in this scene",
      "narrationSegment": "The part of narration for this scene",
      "visualPrompt": "A detailed prompt to generate AI visuals for this scene"
    }}
  ],
  "keyPoints": ["Key point 1", "Key point 2", "Key point 3"],
  "summary": "A brief 2-3 sentence summary of the topic"
}}

Create 4-6 scenes that break down the topic logically."#,
        language.display_name()
    )
}

fn image_prompt(request: &SceneImageRequest) -> String {
    format!(
        "Create an educational illustration for scene {} \"{}\": {}. \
         Clean, modern style, 16:9 aspect ratio, no text overlays.",
        request.scene_number, request.title, request.visual_prompt
    )
}

/// Map a non-success HTTP status onto the error taxonomy
pub fn classify_status(status: StatusCode) -> GenerationError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited,
        StatusCode::PAYMENT_REQUIRED => GenerationError::QuotaExhausted,
        other => GenerationError::Upstream(format!("AI API error: {}", other.as_u16())),
    }
}

/// Reject a successful response whose body still reports an error
pub fn check_payload(payload: Value) -> Result<Value> {
    if let Some(err) = payload.get("error").filter(|e| !e.is_null()) {
        return Err(GenerationError::Upstream(error_message(err)));
    }
    Ok(payload)
}

fn error_message(err: &Value) -> String {
    err.as_str()
        .or_else(|| err.get("message").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string())
}

pub fn extract_content(payload: &Value) -> Option<&str> {
    payload["choices"][0]["message"]["content"]
        .as_str()
        .filter(|s| !s.is_empty())
}

pub fn extract_image_url(payload: &Value) -> Option<&str> {
    payload["choices"][0]["message"]["images"][0]["image_url"]["url"]
        .as_str()
        .filter(|s| !s.is_empty())
}
