use std::time::Duration;

use anyhow::{Context, bail};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;
use tracing::debug;
use vidlens_core::{Error, Result};

use crate::handler::{FrameAnalysis, VisionClient};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Vision client for OpenAI-compatible chat completion endpoints
pub struct OpenAiVisionClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    max_output_tokens: u32,
}

impl OpenAiVisionClient {
    pub fn new(api_key: Option<String>, api_base: Option<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::MissingCredential("OPENAI_API_KEY".to_string()))?;

        let client = reqwest::Client::builder()
            .user_agent("vidlens/0.2 (video frame analysis)")
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| Error::Other(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            api_base: api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            max_output_tokens: 300,
        })
    }

    fn request_body(&self, image: &[u8], prompt: &str, model: &str) -> serde_json::Value {
        serde_json::json!({
            "model": model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url",
                      "image_url": { "url": format!("data:image/jpeg;base64,{}", STANDARD.encode(image)) } }
                ]
            }],
            "max_tokens": self.max_output_tokens
        })
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

impl CompletionResponse {
    fn into_analysis(self) -> anyhow::Result<FrameAnalysis> {
        let description = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("Response contained no description")?;

        let (input_tokens, output_tokens) = self
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or((0, 0));

        Ok(FrameAnalysis {
            description: description.trim().to_string(),
            input_tokens,
            output_tokens,
        })
    }
}

#[async_trait]
impl VisionClient for OpenAiVisionClient {
    async fn describe(&self, image: &[u8], prompt: &str, model: &str) -> anyhow::Result<FrameAnalysis> {
        debug!("Describing {} byte image via {}", image.len(), model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(image, prompt, model))
            .send()
            .await
            .context("Failed to reach vision endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("HTTP error {}: {}", status.as_u16(), body.trim());
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse vision response")?;

        parsed.into_analysis()
    }
}
