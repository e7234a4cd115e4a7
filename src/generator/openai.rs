use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::generator::TextGenerator;
use crate::http::HttpClient;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.95;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiGenerator {
    base_url: String,
    model: String,
    api_key: Option<String>,
    http: HttpClient,
}

impl OpenAiGenerator {
    pub fn new(base_url: &str, model: &str, api_key: Option<String>, http: HttpClient) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            http,
        }
    }

    /// Read the API key from `key_env`. A missing key fails on first use, not here.
    pub fn from_env(base_url: &str, model: &str, key_env: &str, http: HttpClient) -> Self {
        let api_key = std::env::var(key_env).ok().filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            log::warn!("{key_env} is not set; text generation is unavailable");
        }
        Self::new(base_url, model, api_key, http)
    }

    fn request_body(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        };
        Ok(serde_json::to_string(&request)?)
    }
}

impl TextGenerator for OpenAiGenerator {
    fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!("no API key configured for {}", self.base_url);
        };
        let url = format!("{}/chat/completions", self.base_url);
        log::info!("requesting {max_tokens} tokens from {}", self.model);
        let body = self
            .http
            .post_json(&url, Some(api_key), self.request_body(prompt, max_tokens)?)?;
        parse_completion(&body)
    }
}

fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse =
        serde_json::from_str(body).context("unexpected completion response")?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .unwrap_or_default();
    if content.is_empty() {
        bail!("the model returned no text");
    }
    Ok(content)
}
