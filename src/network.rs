use std::fs;

use anyhow::Context;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::models::StoryChoices;
use crate::prompts::{render_template, story_prompt};

const TEMPERATURE: f32 = 0.7;
const TOP_K: u32 = 40;
const TOP_P: f32 = 0.95;
const MAX_OUTPUT_TOKENS: u32 = 1024;

const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gemini API error: {status} - {message}")]
    Status { status: u16, message: String },
    #[error("invalid response format from Gemini API")]
    ResponseFormat,
    #[error("story withheld by the safety filter ({reason})")]
    SafetyFiltered { reason: String },
}

/// Turns a set of choices into story text. Implementations never retry.
///
/// The request is prepared when `generate` is called; the returned future
/// owns everything it needs so it can be spawned.
pub trait StoryGenerator: Send + Sync {
    fn generate(&self, choices: StoryChoices) -> BoxFuture<'static, Result<String, GenerateError>>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_k: TOP_K,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
            safety_settings: HARM_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl GenerateContentResponse {
    /// Pulls `candidates[0].content.parts[0].text` out of the payload.
    fn into_text(self) -> Result<String, GenerateError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GenerateError::SafetyFiltered { reason });
        }
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(GenerateError::ResponseFormat)?;
        let text = candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text);
        match (text, candidate.finish_reason.as_deref()) {
            (Some(text), _) => Ok(text),
            (None, Some("SAFETY")) => Err(GenerateError::SafetyFiltered {
                reason: "SAFETY".to_string(),
            }),
            (None, _) => Err(GenerateError::ResponseFormat),
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    prompt_template: Option<String>,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            prompt_template: None,
        }
    }

    pub fn with_prompt_template(mut self, template: Option<String>) -> Self {
        self.prompt_template = template;
        self
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let template = match settings.custom_prompt_path() {
            Some(path) => Some(
                fs::read_to_string(&path)
                    .with_context(|| format!("could not read prompt template {}", path.display()))?,
            ),
            None => None,
        };
        let api_key = settings.api_key();
        if api_key.is_none() {
            warn!("no Gemini API key configured, requests are sent without credentials");
        }
        info!(model = %settings.gemini_model, base_url = %settings.api_base_url, "Gemini client ready");
        Ok(Self::new(&settings.api_base_url, &settings.gemini_model, api_key).with_prompt_template(template))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn prompt_for(&self, choices: &StoryChoices) -> String {
        match &self.prompt_template {
            Some(template) => render_template(template, choices),
            None => story_prompt(choices),
        }
    }

    async fn request_story(&self, choices: &StoryChoices) -> Result<String, GenerateError> {
        let prompt = self.prompt_for(choices);
        let body = GenerateContentRequest::new(&prompt);

        let mut request = self.http.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("x-goog-api-key", key);
        }

        debug!(model = %self.model, theme = %choices.theme, age = %choices.age, "sending generateContent request");
        let response = request.send().await?;
        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&raw)
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(GenerateError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&raw).map_err(|e| {
            debug!(error = %e, "Gemini response is not the expected JSON");
            GenerateError::ResponseFormat
        })?;
        parsed.into_text()
    }
}

impl StoryGenerator for GeminiClient {
    fn generate(&self, choices: StoryChoices) -> BoxFuture<'static, Result<String, GenerateError>> {
        let client = self.clone();
        async move { client.request_story(&choices).await }.boxed()
    }
}
