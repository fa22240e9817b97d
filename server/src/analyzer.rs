use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const PROMPT: &str = "Look at this hand-drawn note and answer plainly, as if explaining to a friend. \
If it is a math problem, solve it and walk through the steps. \
If it is text, summarize what it says. \
If it is a diagram, chart or formula, explain its parts and what they show. \
If it is a sketch, describe what it depicts. \
Keep the answer short and simple.";

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("request to model API failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("model API responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("No results from model")]
    Empty,
}

/// Turns a base64 PNG into a textual interpretation.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, png_base64: &str) -> Result<String, AnalyzerError>;
    async fn check(&self) -> Result<(), AnalyzerError>;
}

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

pub struct GeminiAnalyzer {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiAnalyzer {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn model_url(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
struct InlineData<'a> {
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

pub(crate) fn first_text(response: GenerateResponse) -> Result<String, AnalyzerError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or(AnalyzerError::Empty)
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AnalyzerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AnalyzerError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze(&self, png_base64: &str) -> Result<String, AnalyzerError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: PROMPT },
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: "image/png",
                            data: png_base64,
                        },
                    },
                ],
            }],
        };
        let response = self
            .client
            .post(format!("{}:generateContent", self.model_url()))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        first_text(response.json::<GenerateResponse>().await?)
    }

    async fn check(&self) -> Result<(), AnalyzerError> {
        let response = self
            .client
            .get(self.model_url())
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }
}
