use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const GENERATE_URL_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: ContentPart,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolDeclarations>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct ContentPart {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct ToolDeclarations {
    #[serde(rename = "functionDeclarations")]
    function_declarations: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(rename = "functionCall")]
    function_call: Option<RawFunctionCall>,
}

#[derive(Debug, Deserialize)]
struct RawFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

/// The instruction payload handed to the model for one generation.
#[derive(Debug, Clone)]
pub struct PlanPrompt {
    pub system_instruction: String,
    pub user_message: String,
}

#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub name: String,
    pub args: Value,
}

/// Everything the model produced: free text plus zero or more structured
/// tool invocations, in emission order.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutcome {
    pub text: String,
    pub function_calls: Vec<FunctionCall>,
}

#[derive(Debug)]
pub enum GeminiError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for GeminiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeminiError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            GeminiError::HttpError(err) => write!(f, "HTTP error: {}", err),
            GeminiError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for GeminiError {}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        GeminiError::HttpError(err)
    }
}

/// Structured generation capability: system instruction + tool schemas +
/// user message in, free text + tool invocations out.
pub trait GenerativeModel {
    async fn generate(
        &self,
        prompt: &PlanPrompt,
        tools: &[Value],
    ) -> Result<GenerationOutcome, GeminiError>;
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new() -> Result<Self, GeminiError> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            GeminiError::EnvironmentError("GEMINI_API_KEY environment variable not set".to_string())
        })?;
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

impl GenerativeModel for GeminiClient {
    async fn generate(
        &self,
        prompt: &PlanPrompt,
        tools: &[Value],
    ) -> Result<GenerationOutcome, GeminiError> {
        let request = GenerateContentRequest {
            system_instruction: ContentPart {
                parts: vec![TextPart {
                    text: prompt.system_instruction.clone(),
                }],
            },
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![TextPart {
                    text: prompt.user_message.clone(),
                }],
            }],
            tools: if tools.is_empty() {
                Vec::new()
            } else {
                vec![ToolDeclarations {
                    function_declarations: tools.to_vec(),
                }]
            },
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            GENERATE_URL_BASE, self.model, self.api_key
        );

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GeminiError::ResponseError(format!(
                "Generation request failed with status {}: {}",
                status, error_text
            )));
        }

        let generated: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::ResponseError(format!("Failed to parse response: {}", e)))?;

        let candidate = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or_else(|| GeminiError::ResponseError("No candidates in response".to_string()))?;

        let mut outcome = GenerationOutcome::default();
        let mut text_parts = Vec::new();
        for part in candidate.parts {
            if let Some(text) = part.text {
                text_parts.push(text);
            }
            if let Some(call) = part.function_call {
                outcome.function_calls.push(FunctionCall {
                    name: call.name,
                    args: call.args,
                });
            }
        }
        outcome.text = text_parts.join("\n");

        Ok(outcome)
    }
}
