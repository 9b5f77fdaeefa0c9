//! Pull request draft generation
//!
//! Sends the collected diff to an OpenAI chat completion endpoint and
//! normalizes the response into a [`Draft`]. The model is untrusted to
//! follow formatting instructions, so fence stripping is a required step
//! before the response is parsed.

use crate::error::{Error, Result};
use crate::types::Draft;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default completion API base URL.
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Model used for draft generation.
const MODEL: &str = "gpt-4o";

/// Output token budget for a single draft.
const MAX_TOKENS: u32 = 300;

/// System instruction mandating a strict JSON-only response shape.
const SYSTEM_PROMPT: &str = r#"You are an Azure DevOps pull request assistant.

Create a new pull request draft that is concise and professional based on the provided changes.

You will ONLY and ALWAYS respond in the following exact JSON format - with NO markdown, code blocks, or explanations.
DO NOT wrap the JSON in triple backticks or markdown code fences.

Respond ONLY with this format:
{
  "Title": "...",
  "Body": "..."
}
NEVER give a response that is not of that format"#;

#[derive(Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Draft generator backed by an OpenAI-compatible completion endpoint
pub struct DraftGenerator {
    client: Client,
    api_key: String,
    api_base: String,
}

impl DraftGenerator {
    /// Create a generator using the default API base.
    pub fn new(client: Client, api_key: &str) -> Self {
        Self::with_api_base(client, api_key, DEFAULT_API_BASE)
    }

    /// Create a generator pointed at a custom API base (used by tests).
    pub fn with_api_base(client: Client, api_key: &str, api_base: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Generate a draft from the current branch, diff, and user instruction.
    ///
    /// One request, no retries, no streaming. A malformed or empty
    /// completion is a terminal error for the run.
    pub async fn generate(
        &self,
        source_branch: &str,
        diff: &str,
        user_input: &str,
    ) -> Result<Draft> {
        let user_prompt = format!(
            "Current branch: {source_branch}\nChanges:\n{diff}\n\nUser input: {}",
            user_input.trim()
        );

        let request = CompletionRequest {
            model: MODEL.to_string(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: user_prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
        };

        let url = format!("{}/chat/completions", self.api_base);
        debug!(%url, source_branch, "requesting draft");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Model(format!(
                "completion request failed: {status} {body}"
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Model(format!("failed to parse completion response: {e}")))?;

        let content = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::Model("model did not return a draft".to_string()))?;

        let draft = parse_draft(content)?;
        debug!(title = %draft.title, "generated draft");
        Ok(draft)
    }
}

/// Parse a completion body into a draft, stripping code fences first.
///
/// Rejects anything that isn't exactly a `{"Title", "Body"}` object; a
/// partially populated draft never escapes this function.
pub fn parse_draft(content: &str) -> Result<Draft> {
    let cleaned = strip_code_fences(content);
    serde_json::from_str(&cleaned)
        .map_err(|e| Error::Model(format!("failed to parse draft from model response: {e}")))
}

/// Remove markdown code fence markers the model may wrap its output in.
pub fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}
