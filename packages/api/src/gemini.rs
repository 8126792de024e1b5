//! # Gemini client — external generative AI collaborator
//!
//! [`GeminiClient`] is the only piece of this workspace that talks to the
//! network. It wraps the Generative Language REST API behind three
//! capabilities the screens consume:
//!
//! | Method | Purpose |
//! |--------|---------|
//! | [`generate_prompt`](GeminiClient::generate_prompt) | Structured builder fields → one descriptive prompt paragraph, no markdown wrapping |
//! | [`generate_image`](GeminiClient::generate_image) | Prompt text + [`AspectRatio`] → opaque image reference (data URI or URL) |
//! | [`start_chat`](GeminiClient::start_chat) | Guided ideation: a [`ChatSession`] that exchanges text and whose final message carries the finished prompt in a triple-backtick block |
//!
//! Every call is attempted once; any transport or empty-response failure
//! surfaces as [`GenerationError`] and is terminal for that user action.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const TEXT_MODEL: &str = "gemini-2.5-flash";
const IMAGE_MODEL: &str = "imagen-3.0-generate-002";

/// System instruction for the guided-ideation chat persona.
pub const IDEATOR_SYSTEM_INSTRUCTION: &str = r#"You are "Dyna", a world-class AI Creative Director within the Dynapix app. Your primary function is to take a user's core idea—no matter how simple—and rapidly expand it into a rich, detailed, professional prompt for AI image generation.

Your process is as follows:
1.  Start by introducing yourself warmly and asking for the user's initial idea.
2.  When the user provides a concept, immediately demonstrate your creative expertise: propose 2-3 distinct, imaginative themes or directions.
3.  Guide the user to pick a direction, then build upon it with specific, evocative details about mood, environment, lighting, and style.
4.  Minimize user effort and maximize creative output. You are the expert; lead the conversation with confidence and creativity.
5.  Once you have gathered enough detail, synthesize everything into a single, cohesive, descriptive paragraph.
6.  CRITICAL: When you provide the final, complete prompt, you MUST format it inside a single markdown code block using triple backticks. Do not use backticks for any other part of your response."#;

/// Errors from the generative AI collaborator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("generation returned no content")]
    Empty,
}

/// The aspect ratios the image model accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    Square,
    Landscape,
    Portrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured inputs from the prompt-builder screen. Category and style are
/// required; the rest are optional refinements (a `"Default"` selection is
/// treated as absent, matching the builder's option lists).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptGenerationParams {
    pub category: String,
    pub style: String,
    pub subject: Option<String>,
    pub mood: Option<String>,
    pub composition: Option<String>,
    pub lighting: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn from_text(role: &str, text: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictRequest {
    instances: Vec<ImageInstance>,
    parameters: ImageParameters,
}

#[derive(Serialize)]
struct ImageInstance {
    prompt: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageParameters {
    sample_count: u32,
    aspect_ratio: String,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<ImagePrediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImagePrediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Client for the Generative Language REST API.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (proxy or test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn generate_content(
        &self,
        system_instruction: Option<&str>,
        contents: Vec<Content>,
    ) -> Result<String, GenerationError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, TEXT_MODEL, self.api_key
        );
        let request = GenerateContentRequest {
            contents,
            system_instruction: system_instruction.map(|text| Content {
                role: None,
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }),
        };
        let response: GenerateContentResponse = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        if text.is_empty() {
            tracing::error!("text generation returned no candidates");
            return Err(GenerationError::Empty);
        }
        Ok(text)
    }

    /// Generate a single descriptive prompt paragraph from builder fields.
    pub async fn generate_prompt(
        &self,
        params: &PromptGenerationParams,
    ) -> Result<String, GenerationError> {
        let instruction = build_prompt_instruction(params);
        let text = self
            .generate_content(None, vec![Content::from_text("user", &instruction)])
            .await?;
        Ok(text.trim().to_string())
    }

    /// Generate an image for `prompt` and return an opaque image reference:
    /// a data URI when the model returns bytes, or a URL passed through.
    pub async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<String, GenerationError> {
        let url = format!(
            "{}/models/{}:predict?key={}",
            self.base_url, IMAGE_MODEL, self.api_key
        );
        let request = PredictRequest {
            instances: vec![ImageInstance {
                prompt: prompt.to_string(),
            }],
            parameters: ImageParameters {
                sample_count: 1,
                aspect_ratio: aspect_ratio.as_str().to_string(),
            },
        };
        let response: PredictResponse = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(prediction) = response.predictions.into_iter().next() else {
            tracing::error!("image generation returned no predictions");
            return Err(GenerationError::Empty);
        };
        if let Some(bytes) = prediction.bytes_base64_encoded {
            let mime = prediction.mime_type.as_deref().unwrap_or("image/jpeg");
            return Ok(format!("data:{mime};base64,{bytes}"));
        }
        prediction.url.ok_or(GenerationError::Empty)
    }

    /// Begin a guided-ideation conversation under a system instruction.
    pub fn start_chat(&self, system_instruction: impl Into<String>) -> ChatSession {
        ChatSession {
            client: self.clone(),
            system_instruction: system_instruction.into(),
            messages: Vec::new(),
        }
    }
}

/// Who authored a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    fn as_wire(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// One turn in a chat conversation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// A stateful conversation with the ideation persona. Each `send` submits the
/// full history, so the model keeps context across turns.
pub struct ChatSession {
    client: GeminiClient,
    system_instruction: String,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send the user's text and return the assistant's reply. The user turn
    /// is kept in the transcript even when the call fails, matching the
    /// conversational UI.
    pub async fn send(&mut self, text: &str) -> Result<String, GenerationError> {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: text.to_string(),
        });
        let contents = self
            .messages
            .iter()
            .map(|m| Content::from_text(m.role.as_wire(), &m.text))
            .collect();
        let reply = self
            .client
            .generate_content(Some(&self.system_instruction), contents)
            .await?;
        self.messages.push(ChatMessage {
            role: ChatRole::Model,
            text: reply.clone(),
        });
        Ok(reply)
    }
}

/// Extract the finalized prompt from a triple-backtick block, verbatim and
/// trimmed. Returns None when the message carries no block.
pub fn extract_final_prompt(text: &str) -> Option<String> {
    let start = text.find("```")? + 3;
    let end = text[start..].find("```")? + start;
    Some(text[start..end].trim().to_string())
}

/// Build the one-shot instruction for prompt generation from builder fields.
/// Optional fields are included only when set and not the `"Default"` choice.
fn build_prompt_instruction(params: &PromptGenerationParams) -> String {
    let mut instruction = format!(
        "You are a world-class AI prompt engineer. Your task is to generate a highly detailed and professional AI image generation prompt.\n\
         The prompt must be descriptive, artistic, and ready to be used in an AI image generator.\n\n\
         Base the prompt on the following parameters:\n\
         - Category: \"{}\"\n\
         - Style: \"{}\"",
        params.category, params.style
    );

    if let Some(subject) = params.subject.as_deref().filter(|s| !s.is_empty()) {
        instruction.push_str(&format!("\n- Core Subject: \"{subject}\""));
    }
    for (label, value) in [
        ("Mood/Atmosphere", &params.mood),
        ("Composition/Framing", &params.composition),
        ("Lighting", &params.lighting),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty() && *v != "Default") {
            instruction.push_str(&format!("\n- {label}: \"{value}\""));
        }
    }

    instruction.push_str(
        "\n\nCombine these elements into a cohesive, single-paragraph prompt. The prompt should \
         be evocative and rich in detail, painting a vivid picture.\n\
         The final output MUST be only the prompt text itself, without any extra explanation, \
         preamble, titles, or markdown formatting.",
    );
    instruction
}
