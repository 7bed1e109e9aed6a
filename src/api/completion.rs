//! Chat Completion API
//!
//! Request, message and response types for `POST /chat/completions`, and the
//! two-stage request encoder that merges caller extension fields on top of the
//! canonical wire object.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A message in a chat conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the message
    pub role: Role,

    /// Plain text or structured parts; omitted from the wire when empty
    #[serde(
        default,
        skip_serializing_if = "MessageContent::is_empty",
        deserialize_with = "null_as_empty"
    )]
    pub content: MessageContent,

    /// Optional name for the message author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Tool calls made by the assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// Tool call ID (for tool role messages)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Reasoning text returned by reasoning models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// Structured reasoning records returned by reasoning models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_details: Option<Vec<ReasoningDetail>>,
}

impl Message {
    /// Create a message with the given role and content
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
            tool_calls: None,
            tool_call_id: None,
            reasoning: None,
            reasoning_details: None,
        }
    }

    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// A tool result answering the call with `tool_call_id`
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<MessageContent>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new(Role::Tool, content)
        }
    }

    /// Set the author name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach tool calls (assistant turns replayed into the conversation)
    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> Self {
        self.tool_calls = Some(tool_calls);
        self
    }

    /// Text of the message, concatenating text parts if needed
    pub fn text(&self) -> String {
        self.content.to_string_content()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<MessageContent, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<MessageContent>::deserialize(deserializer)?.unwrap_or_default())
}

/// Message content - either a plain string or an ordered list of typed parts
///
/// Encodes as a JSON string for `Text` and as an array of part objects for
/// `Parts`. An empty value of either shape is left out of the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Simple string content
    Text(String),

    /// Array of content parts (for multimodal)
    Parts(Vec<ContentPart>),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl MessageContent {
    /// Convert to string (concatenating text parts if needed)
    pub fn to_string_content(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// Check if content is empty
    pub fn is_empty(&self) -> bool {
        match self {
            MessageContent::Text(s) => s.is_empty(),
            MessageContent::Parts(parts) => parts.is_empty(),
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        MessageContent::Parts(parts)
    }
}

/// A content part in a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cache_control: Option<CacheControl>,
    },

    /// Image referenced by URL or data URI
    ImageUrl {
        image_url: ImageUrl,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cache_control: Option<CacheControl>,
    },

    /// File attachment (e.g. a PDF) sent inline as a data URI
    File {
        file: FileAttachment,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cache_control: Option<CacheControl>,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text {
            text: text.into(),
            cache_control: None,
        }
    }

    /// Image part from a URL or a `data:` URI
    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                detail: None,
            },
            cache_control: None,
        }
    }

    /// File part; `file_data` is a base64 data URI
    pub fn file(filename: impl Into<String>, file_data: impl Into<String>) -> Self {
        ContentPart::File {
            file: FileAttachment {
                filename: filename.into(),
                file_data: file_data.into(),
            },
            cache_control: None,
        }
    }

    /// File part from raw bytes, encoded as `data:<mime>;base64,...`
    pub fn file_from_bytes(filename: impl Into<String>, mime_type: &str, bytes: &[u8]) -> Self {
        let data = format!("data:{};base64,{}", mime_type, BASE64.encode(bytes));
        Self::file(filename, data)
    }

    /// Mark this part with a cache-control hint
    pub fn with_cache_control(mut self, hint: CacheControl) -> Self {
        match &mut self {
            ContentPart::Text { cache_control, .. }
            | ContentPart::ImageUrl { cache_control, .. }
            | ContentPart::File { cache_control, .. } => *cache_control = Some(hint),
        }
        self
    }

    pub fn cache_control(&self) -> Option<&CacheControl> {
        match self {
            ContentPart::Text { cache_control, .. }
            | ContentPart::ImageUrl { cache_control, .. }
            | ContentPart::File { cache_control, .. } => cache_control.as_ref(),
        }
    }
}

/// Prompt-caching hint, forwarded as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheControl {
    #[serde(rename = "type")]
    pub kind: String,
}

impl CacheControl {
    pub fn ephemeral() -> Self {
        Self {
            kind: "ephemeral".to_string(),
        }
    }
}

/// Image URL content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// URL or base64 data URL
    pub url: String,

    /// Optional detail level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Inline file attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub filename: String,

    /// Base64 data URI
    pub file_data: String,
}

/// A tool call made by the assistant
///
/// In streamed deltas a single call arrives in fragments that share `index`;
/// only the first fragment carries `id`, `type` and the function name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Position in the assistant's tool call list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    /// Unique ID for this tool call
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Type of tool call (usually "function")
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub call_type: String,

    /// Function details
    #[serde(default)]
    pub function: FunctionCall,
}

/// Function call details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the function
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Arguments as a JSON string (a fragment of it, in stream deltas)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arguments: String,
}

/// Reasoning record attached to assistant messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningDetail {
    #[serde(rename = "type")]
    pub detail_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    /// Provider-specific fields, kept so the record can be sent back intact
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Type (usually "function")
    #[serde(rename = "type")]
    pub tool_type: String,

    /// Function definition
    pub function: FunctionDefinition,
}

impl Tool {
    /// Declare a function tool
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: Some(description.into()),
                parameters: Some(parameters),
            },
        }
    }
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Function name
    pub name: String,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parameters schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// Tool choice configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolChoice {
    /// String values: "none", "auto", "required"
    Mode(String),

    /// Specific function
    Function {
        r#type: String,
        function: ToolChoiceFunction,
    },
}

impl ToolChoice {
    pub fn auto() -> Self {
        ToolChoice::Mode("auto".to_string())
    }

    pub fn none() -> Self {
        ToolChoice::Mode("none".to_string())
    }

    pub fn required() -> Self {
        ToolChoice::Mode("required".to_string())
    }

    /// Force a call to the named function
    pub fn function(name: impl Into<String>) -> Self {
        ToolChoice::Function {
            r#type: "function".to_string(),
            function: ToolChoiceFunction { name: name.into() },
        }
    }
}

/// Specific function for tool choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolChoiceFunction {
    pub name: String,
}

/// Output format constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    /// "json_object" or "json_schema"
    #[serde(rename = "type")]
    pub format_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<JsonSchema>,
}

impl ResponseFormat {
    /// Any valid JSON object
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
            json_schema: None,
        }
    }

    /// JSON conforming to `schema`
    pub fn json_schema(name: impl Into<String>, schema: Value, strict: bool) -> Self {
        Self {
            format_type: "json_schema".to_string(),
            json_schema: Some(JsonSchema {
                name: name.into(),
                strict,
                schema,
            }),
        }
    }
}

/// Named JSON schema for structured outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchema {
    pub name: String,
    pub strict: bool,
    pub schema: Value,
}

/// Predicted output, used by some providers to cut latency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "type")]
    pub prediction_type: String,
    pub content: String,
}

impl Prediction {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            prediction_type: "content".to_string(),
            content: content.into(),
        }
    }
}

/// Provider routing preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderPreferences {
    /// Providers to try, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_fallbacks: Option<bool>,

    /// Only route to providers supporting every request parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_parameters: Option<bool>,

    /// "allow" or "deny"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_collection: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub only: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// "price", "throughput" or "latency"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// Reasoning effort level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    High,
    Medium,
    Low,
}

/// Reasoning token configuration; set at most one of `effort` and `max_tokens`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningParams {
    /// Use reasoning internally but leave it out of the response
    #[serde(default, skip_serializing_if = "is_false")]
    pub exclude: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<ReasoningEffort>,
}

impl ReasoningParams {
    pub fn effort(effort: ReasoningEffort) -> Self {
        Self {
            effort: Some(effort),
            ..Self::default()
        }
    }

    pub fn max_tokens(max_tokens: u32) -> Self {
        Self {
            max_tokens: Some(max_tokens),
            ..Self::default()
        }
    }

    /// Reject configurations that set both an effort and a token budget
    pub fn validate(&self) -> Result<()> {
        if self.effort.is_some() && self.max_tokens.is_some() {
            return Err(Error::Validation(
                "only one of 'reasoning.effort' and 'reasoning.max_tokens' can be specified"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Usage accounting switch; when included, the final stream chunk carries usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageParams {
    pub include: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Chat completion request
///
/// `extra_body` is not part of the canonical schema: its keys are written on
/// top of the encoded request by [`ChatCompletionRequest::to_body`], replacing
/// any canonical field of the same name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model identifier, e.g. "openai/gpt-4o"
    pub model: String,

    /// Messages in the conversation
    pub messages: Vec<Message>,

    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Top-p sampling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,

    /// Set by the streaming call; rejected on the non-streaming one
    #[serde(default, skip_serializing_if = "is_false")]
    pub stream: bool,

    /// Stop sequences
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub logit_bias: HashMap<String, i32>,

    /// Stable end-user identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// Tool definitions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_p: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_a: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,

    /// Fallback models, tried in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,

    /// Prompt transforms, e.g. "middle-out"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<String>,

    /// Provider routing preferences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderPreferences>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ReasoningParams>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageParams>,

    /// Extra wire fields merged over the canonical encoding
    #[serde(skip)]
    pub extra_body: Map<String, Value>,
}

impl ChatCompletionRequest {
    /// Create a new completion request
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Self::default()
        }
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Declare tools the model may call
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    pub fn with_reasoning(mut self, reasoning: ReasoningParams) -> Self {
        self.reasoning = Some(reasoning);
        self
    }

    pub fn with_provider(mut self, provider: ProviderPreferences) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Ask for token usage and cost in the response
    pub fn with_usage_accounting(mut self) -> Self {
        self.usage = Some(UsageParams { include: true });
        self
    }

    /// Add an extra wire field; it replaces any canonical field with the same name
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra_body.insert(key.into(), value);
        self
    }

    /// Check the request for conflicting settings
    pub fn validate(&self) -> Result<()> {
        if let Some(reasoning) = &self.reasoning {
            reasoning.validate()?;
        }
        Ok(())
    }

    /// Validate and encode the request as it will be sent
    pub fn to_body(&self) -> Result<Value> {
        self.encode(self.stream)
    }

    /// Validate, encode the canonical fields, then overlay `extra_body`
    pub(crate) fn encode(&self, stream: bool) -> Result<Value> {
        self.validate()?;

        let mut body = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(Error::Validation(format!(
                    "request did not encode to an object: {}",
                    other
                )))
            }
            Err(e) => {
                return Err(Error::Validation(format!("failed to encode request: {}", e)))
            }
        };

        if stream {
            body.insert("stream".to_string(), Value::Bool(true));
        } else {
            body.remove("stream");
        }

        merge_extra_body(&mut body, &self.extra_body);
        Ok(Value::Object(body))
    }
}

/// Shallow overwrite: each extension key replaces the top-level entry wholesale
fn merge_extra_body(body: &mut Map<String, Value>, extra: &Map<String, Value>) {
    for (key, value) in extra {
        body.insert(key.clone(), value.clone());
    }
}

/// Chat completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Response (generation) ID
    pub id: String,

    /// Object type
    #[serde(default)]
    pub object: String,

    /// Creation timestamp
    #[serde(default)]
    pub created: i64,

    /// Model used
    #[serde(default)]
    pub model: String,

    /// Response choices
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Token usage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>,
}

/// A choice in the completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Choice index
    #[serde(default)]
    pub index: u32,

    /// The message
    pub message: Message,

    /// Normalized finish reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,

    /// Finish reason as reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,

    #[serde(default)]
    pub completion_tokens: u32,

    #[serde(default)]
    pub total_tokens: u32,

    /// Cost in credits, when usage accounting is on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens_details: Option<TokensDetails>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens_details: Option<TokensDetails>,
}

/// Token usage breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokensDetails {
    #[serde(default)]
    pub cached_tokens: u32,

    #[serde(default)]
    pub reasoning_tokens: u32,
}

impl ChatCompletionResponse {
    /// Get the first message content
    pub fn content(&self) -> Option<String> {
        self.choices.first().map(|c| c.message.text())
    }

    /// Get tool calls from the first choice
    pub fn tool_calls(&self) -> Option<&Vec<ToolCall>> {
        self.choices.first().and_then(|c| c.message.tool_calls.as_ref())
    }

    /// Get reasoning text from the first choice
    pub fn reasoning(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.message.reasoning.as_deref())
    }
}
