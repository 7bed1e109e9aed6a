//! API Module
//!
//! Wire types for chat completions, streaming chunks and the account endpoints.

pub mod completion;
pub mod models;
pub mod streaming;

pub use completion::{
    CacheControl, ChatCompletionRequest, ChatCompletionResponse, Choice, ContentPart,
    FileAttachment, FunctionCall, FunctionDefinition, ImageUrl, JsonSchema, Message,
    MessageContent, Prediction, ProviderPreferences, ReasoningDetail, ReasoningEffort,
    ReasoningParams, ResponseFormat, Role, TokensDetails, Tool, ToolCall, ToolChoice,
    ToolChoiceFunction, Usage, UsageParams,
};
pub use models::{Generation, KeyData, Model, ModelsList, Pricing};
pub use streaming::{ChatCompletionChunk, ChunkChoice, MessageDelta, StreamAccumulator};
