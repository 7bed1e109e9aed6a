//! Streaming Types
//!
//! Chunks delivered by a streaming chat completion, and an accumulator that
//! folds their deltas back into a complete message.

use crate::api::completion::{
    FunctionCall, Message, MessageContent, ReasoningDetail, Role, ToolCall, Usage,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A streaming chunk from the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    /// Chunk ID (shared by every chunk of one generation)
    #[serde(default)]
    pub id: String,

    /// Object type
    #[serde(default)]
    pub object: String,

    /// Creation timestamp
    #[serde(default)]
    pub created: i64,

    /// Model name
    #[serde(default)]
    pub model: String,

    /// Choices with deltas
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,

    /// Usage info, only on the terminal chunk when usage accounting is on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>,
}

impl ChatCompletionChunk {
    /// Content delta of the first choice, if any
    pub fn content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.delta.content.as_deref())
    }
}

/// A choice in a streaming chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkChoice {
    /// Choice index
    #[serde(default)]
    pub index: u32,

    /// The delta (partial message)
    #[serde(default)]
    pub delta: MessageDelta,

    /// Finish reason (set in final chunk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_finish_reason: Option<String>,
}

/// Partial message carried by one chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageDelta {
    /// Role (usually only in first chunk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Content delta
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Reasoning delta
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_details: Option<Vec<ReasoningDetail>>,

    /// Tool call fragments, addressed by `index`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// Accumulator for streaming chunks
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    /// Accumulated content
    pub content: String,

    /// Accumulated reasoning text
    pub reasoning: String,

    pub reasoning_details: Vec<ReasoningDetail>,

    /// Accumulated tool calls, keyed by their stream index
    pub tool_calls: BTreeMap<u32, ToolCall>,

    /// Role from first chunk
    pub role: Option<Role>,

    /// Finish reason from last chunk
    pub finish_reason: Option<String>,

    /// Response ID
    pub id: Option<String>,

    /// Model name
    pub model: Option<String>,

    /// Created timestamp
    pub created: Option<i64>,

    /// Usage from final chunk
    pub usage: Option<Usage>,
}

impl StreamAccumulator {
    /// Create a new accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one chunk into the accumulated state
    pub fn process_chunk(&mut self, chunk: &ChatCompletionChunk) {
        // Store metadata from first chunk
        if self.id.is_none() {
            self.id = Some(chunk.id.clone());
            self.model = Some(chunk.model.clone());
            self.created = Some(chunk.created);
        }

        if chunk.usage.is_some() {
            self.usage = chunk.usage.clone();
        }

        for choice in &chunk.choices {
            let delta = &choice.delta;

            if self.role.is_none() {
                self.role = delta.role;
            }

            if let Some(content) = &delta.content {
                self.content.push_str(content);
            }
            if let Some(reasoning) = &delta.reasoning {
                self.reasoning.push_str(reasoning);
            }
            if let Some(details) = &delta.reasoning_details {
                self.reasoning_details.extend(details.iter().cloned());
            }

            if let Some(tool_calls) = &delta.tool_calls {
                for fragment in tool_calls {
                    self.merge_tool_call(fragment);
                }
            }

            if let Some(reason) = &choice.finish_reason {
                self.finish_reason = Some(reason.clone());
            }
        }
    }

    fn merge_tool_call(&mut self, fragment: &ToolCall) {
        // Fragments without an index continue the most recent call
        let idx = fragment
            .index
            .or_else(|| self.tool_calls.keys().next_back().copied())
            .unwrap_or(0);

        let tc = self.tool_calls.entry(idx).or_insert_with(|| ToolCall {
            index: Some(idx),
            ..ToolCall::default()
        });
        if !fragment.id.is_empty() {
            tc.id = fragment.id.clone();
        }
        if !fragment.call_type.is_empty() {
            tc.call_type = fragment.call_type.clone();
        }
        tc.function.name.push_str(&fragment.function.name);
        tc.function.arguments.push_str(&fragment.function.arguments);
    }

    /// Convert to a final Message
    pub fn into_message(self) -> Message {
        let tool_calls = if self.tool_calls.is_empty() {
            None
        } else {
            Some(
                self.tool_calls
                    .into_values()
                    .map(|tc| ToolCall {
                        index: None,
                        id: tc.id,
                        call_type: tc.call_type,
                        function: FunctionCall {
                            name: tc.function.name,
                            arguments: tc.function.arguments,
                        },
                    })
                    .collect(),
            )
        };

        Message {
            role: self.role.unwrap_or(Role::Assistant),
            content: MessageContent::Text(self.content),
            name: None,
            tool_calls,
            tool_call_id: None,
            reasoning: (!self.reasoning.is_empty()).then_some(self.reasoning),
            reasoning_details: (!self.reasoning_details.is_empty())
                .then_some(self.reasoning_details),
        }
    }
}
