//! Account and catalog endpoints
//!
//! Result types for `GET /models`, `GET /generation` and `GET /auth/key`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response from the `/models` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsList {
    #[serde(default)]
    pub data: Vec<Model>,
}

/// A model available through the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, rename = "context_length")]
    pub context_size: Option<u64>,

    #[serde(default)]
    pub architecture: Value,

    #[serde(default)]
    pub top_provider: Value,

    #[serde(default)]
    pub pricing: Pricing,
}

/// Per-token prices, as decimal strings in USD
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default)]
    pub prompt: String,

    #[serde(default)]
    pub completion: String,

    #[serde(default)]
    pub request: String,

    #[serde(default)]
    pub image: String,
}

/// Envelope of the `/generation` endpoint
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerationResponse {
    pub data: Generation,
}

/// Statistics for a single generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub id: String,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, rename = "tokens_prompt")]
    pub prompt_tokens: u32,

    #[serde(default, rename = "tokens_completion")]
    pub completion_tokens: u32,

    /// Token counts as reported by the underlying provider's tokenizer
    #[serde(default, rename = "native_tokens_prompt")]
    pub native_prompt_tokens: u32,

    #[serde(default, rename = "native_tokens_completion")]
    pub native_completion_tokens: u32,

    #[serde(default)]
    pub finish_reason: Option<String>,

    #[serde(default)]
    pub native_finish_reason: Option<String>,

    #[serde(default)]
    pub total_cost: f64,
}

/// Envelope of the `/auth/key` endpoint
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct KeyCheckResponse {
    pub data: KeyData,
}

/// Credit and limit information for the current API key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyData {
    #[serde(default)]
    pub label: String,

    /// Credits used so far
    #[serde(default)]
    pub usage: f64,

    /// Credit limit; `None` means unlimited
    #[serde(default)]
    pub limit: Option<f64>,

    #[serde(default)]
    pub is_free_tier: bool,
}

impl KeyData {
    /// Credits left before the limit, if the key has one
    pub fn remaining(&self) -> Option<f64> {
        self.limit.map(|limit| (limit - self.usage).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_list() {
        let json = r#"{"data":[{"id":"openai/gpt-4o","name":"GPT-4o","description":"","context_length":128000,"architecture":{"modality":"text+image->text"},"top_provider":null,"pricing":{"prompt":"0.0000025","completion":"0.00001","request":"0","image":"0.003613"}}]}"#;
        let list: ModelsList = serde_json::from_str(json).unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].context_size, Some(128000));
        assert_eq!(list.data[0].pricing.completion, "0.00001");
        assert_eq!(list.data[0].architecture["modality"], "text+image->text");
    }

    #[test]
    fn test_generation() {
        let json = r#"{"data":{"id":"gen-1","model":"openai/gpt-4o","created_at":"2025-03-01T12:00:00Z","tokens_prompt":10,"tokens_completion":20,"native_tokens_prompt":11,"native_tokens_completion":19,"finish_reason":"stop","native_finish_reason":"stop","total_cost":0.0004}}"#;
        let resp: GenerationResponse = serde_json::from_str(json).unwrap();
        let generation = resp.data;
        assert_eq!(generation.prompt_tokens, 10);
        assert_eq!(generation.native_completion_tokens, 19);
        assert_eq!(
            generation.created_at.unwrap().to_rfc3339(),
            "2025-03-01T12:00:00+00:00"
        );
    }

    #[test]
    fn test_key_data_unlimited() {
        let json = r#"{"data":{"label":"sk-or-v1-abc...","usage":1.5,"limit":null,"is_free_tier":false}}"#;
        let resp: KeyCheckResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data.limit, None);
        assert_eq!(resp.data.remaining(), None);

        let limited = KeyData {
            label: String::new(),
            usage: 4.0,
            limit: Some(10.0),
            is_free_tier: true,
        };
        assert_eq!(limited.remaining(), Some(6.0));
    }
}
