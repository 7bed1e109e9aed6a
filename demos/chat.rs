//! One-shot chat completion
//!
//! ```sh
//! OPENROUTER_API_KEY=sk-or-... cargo run --example chat -- "Why is the sky blue?"
//! ```

use anyhow::Context;
use openrouter_client::{logging, ChatCompletionRequest, Message, OpenRouterClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Say hello in three languages.".to_string());
    let model = std::env::var("OPENROUTER_MODEL").unwrap_or_else(|_| "openai/gpt-4o-mini".to_string());

    let client = OpenRouterClient::from_env().context("failed to configure client")?;
    let request = ChatCompletionRequest::new(
        model,
        vec![
            Message::system("You are a concise assistant."),
            Message::user(prompt),
        ],
    )
    .with_temperature(0.7)
    .with_usage_accounting();

    let response = client.create_chat_completion(&request).await?;
    println!("{}", response.content().unwrap_or_default());

    if let Some(usage) = &response.usage {
        tracing::info!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            cost = ?usage.cost,
            "done"
        );
    }

    Ok(())
}
