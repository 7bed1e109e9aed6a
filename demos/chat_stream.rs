//! Streamed chat completion with a deadline and Ctrl-C cancellation
//!
//! ```sh
//! OPENROUTER_API_KEY=sk-or-... cargo run --example chat_stream -- "Write a haiku about rust"
//! ```

use anyhow::Context;
use openrouter_client::{
    logging, ChatCompletionRequest, Message, OpenRouterClient, RequestOptions, StreamAccumulator,
};
use std::io::Write;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Count from one to ten, one word per line.".to_string());
    let model = std::env::var("OPENROUTER_MODEL").unwrap_or_else(|_| "openai/gpt-4o-mini".to_string());

    let client = OpenRouterClient::from_env().context("failed to configure client")?;
    let request = ChatCompletionRequest::new(model, vec![Message::user(prompt)]);

    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let options = RequestOptions::new()
        .with_cancellation(token)
        .with_timeout(Duration::from_secs(120));
    let mut stream = client
        .create_chat_completion_stream_with_options(&request, &options)
        .await?;

    let mut accumulator = StreamAccumulator::new();
    let mut stdout = std::io::stdout();
    loop {
        match stream.recv().await {
            Ok(Some(chunk)) => {
                if let Some(text) = chunk.content() {
                    write!(stdout, "{}", text)?;
                    stdout.flush()?;
                }
                accumulator.process_chunk(&chunk);
            }
            Ok(None) => break,
            Err(e) if e.is_cancelled() => {
                tracing::warn!("cancelled");
                break;
            }
            Err(e) => {
                stream.close();
                return Err(e.into());
            }
        }
    }
    stream.close();
    println!();

    let message = accumulator.into_message();
    tracing::info!(chars = message.text().len(), "stream finished");
    Ok(())
}
