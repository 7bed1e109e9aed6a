//! Chat Completion Stream
//!
//! Typed cursor over a streaming chat completion.

use crate::api::ChatCompletionChunk;
use crate::client::sse::{BodyReader, FrameReader, ReaderState};
use crate::error::{Error, Result};
use futures::Stream;
use tokio_util::sync::CancellationToken;

/// A streaming chat completion
///
/// Owns the response body. Call [`recv`](Self::recv) until it yields
/// `Ok(None)` or an error; [`close`](Self::close) (or dropping the stream)
/// releases the connection, whether or not the stream was read to the end.
#[derive(Debug)]
pub struct ChatCompletionStream {
    frames: FrameReader,
}

impl ChatCompletionStream {
    /// Wrap an event-stream body
    pub fn from_reader(reader: BodyReader) -> Self {
        Self {
            frames: FrameReader::new(reader),
        }
    }

    pub(crate) fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.frames = self.frames.with_cancellation(token);
        self
    }

    /// Receive the next chunk
    ///
    /// `Ok(None)` means the upstream finished the stream normally. Any error,
    /// including an undecodable frame, ends the stream.
    pub async fn recv(&mut self) -> Result<Option<ChatCompletionChunk>> {
        let Some(frame) = self.frames.next_frame().await? else {
            return Ok(None);
        };

        match serde_json::from_slice(&frame) {
            Ok(chunk) => Ok(Some(chunk)),
            Err(e) => Err(self.frames.fail(Error::decode(e, &frame))),
        }
    }

    /// Whether the sentinel has been received
    pub fn is_finished(&self) -> bool {
        self.frames.state() == ReaderState::Done
    }

    /// Release the underlying connection
    ///
    /// Safe to call more than once; only the first call releases anything.
    /// Further `recv` calls fail with a closed-connection transport error.
    pub fn close(&mut self) {
        if self.frames.close() {
            tracing::debug!("chat completion stream closed");
        }
    }

    /// Adapt into a `futures::Stream` that ends at the sentinel or after the first error
    pub fn into_stream(mut self) -> impl Stream<Item = Result<ChatCompletionChunk>> + Send {
        async_stream::try_stream! {
            while let Some(chunk) = self.recv().await? {
                yield chunk;
            }
            self.close();
        }
    }
}
