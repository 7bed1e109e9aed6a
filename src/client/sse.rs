//! Event Stream Framing
//!
//! Splits a `text/event-stream` body into `data:` payloads, one line at a
//! time, on the caller's task.

use crate::error::{Error, ErrorResponse, Result, TransportError};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tokio_util::sync::CancellationToken;

/// Prefix of event lines that carry a payload
const DATA_PREFIX: &[u8] = b"data: ";

/// Payload marking the graceful end of the stream
const DONE_SENTINEL: &[u8] = b"[DONE]";

/// Payloads starting like this are in-band error envelopes
const ERROR_PREFIX: &[u8] = br#"{"error":"#;

/// Longest event line accepted before the stream is failed
pub const DEFAULT_MAX_LINE_BYTES: usize = 4 * 1024 * 1024;

/// Buffered response body owned by a stream
pub type BodyReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// Lifecycle of a [`FrameReader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// More frames may follow
    Reading,
    /// The `[DONE]` sentinel was seen
    Done,
    /// A read failed or an error frame arrived
    Failed,
    /// The body was released
    Closed,
}

/// Pull-based reader of `data:` frames
///
/// `next_frame` only reads as far as the next complete line; nothing is read
/// ahead in the background.
pub struct FrameReader {
    reader: Option<BodyReader>,
    line: Vec<u8>,
    state: ReaderState,
    cancel: Option<CancellationToken>,
    max_line_bytes: usize,
}

impl FrameReader {
    pub fn new(reader: BodyReader) -> Self {
        Self {
            reader: Some(reader),
            line: Vec::with_capacity(1024),
            state: ReaderState::Reading,
            cancel: None,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }

    /// Fail the stream on lines longer than `max` bytes, newline included
    pub fn with_max_line_bytes(mut self, max: usize) -> Self {
        self.max_line_bytes = max.max(1);
        self
    }

    /// Abort pending and future reads once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Read the next frame payload
    ///
    /// Returns `Ok(None)` once the sentinel has been read, and keeps returning
    /// it afterwards. Any error leaves the reader in a terminal state.
    pub async fn next_frame(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            match self.state {
                ReaderState::Reading => {}
                ReaderState::Done => return Ok(None),
                ReaderState::Failed => {
                    return Err(Error::Protocol(
                        "stream already terminated by an earlier error".to_string(),
                    ))
                }
                ReaderState::Closed => return Err(TransportError::Closed.into()),
            }

            let Some(reader) = self.reader.as_mut() else {
                self.state = ReaderState::Closed;
                return Err(TransportError::Closed.into());
            };

            self.line.clear();
            let mut limited = AsyncReadExt::take(reader, self.max_line_bytes as u64);
            let read = limited.read_until(b'\n', &mut self.line);
            let result = match &self.cancel {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(TransportError::Cancelled),
                    res = read => res.map_err(read_error),
                },
                None => read.await.map_err(read_error),
            };

            let n = match result {
                Ok(n) => n,
                Err(e) => return Err(self.fail(e.into())),
            };
            if self.line.last() != Some(&b'\n') && self.line.len() >= self.max_line_bytes {
                return Err(self.fail(Error::Protocol(format!(
                    "event stream line exceeds {} bytes",
                    self.max_line_bytes
                ))));
            }
            if n == 0 || self.line.last() != Some(&b'\n') {
                let eof = io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "event stream ended before [DONE]",
                );
                return Err(self.fail(TransportError::Io(eof).into()));
            }

            let line = self.line.trim_ascii();
            let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
                // keepalives, comments, event:/id: fields
                if !line.is_empty() {
                    tracing::trace!(line = %String::from_utf8_lossy(line), "skipping non-data line");
                }
                continue;
            };

            if payload == DONE_SENTINEL {
                tracing::debug!("event stream finished");
                self.state = ReaderState::Done;
                return Ok(None);
            }

            if payload.starts_with(ERROR_PREFIX) {
                let raw = String::from_utf8_lossy(payload).into_owned();
                let error = serde_json::from_slice::<ErrorResponse>(payload)
                    .ok()
                    .and_then(|resp| resp.error);
                tracing::warn!(payload = %raw, "error frame on event stream");
                return Err(self.fail(Error::Stream { raw, error }));
            }

            return Ok(Some(payload.to_vec()));
        }
    }

    /// Release the body; returns whether this call released it
    pub fn close(&mut self) -> bool {
        self.state = ReaderState::Closed;
        self.reader.take().is_some()
    }

    /// Move to the terminal failed state, passing `err` through
    pub(crate) fn fail(&mut self, err: Error) -> Error {
        self.state = ReaderState::Failed;
        err
    }
}

fn read_error(err: io::Error) -> TransportError {
    if err.kind() == io::ErrorKind::TimedOut {
        TransportError::TimedOut
    } else {
        TransportError::Io(err)
    }
}

impl std::fmt::Debug for FrameReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameReader")
            .field("state", &self.state)
            .field("open", &self.reader.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Cursor;
    use std::time::Duration;
    use tokio::io::BufReader;

    fn reader(body: &str) -> FrameReader {
        FrameReader::new(Box::new(Cursor::new(body.as_bytes().to_vec())))
    }

    #[tokio::test]
    async fn test_frames_until_done() {
        let mut frames = reader("data: {\"id\":\"1\"}\n\ndata: {\"id\":\"2\"}\n\ndata: [DONE]\n\n");

        assert_eq!(frames.next_frame().await.unwrap().unwrap(), br#"{"id":"1"}"#);
        assert_eq!(frames.next_frame().await.unwrap().unwrap(), br#"{"id":"2"}"#);
        assert!(frames.next_frame().await.unwrap().is_none());
        assert_eq!(frames.state(), ReaderState::Done);

        // the sentinel is sticky
        assert!(frames.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_data_lines_are_skipped() {
        let body = ": OPENROUTER PROCESSING\n\nevent: message\nid: 7\n\r\ndata: {\"id\":\"1\"}\r\n\n: keepalive\ndata: [DONE]\n";
        let mut frames = reader(body);

        assert_eq!(frames.next_frame().await.unwrap().unwrap(), br#"{"id":"1"}"#);
        assert!(frames.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_error_frame_fails_stream() {
        let mut frames = reader(
            "data: {\"id\":\"1\"}\n\ndata: {\"error\":{\"message\":\"x\",\"code\":502}}\n\ndata: {\"id\":\"2\"}\n\n",
        );

        assert!(frames.next_frame().await.unwrap().is_some());

        let err = frames.next_frame().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.api_error().unwrap().message, "x");
        match &err {
            Error::Stream { raw, .. } => assert!(raw.starts_with(r#"{"error":"#)),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(frames.state(), ReaderState::Failed);

        // nothing after the error frame is delivered
        let again = frames.next_frame().await.unwrap_err();
        assert_eq!(again.kind(), ErrorKind::Protocol);
    }

    #[tokio::test]
    async fn test_undecodable_error_frame_is_protocol_error() {
        let mut frames = reader("data: {\"error\": oops\n");
        let err = frames.next_frame().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert!(err.api_error().is_none());
    }

    #[tokio::test]
    async fn test_sentinel_checked_before_error_prefix() {
        let mut frames = reader("data: [DONE]\ndata: {\"error\":{\"message\":\"late\"}}\n");
        assert!(frames.next_frame().await.unwrap().is_none());
        assert!(frames.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_eof_before_done_is_transport_error() {
        let mut frames = reader("data: {\"id\":\"1\"}\n");
        assert!(frames.next_frame().await.unwrap().is_some());

        let err = frames.next_frame().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(frames.state(), ReaderState::Failed);
    }

    #[tokio::test]
    async fn test_partial_line_is_transport_error() {
        let mut frames = reader("data: {\"id\":");
        let err = frames.next_frame().await.unwrap_err();
        match err {
            Error::Transport(TransportError::Io(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_failure_is_transport_error() {
        let mock = tokio_test::io::Builder::new()
            .read(b"data: {\"id\":\"1\"}\n")
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();
        let mut frames = FrameReader::new(Box::new(BufReader::new(mock)));

        assert!(frames.next_frame().await.unwrap().is_some());
        let err = frames.next_frame().await.unwrap_err();
        match err {
            Error::Transport(TransportError::Io(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::ConnectionReset)
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_timeout_is_reported_as_timeout() {
        let mock = tokio_test::io::Builder::new()
            .read_error(io::Error::new(io::ErrorKind::TimedOut, "deadline"))
            .build();
        let mut frames = FrameReader::new(Box::new(BufReader::new(mock)));

        let err = frames.next_frame().await.unwrap_err();
        assert!(err.is_timeout());
        assert!(matches!(err, Error::Transport(TransportError::TimedOut)));
    }

    #[tokio::test]
    async fn test_cancellation_unblocks_pending_read() {
        // the writer half stays open, so the read would block forever
        let (client, _server) = tokio::io::duplex(64);
        let token = CancellationToken::new();
        let mut frames =
            FrameReader::new(Box::new(BufReader::new(client))).with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let err = frames.next_frame().await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(frames.state(), ReaderState::Failed);
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn test_overlong_line_fails_stream() {
        let long = format!("data: {}\n", "x".repeat(64));
        let mut frames = reader(&format!("data: {{}}\n{}data: [DONE]\n", long))
            .with_max_line_bytes(32);

        assert_eq!(frames.next_frame().await.unwrap().unwrap(), b"{}");

        let err = frames.next_frame().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert!(err.to_string().contains("exceeds 32 bytes"));
        assert_eq!(frames.state(), ReaderState::Failed);
        assert!(frames.next_frame().await.is_err());
    }

    #[tokio::test]
    async fn test_line_at_limit_is_accepted() {
        // "data: [DONE]\n" is exactly thirteen bytes
        let mut frames = reader("data: {}\ndata: [DONE]\n").with_max_line_bytes(13);
        assert_eq!(frames.next_frame().await.unwrap().unwrap(), b"{}");
        assert!(frames.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_after_close() {
        let mut frames = reader("data: {}\n");
        assert!(frames.close());
        assert!(!frames.close());

        let err = frames.next_frame().await.unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Closed)));
    }
}
