//! Client Module
//!
//! HTTP transport, event-stream framing and the typed chunk stream.

pub mod http;
pub mod sse;
pub mod stream;

pub use http::{HttpClient, RequestOptions};
pub use sse::{BodyReader, FrameReader, ReaderState, DEFAULT_MAX_LINE_BYTES};
pub use stream::ChatCompletionStream;
