//! HTTP Client
//!
//! Thin wrapper over reqwest: default headers, cancellation and deadlines,
//! and decoding of the API's error envelope on non-2xx responses.

use crate::client::sse::BodyReader;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorResponse, Result, TransportError};
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::time::Duration;
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;

/// Per-call cancellation and deadline
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Aborts the call (and, for streams, every later read) when cancelled
    pub cancel: Option<CancellationToken>,

    /// Deadline for the whole exchange, body included
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client bound to one API base URL and key
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client
    client: Client,

    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .default_headers(default_headers(config)?)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(10);

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST a JSON body and decode a JSON response
    pub async fn post_json<T, R>(&self, path: &str, body: &T, options: &RequestOptions) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(method = "POST", url = %url, "sending request");

        let builder = self.client.post(&url).json(body);
        let response = self.send(builder, options).await?;
        read_json(response, options).await
    }

    /// GET a JSON resource
    pub async fn get_json<R>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        options: &RequestOptions,
    ) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(method = "GET", url = %url, "sending request");

        let mut builder = self.client.get(&url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let response = self.send(builder, options).await?;
        read_json(response, options).await
    }

    /// POST a JSON body and hand back the event-stream body unread
    pub async fn post_stream<T>(
        &self,
        path: &str,
        body: &T,
        options: &RequestOptions,
    ) -> Result<BodyReader>
    where
        T: Serialize + ?Sized,
    {
        let url = self.url(path);
        tracing::debug!(method = "POST", url = %url, stream = true, "sending request");

        let builder = self
            .client
            .post(&url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .json(body);
        let response = self.send(builder, options).await?;

        Ok(body_reader(response))
    }

    /// Send the request, honoring the options, and reject non-2xx statuses
    async fn send(&self, mut builder: RequestBuilder, options: &RequestOptions) -> Result<Response> {
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let response = cancellable(options, async {
            builder.send().await.map_err(Error::from)
        })
        .await?;

        check_status(response, options).await
    }
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
        .map_err(|e| Error::Config(format!("Invalid API key format: {}", e)))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    // App attribution headers
    if let Some(site_url) = &config.site_url {
        insert_header(&mut headers, "http-referer", site_url)?;
    }
    if let Some(site_name) = &config.site_name {
        insert_header(&mut headers, "x-title", site_name)?;
    }

    Ok(headers)
}

fn insert_header(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<()> {
    let value = HeaderValue::from_str(value)
        .map_err(|e| Error::Config(format!("Invalid value for header {}: {}", name, e)))?;
    headers.insert(HeaderName::from_static(name), value);
    Ok(())
}

/// Race `fut` against the cancellation token, if one was given
async fn cancellable<T, F>(options: &RequestOptions, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match &options.cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(TransportError::Cancelled.into()),
            res = fut => res,
        },
        None => fut.await,
    }
}

async fn check_status(response: Response, options: &RequestOptions) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = cancellable(options, async {
        response.bytes().await.map_err(Error::from)
    })
    .await?;
    tracing::warn!(status = status.as_u16(), "request failed");

    match serde_json::from_slice::<ErrorResponse>(&body) {
        Ok(ErrorResponse {
            error: Some(mut error),
        }) => {
            error.status = Some(status.as_u16());
            Err(Error::Api(error))
        }
        _ => Err(Error::Protocol(format!(
            "Request failed with status {} and no error envelope: {}",
            status,
            String::from_utf8_lossy(&body[..body.len().min(500)])
        ))),
    }
}

async fn read_json<R: DeserializeOwned>(response: Response, options: &RequestOptions) -> Result<R> {
    let body = cancellable(options, async {
        response.bytes().await.map_err(Error::from)
    })
    .await?;

    serde_json::from_slice(&body).map_err(|e| Error::decode(e, &body))
}

/// Adapt a response body into a buffered async reader
pub(crate) fn body_reader(response: Response) -> BodyReader {
    let stream: Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>> =
        Box::pin(response.bytes_stream().map_err(|e| {
            if e.is_timeout() {
                io::Error::new(io::ErrorKind::TimedOut, e)
            } else {
                io::Error::other(e)
            }
        }));
    Box::new(StreamReader::new(stream))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = ClientConfig::new("test-key").with_base_url("https://example.com/api/v1/");
        let client = HttpClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://example.com/api/v1");
        assert_eq!(
            client.url("/chat/completions"),
            "https://example.com/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_default_headers() {
        let config = ClientConfig::new("test-key").with_site("https://example.com", "Example");
        let headers = default_headers(&config).unwrap();

        assert_eq!(headers[AUTHORIZATION], "Bearer test-key");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers["http-referer"], "https://example.com");
        assert_eq!(headers["x-title"], "Example");
    }

    #[test]
    fn test_invalid_key_rejected() {
        let config = ClientConfig::new("bad\nkey");
        assert!(matches!(default_headers(&config), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let token = CancellationToken::new();
        token.cancel();
        let options = RequestOptions::new().with_cancellation(token);

        let result: Result<()> = cancellable(&options, async {
            panic!("future must not be polled once cancelled")
        })
        .await;
        assert!(result.unwrap_err().is_cancelled());
    }
}
