//! HTTP and WebSocket abstractions for testability
//!
//! Trait seams over the two transports the controller exposes, so the
//! mode client and the telemetry feed can be driven by mocks in tests.
//! Production implementations use reqwest and tokio-tungstenite.

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::error::LoadwatchError;

/// Status and body of a controller API response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Requests against the controller's HTTP API
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Issue a GET request
    async fn get(&self, url: &str) -> crate::Result<HttpResponse>;

    /// Issue a POST request with an empty body
    async fn post(&self, url: &str) -> crate::Result<HttpResponse>;
}

/// HTTP client backed by reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> crate::Result<HttpResponse> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadwatchError::Http(format!("GET {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LoadwatchError::Http(format!("Reading response body: {}", e)))?;

        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse { status, body })
    }

    async fn post(&self, url: &str) -> crate::Result<HttpResponse> {
        debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| LoadwatchError::Http(format!("POST {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LoadwatchError::Http(format!("Reading response body: {}", e)))?;

        debug!("POST {} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}

// ============================================================================
// Telemetry socket traits and implementations
// ============================================================================

/// Trait for reading text frames from an open telemetry socket
///
/// Returns `Ok(Some(frame))` for the next text frame, `Ok(None)` once
/// the peer closed the connection, or an error on transport failure.
/// The telemetry channel is receive-only, so there is no writer.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait FrameSource: Send {
    /// Read the next text frame from the connection
    async fn next_frame(&mut self) -> crate::Result<Option<String>>;
}

/// Trait for opening telemetry socket connections
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait SocketConnector: Send + Sync {
    /// Open a WebSocket connection to the given URL
    async fn connect(&self, url: &str) -> crate::Result<Box<dyn FrameSource>>;
}

/// WebSocket implementation of FrameSource
pub struct TungsteniteFrameSource {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl FrameSource for TungsteniteFrameSource {
    async fn next_frame(&mut self) -> crate::Result<Option<String>> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Binary(data))) => {
                    warn!("Ignoring binary frame of {} bytes", data.len());
                }
                Some(Ok(Message::Close(_))) => return Ok(None),
                // Ping/pong and raw frames are handled by the library
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(LoadwatchError::Socket(e.to_string())),
                None => return Ok(None),
            }
        }
    }
}

/// WebSocket implementation of SocketConnector
#[derive(Default, Clone)]
pub struct TungsteniteConnector;

impl TungsteniteConnector {
    /// Create a new WebSocket connector
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SocketConnector for TungsteniteConnector {
    async fn connect(&self, url: &str) -> crate::Result<Box<dyn FrameSource>> {
        debug!("Connecting to {}", url);
        let (stream, response) = connect_async(url)
            .await
            .map_err(|e| LoadwatchError::Socket(format!("Failed to connect to {}: {}", url, e)))?;
        debug!("Socket connected to {} ({})", url, response.status());
        Ok(Box::new(TungsteniteFrameSource { stream }))
    }
}
