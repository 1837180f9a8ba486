//! Reconnecting client for the controller's telemetry socket

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::io::{FrameSource, SocketConnector};
use crate::schema::Schema;
use crate::state::Store;

/// Reconnecting consumer of the controller's telemetry socket
///
/// Holds at most one connection at a time. Whenever the connection
/// ends, one new attempt is scheduled after a fixed delay, for the
/// life of the process. Frames lost while disconnected are simply
/// lost; the stream carries live state, so newer frames supersede
/// anything missed.
pub struct TelemetryFeed {
    socket_url: String,
    reconnect_delay: Duration,
    connector: Arc<dyn SocketConnector>,
    store: Store,
    schema: Schema,
}

impl TelemetryFeed {
    pub fn new(
        socket_url: impl Into<String>,
        reconnect_delay: Duration,
        connector: Arc<dyn SocketConnector>,
        store: Store,
        schema: Schema,
    ) -> Self {
        Self {
            socket_url: socket_url.into(),
            reconnect_delay,
            connector,
            store,
            schema,
        }
    }

    /// Run the feed until the token is cancelled
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                result = self.connector.connect(&self.socket_url) => match result {
                    Ok(frames) => {
                        info!("Telemetry socket connected to {}", self.socket_url);
                        self.consume(frames, &cancel).await;
                    }
                    Err(e) => {
                        warn!("Telemetry connect failed: {}", e);
                    }
                },
                _ = cancel.cancelled() => {}
            }

            if cancel.is_cancelled() {
                info!("Telemetry feed stopped");
                return;
            }

            debug!("Reconnecting in {:?}", self.reconnect_delay);
            tokio::select! {
                _ = tokio::time::sleep(self.reconnect_delay) => {}
                _ = cancel.cancelled() => {
                    info!("Telemetry feed stopped");
                    return;
                }
            }
        }
    }

    /// Consume frames until the connection ends
    async fn consume(&self, mut frames: Box<dyn FrameSource>, cancel: &CancellationToken) {
        loop {
            tokio::select! {
                frame = frames.next_frame() => match frame {
                    Ok(Some(text)) => self.handle_frame(&text),
                    Ok(None) => {
                        warn!("Telemetry socket closed by controller");
                        return;
                    }
                    Err(e) => {
                        warn!("Telemetry socket error: {}", e);
                        return;
                    }
                },
                _ = cancel.cancelled() => return,
            }
        }
    }

    /// Decode one frame and apply it to the display state
    ///
    /// An undecodable frame is dropped without touching the state or
    /// the connection. A decodable frame publishes one snapshot, with
    /// its fields applied in message order.
    fn handle_frame(&self, text: &str) {
        let message: Map<String, Value> = match serde_json::from_str(text) {
            Ok(message) => message,
            Err(e) => {
                warn!("Dropping undecodable frame: {}", e);
                return;
            }
        };

        debug!("Telemetry frame with {} field(s)", message.len());
        self.store.update(|state| {
            self.schema.apply_message(state, &message);
        });
    }
}
