//! Client for the controller's mode API

use std::sync::Arc;

use serde::Deserialize;

use crate::io::{HttpClient, HttpResponse};
use crate::mode::ChargeMode;
use crate::LoadwatchError;

/// Response body of the mode endpoints
#[derive(Debug, Deserialize)]
struct ModeResponse {
    mode: String,
}

/// Client for the mode endpoints under the controller's API base
pub struct ModeClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for ModeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ModeClient {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.into();
        tracing::debug!("Created ModeClient at {}", base_url);
        Self { base_url, http }
    }

    /// Query the controller's current operating mode
    pub async fn current_mode(&self) -> crate::Result<ChargeMode> {
        let url = format!("{}/mode", self.base_url);
        let response = self.http.get(&url).await?;
        Self::decode(response)
    }

    /// Ask the controller to switch modes
    ///
    /// The value is forwarded verbatim as a route segment; the
    /// controller is the authority on legal modes, so an unknown value
    /// comes back as an API error rather than being rejected here.
    pub async fn set_mode(&self, value: &str) -> crate::Result<ChargeMode> {
        let url = format!("{}/mode/{}", self.base_url, value);
        let response = self.http.post(&url).await?;
        Self::decode(response)
    }

    fn decode(response: HttpResponse) -> crate::Result<ChargeMode> {
        if response.status != 200 {
            return Err(LoadwatchError::Api {
                status: response.status,
                body: response.body,
            });
        }
        let parsed: ModeResponse = serde_json::from_str(&response.body)?;
        parsed.mode.parse()
    }
}
