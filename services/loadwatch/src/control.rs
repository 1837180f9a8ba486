//! Mode reconciliation between the controller and the display state

use tracing::{debug, info, warn};

use crate::api::ModeClient;
use crate::mode::ChargeMode;
use crate::state::Store;

/// Drives mode reads and changes against the controller and keeps the
/// display state in sync with the outcome
pub struct ModeControl {
    client: ModeClient,
    store: Store,
}

impl ModeControl {
    pub fn new(client: ModeClient, store: Store) -> Self {
        Self { client, store }
    }

    /// Fetch the controller's current mode into the display state
    ///
    /// On failure the mode stays unset and the error is shown on the
    /// display until it expires.
    pub async fn load_initial_mode(&self) {
        match self.client.current_mode().await {
            Ok(mode) => {
                debug!("Controller reports mode {}", mode);
                self.store.set_mode(mode);
            }
            Err(e) => {
                warn!("Querying mode failed: {}", e);
                self.store.record_error(format!("mode query failed: {}", e));
            }
        }
    }

    /// Request a mode change and reconcile the display state with the
    /// controller's answer
    ///
    /// The local mode only changes when the controller confirms the
    /// switch; on failure it keeps its previous value and the error is
    /// shown on the display instead.
    pub async fn set_mode(&self, value: &str) -> Option<ChargeMode> {
        match self.client.set_mode(value).await {
            Ok(mode) => {
                info!("Controller switched to mode {}", mode);
                self.store.set_mode(mode);
                Some(mode)
            }
            Err(e) => {
                warn!("Mode change to '{}' failed: {}", value, e);
                self.store
                    .record_error(format!("mode change failed: {}", e));
                None
            }
        }
    }
}
