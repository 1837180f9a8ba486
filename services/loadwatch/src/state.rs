//! Display state shared between the telemetry feed, mode control and view

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::mode::ChargeMode;

/// How long a recorded error stays on the display before it is cleared
pub const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// Direction of power flow at the grid connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridDirection {
    /// Drawing power from the grid
    Import,
    /// Feeding surplus power into the grid
    FeedIn,
}

impl std::fmt::Display for GridDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridDirection::Import => write!(f, "import"),
            GridDirection::FeedIn => write!(f, "feed-in"),
        }
    }
}

/// Snapshot of everything the dashboard shows
///
/// Power values are in W, energy in Wh, current in A and state of
/// charge in percent, as delivered by the controller. `mode` stays
/// unset until the first successful mode query or telemetry update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub mode: Option<ChargeMode>,
    pub grid_power: f64,
    pub pv_power: f64,
    pub charge_current: f64,
    pub charge_power: f64,
    pub charge_energy: f64,
    pub soc_charge: f64,
    pub last_error: Option<String>,
}

impl DisplayState {
    pub fn mode_off(&self) -> bool {
        self.mode == Some(ChargeMode::Off)
    }

    pub fn mode_now(&self) -> bool {
        self.mode == Some(ChargeMode::Now)
    }

    pub fn mode_min_pv(&self) -> bool {
        self.mode == Some(ChargeMode::MinPv)
    }

    pub fn mode_pv(&self) -> bool {
        self.mode == Some(ChargeMode::Pv)
    }

    /// Direction of grid power flow; zero counts as import
    pub fn grid_direction(&self) -> GridDirection {
        if self.grid_power >= 0.0 {
            GridDirection::Import
        } else {
            GridDirection::FeedIn
        }
    }
}

/// Observable store owning the display state
///
/// All mutations go through the contained watch channel, so every
/// change publishes exactly one new snapshot to all subscribers.
/// Cloning the store yields another handle to the same state.
#[derive(Clone)]
pub struct Store {
    tx: watch::Sender<DisplayState>,
    error_generation: Arc<AtomicU64>,
}

impl Store {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(DisplayState::default());
        Self {
            tx,
            error_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe to state snapshots. Receivers always observe the
    /// latest snapshot and may skip intermediate ones under load.
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.tx.subscribe()
    }

    /// Current state snapshot
    pub fn snapshot(&self) -> DisplayState {
        self.tx.borrow().clone()
    }

    /// Apply a mutation and publish the result to subscribers
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut DisplayState),
    {
        self.tx.send_modify(f);
    }

    /// Set the operating mode
    pub fn set_mode(&self, mode: ChargeMode) {
        self.update(|state| state.mode = Some(mode));
    }

    /// Record an error for display and schedule its removal after
    /// [`ERROR_DISPLAY_DURATION`]. A newer error supersedes the pending
    /// removal, so the display window restarts from the latest error.
    ///
    /// The removal timer is spawned on the current Tokio runtime.
    pub fn record_error(&self, message: String) {
        let generation = self.error_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.update(|state| state.last_error = Some(message));

        let store = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ERROR_DISPLAY_DURATION).await;
            store.update(|state| {
                // Clear only if no newer error claimed the display
                if store.error_generation.load(Ordering::SeqCst) == generation {
                    state.last_error = None;
                }
            });
        });
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
