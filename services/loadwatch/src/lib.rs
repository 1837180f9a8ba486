//! Loadwatch - console companion for an EV charge controller
//!
//! Mirrors the controller's live telemetry into a local display state
//! and lets the user read or switch the charging mode.

pub mod api;
pub mod config;
pub mod control;
pub mod error;
pub mod format;
pub mod io;
pub mod mode;
pub mod schema;
pub mod state;
pub mod telemetry;
pub mod view;

pub use config::{load_config, Config};
pub use error::{LoadwatchError, Result};
pub use mode::ChargeMode;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::ModeClient;
use crate::control::ModeControl;
use crate::io::{ReqwestHttpClient, TungsteniteConnector};
use crate::schema::Schema;
use crate::state::Store;
use crate::telemetry::TelemetryFeed;

/// Run the dashboard with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new());
    let cancel = CancellationToken::new();

    let store = Store::new();
    let schema = Schema::new()?;
    let client = ModeClient::new(config.controller.api_base(), Arc::clone(&http));
    let control = ModeControl::new(client, store.clone());
    let feed = TelemetryFeed::new(
        config.controller.socket_url(),
        config.reconnect.delay(),
        Arc::new(TungsteniteConnector::new()),
        store.clone(),
        schema,
    );

    // Ctrl-C cancels every task through the shared token
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install ctrl-c handler");
        tracing::info!("Shutdown requested");
        cancel_for_signal.cancel();
    });

    // A failed query shows up on the error banner; the dashboard
    // starts either way and the mode stays unset until it is known.
    control.load_initial_mode().await;

    let feed_task = tokio::spawn(feed.run(cancel.clone()));
    let input_task = tokio::spawn(view::run_mode_input(control, cancel.clone()));

    tracing::info!("Dashboard started, type a mode (off, now, minpv, pv) and press enter to switch");
    view::run_console(store.subscribe(), cancel.clone()).await;

    feed_task.await.ok();
    input_task.await.ok();
    tracing::info!("Dashboard stopped");

    Ok(())
}
