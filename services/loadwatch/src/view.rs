//! Console surface: state rendering and mode input

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::control::ModeControl;
use crate::format::format_with_unit;
use crate::state::DisplayState;

/// Render one status line for the display state
///
/// Grid power is shown as magnitude plus flow direction; the sign
/// lives in the direction label. All other values are shown as
/// delivered.
pub fn render(state: &DisplayState) -> String {
    let mode = match state.mode {
        Some(mode) => mode.to_string(),
        None => "-".to_string(),
    };

    let mut line = format!(
        "mode {} | grid {} {} | pv {} | charge {} {} {} | soc {}",
        mode,
        format_with_unit(state.grid_power.abs(), "W"),
        state.grid_direction(),
        format_with_unit(state.pv_power, "W"),
        format_with_unit(state.charge_power, "W"),
        format_with_unit(state.charge_current, "A"),
        format_with_unit(state.charge_energy, "Wh"),
        format_with_unit(state.soc_charge, "%"),
    );

    if let Some(error) = &state.last_error {
        line.push_str(" | error: ");
        line.push_str(error);
    }

    line
}

/// Print a status line for every published snapshot until cancelled
pub async fn run_console(mut rx: watch::Receiver<DisplayState>, cancel: CancellationToken) {
    println!("{}", render(&rx.borrow_and_update()));
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    // Store dropped, nothing left to render
                    return;
                }
                println!("{}", render(&rx.borrow_and_update()));
            }
            _ = cancel.cancelled() => return,
        }
    }
}

/// Forward mode values typed on stdin to the controller
///
/// Every non-empty line is sent as a mode change request; the outcome
/// lands in the display state like any other mode operation. Returns
/// once stdin closes or the token is cancelled.
pub async fn run_mode_input(control: ModeControl, cancel: CancellationToken) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let value = line.trim();
                    if !value.is_empty() {
                        control.set_mode(value).await;
                    }
                }
                Ok(None) => return,
                Err(e) => {
                    warn!("Reading stdin failed: {}", e);
                    return;
                }
            },
            _ = cancel.cancelled() => return,
        }
    }
}
