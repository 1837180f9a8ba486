//! Mapping from telemetry field names to display state slots

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::warn;

use crate::mode::ChargeMode;
use crate::state::DisplayState;

/// Display state slot a telemetry field lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    GridPower,
    PvPower,
    ChargeCurrent,
    ChargePower,
    ChargeEnergy,
    SocCharge,
    Mode,
}

/// Every field name the controller streams, in one place
const FIELDS: &[(&str, Field)] = &[
    ("gridPower", Field::GridPower),
    ("pvPower", Field::PvPower),
    ("chargeCurrent", Field::ChargeCurrent),
    ("chargePower", Field::ChargePower),
    ("chargeEnergy", Field::ChargeEnergy),
    ("socCharge", Field::SocCharge),
    ("mode", Field::Mode),
];

/// Telemetry schema resolving field names to state slots
///
/// Built once at startup from the declarative table above, so a frame
/// key either hits a known slot or is reported, never silently routed.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: HashMap<&'static str, Field>,
}

impl Schema {
    /// Build the schema, checking that the table names every slot
    /// exactly once
    pub fn new() -> crate::Result<Self> {
        let mut fields = HashMap::with_capacity(FIELDS.len());
        for (name, field) in FIELDS {
            if fields.insert(*name, *field).is_some() {
                return Err(crate::LoadwatchError::Config(format!(
                    "Duplicate telemetry field name: {}",
                    name
                )));
            }
        }
        for slot in [
            Field::GridPower,
            Field::PvPower,
            Field::ChargeCurrent,
            Field::ChargePower,
            Field::ChargeEnergy,
            Field::SocCharge,
            Field::Mode,
        ] {
            if !fields.values().any(|field| *field == slot) {
                return Err(crate::LoadwatchError::Config(format!(
                    "No telemetry field name maps to {:?}",
                    slot
                )));
            }
        }
        Ok(Self { fields })
    }

    /// The state slot a field name maps to, if any
    pub fn resolve(&self, name: &str) -> Option<Field> {
        self.fields.get(name).copied()
    }

    /// Apply a decoded telemetry message to the display state
    ///
    /// Every key is routed independently; unknown keys and unusable
    /// values are logged and skipped without affecting the rest of the
    /// message. Returns the number of fields applied.
    pub fn apply_message(&self, state: &mut DisplayState, message: &Map<String, Value>) -> usize {
        let mut applied = 0;
        for (key, value) in message {
            if self.apply_field(state, key, value) {
                applied += 1;
            }
        }
        applied
    }

    fn apply_field(&self, state: &mut DisplayState, key: &str, value: &Value) -> bool {
        let Some(field) = self.resolve(key) else {
            warn!("invalid data key: {}", key);
            return false;
        };

        let slot = match field {
            Field::Mode => {
                return match value.as_str().and_then(|s| s.parse::<ChargeMode>().ok()) {
                    Some(mode) => {
                        state.mode = Some(mode);
                        true
                    }
                    None => {
                        warn!("invalid mode value: {}", value);
                        false
                    }
                };
            }
            Field::GridPower => &mut state.grid_power,
            Field::PvPower => &mut state.pv_power,
            Field::ChargeCurrent => &mut state.charge_current,
            Field::ChargePower => &mut state.charge_power,
            Field::ChargeEnergy => &mut state.charge_energy,
            Field::SocCharge => &mut state.soc_charge,
        };

        match value.as_f64() {
            Some(number) => {
                *slot = number;
                true
            }
            None => {
                warn!("non-numeric value for {}: {}", key, value);
                false
            }
        }
    }
}
